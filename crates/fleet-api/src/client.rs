// fleet API HTTP client
//
// Wraps `reqwest::Client` with fleet-specific URL construction
// (`fleet/{version}/{resource}/...`), error-body decoding, and
// `nextPageToken` pagination. Endpoint groups (machines, units, state)
// are inherent methods in separate files.

use std::collections::HashSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::Paged;
use crate::transport::TransportConfig;

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "v1";

/// fleet wraps failures as `{"error":{"code":N,"message":"..."}}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    error: Option<ErrorResponseInner>,
}

#[derive(serde::Deserialize)]
struct ErrorResponseInner {
    #[serde(default)]
    message: Option<String>,
}

/// Raw async client for the fleet v1 HTTP API.
///
/// Holds only immutable configuration plus a pooled `reqwest::Client`,
/// so it is `Send + Sync` and can be shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    base_url: Url,
    api_version: String,
    credentials: Credentials,
}

impl FleetClient {
    /// Create a client from an endpoint URL and transport settings.
    ///
    /// `endpoint` is the API root (e.g. `http://127.0.0.1:49153/`); the
    /// `fleet/{version}/` prefix is appended per request.
    pub fn new(
        endpoint: Url,
        api_version: impl Into<String>,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, endpoint, api_version, credentials)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: Url,
        api_version: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        if endpoint.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(endpoint.to_string()));
        }
        debug!(%endpoint, auth = credentials.kind(), "creating fleet client");
        Ok(Self {
            http,
            base_url: endpoint,
            api_version: api_version.into(),
            credentials,
        })
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The API version segment (e.g. `v1`).
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Path segments of a resource: `fleet/{version}/{resource}[/{parts...}]`.
    fn resource_segments<'a>(&'a self, resource: &'a str, parts: &[&'a str]) -> Vec<&'a str> {
        let mut segments = vec!["fleet", self.api_version.as_str(), resource];
        segments.extend_from_slice(parts);
        segments
    }

    /// Resolve a resource path against the endpoint, percent-encoding
    /// each segment.
    fn url(&self, resource: &str, parts: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(self.resource_segments(resource, parts));
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        parts: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(resource, parts)?;
        debug!("GET {url} params={params:?}");

        let builder = self.credentials.apply(self.http.get(url).query(params));
        let resp = builder.send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn put<B: Serialize + Sync>(
        &self,
        resource: &str,
        parts: &[&str],
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(resource, parts)?;
        debug!("PUT {url}");

        let builder = self.credentials.apply(self.http.put(url).json(body));
        let resp = builder.send().await?;
        Self::handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, resource: &str, parts: &[&str]) -> Result<(), Error> {
        let url = self.url(resource, parts)?;
        debug!("DELETE {url}");

        let builder = self.credentials.apply(self.http.delete(url));
        let resp = builder.send().await?;
        Self::handle_empty(resp).await
    }

    /// Follow `nextPageToken` until the collection is exhausted.
    pub(crate) async fn get_all<P>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<P::Item>, Error>
    where
        P: Paged + DeserializeOwned,
    {
        let mut all = Vec::new();
        let mut token: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let mut query = params.to_vec();
            if let Some(ref t) = token {
                query.push(("nextPageToken", t.clone()));
            }

            let page: P = self.get(resource, &[], &query).await?;
            let (items, next) = page.into_parts();
            trace!(resource, received = items.len(), more = next.is_some(), "page");
            all.extend(items);

            match next {
                Some(t) if !t.is_empty() => {
                    if !seen.insert(t.clone()) {
                        return Err(Error::PageLoop {
                            resource: resource.to_owned(),
                            token: t,
                        });
                    }
                    token = Some(t);
                }
                _ => break,
            }
        }

        Ok(all)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let path = resp.url().path().trim_start_matches('/').to_owned();
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|r| r.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                }
            });

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Error::Authentication { message }
            }
            reqwest::StatusCode::NOT_FOUND => Error::NotFound { path },
            reqwest::StatusCode::CONFLICT | reqwest::StatusCode::PRECONDITION_FAILED => {
                Error::PreconditionFailed {
                    status: status.as_u16(),
                    message,
                }
            }
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
