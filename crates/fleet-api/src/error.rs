use thiserror::Error;

/// Top-level error type for the `fleet-api` crate.
///
/// Covers every failure mode of the fleet HTTP surface. HTTP status codes
/// that callers need to branch on (404, 409/412) get dedicated variants;
/// `fleet-core` maps the rest into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint URL cannot carry path segments (e.g. `mailto:`).
    #[error("Endpoint URL cannot be used as a base: {0}")]
    InvalidEndpoint(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP status ─────────────────────────────────────────────────
    /// 401/403 from the endpoint (usually an authenticating proxy).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// 404: the addressed resource does not exist.
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    /// 409/412: the requested change conflicts with existing state.
    #[error("Precondition failed (HTTP {status}): {message}")]
    PreconditionFailed { status: u16, message: String },

    /// Any other non-2xx response.
    #[error("fleet API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The server handed back a `nextPageToken` it had already issued.
    #[error("Pagination of {resource} did not advance (token {token:?} repeated)")]
    PageLoop { resource: String, token: String },
}

impl Error {
    /// Returns `true` for the conflict class that unit submission treats
    /// as "already there".
    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, Self::PreconditionFailed { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client never retries on its own; this is for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::PreconditionFailed { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
