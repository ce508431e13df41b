use secrecy::{ExposeSecret, SecretString};

/// Credentials for authenticating with a fleet API endpoint.
///
/// fleet itself ships without authentication; these cover the reverse
/// proxies usually placed in front of it.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// No authentication header is sent.
    #[default]
    None,
    /// HTTP basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
    /// `Authorization: Bearer <token>`.
    Bearer { token: SecretString },
}

impl Credentials {
    /// Attach the credentials to an outgoing request.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::None => builder,
            Self::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
            Self::Bearer { token } => builder.bearer_auth(token.expose_secret()),
        }
    }

    /// Short label for logging (never includes secret material).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
        }
    }
}
