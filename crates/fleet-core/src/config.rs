// ── Runtime connection configuration ──
//
// These types describe *how* to reach a fleet API endpoint. They carry
// credential data and transport tuning, but never touch disk or the
// environment. `fleet-config` / the CLI build a `FleetConfig` and hand it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Endpoint used when nothing else is configured (fleet's TCP socket
/// activation default).
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:49153/";

/// API version segment used in resource paths.
pub const DEFAULT_API_VERSION: &str = fleet_api::client::DEFAULT_API_VERSION;

/// How to authenticate with the endpoint.
#[derive(Debug, Clone, Default)]
pub enum AuthCredentials {
    /// Plain fleet: no authentication.
    #[default]
    None,
    /// HTTP basic auth (typically a reverse proxy).
    Basic {
        username: String,
        password: SecretString,
    },
    /// Bearer token.
    Token(SecretString),
}

impl From<&AuthCredentials> for fleet_api::Credentials {
    fn from(auth: &AuthCredentials) -> Self {
        match auth {
            AuthCredentials::None => Self::None,
            AuthCredentials::Basic { username, password } => Self::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            AuthCredentials::Token(token) => Self::Bearer {
                token: token.clone(),
            },
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for fleet_api::TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for talking to one fleet cluster.
///
/// Defaults are applied once, when the value is built; nothing consults
/// process-wide state afterwards.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// API root, e.g. `http://127.0.0.1:49153/`.
    pub endpoint: Url,
    /// Version segment in `fleet/{version}/...` paths.
    pub api_version: String,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            api_version: DEFAULT_API_VERSION.into(),
            auth: AuthCredentials::None,
            tls: TlsVerification::default(),
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

impl FleetConfig {
    /// Default configuration pointed at `endpoint`.
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            endpoint,
            ..Self::default()
        }
    }

    /// Transport settings for the HTTP layer.
    pub fn transport(&self) -> fleet_api::TransportConfig {
        fleet_api::TransportConfig {
            tls: (&self.tls).into(),
            connect_timeout: self.connect_timeout,
            timeout: self.timeout,
        }
    }
}
