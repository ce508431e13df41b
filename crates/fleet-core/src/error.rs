// ── Core error types ──
//
// User-facing errors from fleet-core. The `From<fleet_api::Error>` impl
// translates transport-layer errors into domain variants; the lifecycle
// and lookup code adds the unit name where it knows it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors (raised before any backend call) ────────────────
    #[error("Invalid unit name '{name}': {reason}")]
    InvalidUnitName { name: String, reason: String },

    #[error("Invalid service definition: {message}")]
    InvalidDefinition { message: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Unit '{name}' not found")]
    UnitNotFound { name: String },

    #[error("Resource not found: {path}")]
    NotFound { path: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to fleet at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to fleet timed out")]
    Timeout,

    // ── Backend errors ───────────────────────────────────────────────
    #[error("Change rejected by fleet: {message}")]
    Conflict { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected response from fleet: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for either flavour of not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnitNotFound { .. } | Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fleet_api::Error> for CoreError {
    fn from(err: fleet_api::Error) -> Self {
        match err {
            fleet_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            fleet_api::Error::InvalidEndpoint(url) => CoreError::Config {
                message: format!("Endpoint URL cannot be used as a base: {url}"),
            },
            fleet_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fleet_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fleet_api::Error::NotFound { path } => CoreError::NotFound { path },
            fleet_api::Error::PreconditionFailed { message, .. } => CoreError::Conflict { message },
            fleet_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            fleet_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
            err @ fleet_api::Error::PageLoop { .. } => CoreError::InvalidResponse {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn repeated_page_token_is_invalid_response() {
        let err: CoreError = fleet_api::Error::PageLoop {
            resource: "state".into(),
            token: "same".into(),
        }
        .into();
        assert!(
            matches!(err, CoreError::InvalidResponse { ref message } if message.contains("state")),
            "{err:?}"
        );
    }

    #[test]
    fn api_status_survives_conversion() {
        let err: CoreError = fleet_api::Error::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }

    #[test]
    fn not_found_is_distinct_from_transport_failures() {
        let err: CoreError = fleet_api::Error::NotFound {
            path: "fleet/v1/units/x".into(),
        }
        .into();
        assert!(err.is_not_found());

        let err: CoreError = fleet_api::Error::Api {
            status: 503,
            message: "unavailable".into(),
        }
        .into();
        assert!(!err.is_not_found());
    }

    #[test]
    fn conflict_maps_to_conflict() {
        let err: CoreError = fleet_api::Error::PreconditionFailed {
            status: 412,
            message: "exists".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Conflict { .. }));
    }
}
