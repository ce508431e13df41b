//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use fleet_config::ConfigError;
use fleet_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to fleet at {url}")]
    #[diagnostic(
        code(fleetctl::connection_failed),
        help(
            "Check that fleet is running and its API is listening.\n\
             Endpoint: {url}\n\
             Try: fleetctl --endpoint http://127.0.0.1:49153/ list-machines"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(fleetctl::timeout),
        help("Increase timeout with --timeout or check fleet responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fleetctl::auth_failed),
        help(
            "Verify the credentials for this profile.\n\
             Run: fleetctl config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(fleetctl::no_credentials),
        help(
            "Configure credentials with: fleetctl config init\n\
             Or set FLEET_PASSWORD / FLEET_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Units ────────────────────────────────────────────────────────
    #[error("Unit '{name}' not found")]
    #[diagnostic(
        code(fleetctl::unit_not_found),
        help("Run: fleetctl list-unit-files to see submitted units")
    )]
    UnitNotFound { name: String },

    #[error("Resource '{path}' not found")]
    #[diagnostic(
        code(fleetctl::not_found),
        help("Check --api-version and the endpoint path prefix.")
    )]
    NotFound { path: String },

    #[error("Invalid unit name '{name}': {reason}")]
    #[diagnostic(code(fleetctl::invalid_unit_name))]
    InvalidUnitName { name: String, reason: String },

    #[error("Invalid unit definition: {message}")]
    #[diagnostic(
        code(fleetctl::invalid_definition),
        help(
            "A definition maps sections to directives, e.g.\n\
             Service:\n  ExecStart: /usr/bin/web\n  ExecStartPre: [\"/bin/a\", \"/bin/b\"]"
        )
    )]
    InvalidDefinition { message: String },

    #[error("Change rejected by fleet: {message}")]
    #[diagnostic(code(fleetctl::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(fleetctl::api_error))]
    ApiError { status: Option<u16>, message: String },

    #[error("Unexpected response from fleet: {message}")]
    #[diagnostic(code(fleetctl::invalid_response))]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fleetctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fleetctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fleetctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fleetctl::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fleetctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::UnitNotFound { .. } | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::InvalidUnitName { .. }
            | Self::InvalidDefinition { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidUnitName { name, reason } => CliError::InvalidUnitName { name, reason },
            CoreError::InvalidDefinition { message } => CliError::InvalidDefinition { message },
            CoreError::UnitNotFound { name } => CliError::UnitNotFound { name },
            CoreError::NotFound { path } => CliError::NotFound { path },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Conflict { message } => CliError::Conflict { message },
            CoreError::Api { message, status } => CliError::ApiError { status, message },
            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
