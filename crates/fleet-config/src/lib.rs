//! Configuration for fleetctl.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `fleet_core::FleetConfig`. The CLI layers its global
//! flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fleet_core::{AuthCredentials, FleetConfig, TlsVerification};

/// Keyring service name secrets are stored under.
pub const KEYRING_SERVICE: &str = "fleetctl";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named cluster profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Comma-separated profile names, for error messages.
    pub fn profile_names(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    300
}

/// A named cluster profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// fleet API endpoint (e.g., "http://127.0.0.1:49153/").
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API version segment, "v1" unless overridden.
    pub api_version: Option<String>,

    /// Auth mode: "none", "basic", or "bearer".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password for basic auth (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_version: None,
            auth_mode: default_auth_mode(),
            username: None,
            password: None,
            token: None,
            token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_endpoint() -> String {
    fleet_core::config::DEFAULT_ENDPOINT.into()
}
fn default_auth_mode() -> String {
    "none".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fleetctl", "fleetctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fleetctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, with `FLEET_`-prefixed env vars on top.
///
/// Nested keys use a double underscore: `FLEET_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FLEET_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring entry name for a profile secret (`{profile}/password`).
pub fn keyring_key(profile_name: &str, secret: &str) -> String {
    format!("{profile_name}/{secret}")
}

fn keyring_secret(profile_name: &str, secret: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name, secret)).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Resolve basic-auth credentials: env → keyring → plaintext.
pub fn resolve_basic_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("FLEET_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    if let Ok(pw) = std::env::var("FLEET_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }
    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok((username, pw));
    }
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve a bearer token: profile's `token_env` → `FLEET_TOKEN` →
/// keyring → plaintext.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    let from_env = profile
        .token_env
        .as_deref()
        .into_iter()
        .chain(["FLEET_TOKEN"])
        .find_map(|name| std::env::var(name).ok());
    if let Some(token) = from_env {
        return Ok(SecretString::from(token));
    }
    if let Some(token) = keyring_secret(profile_name, "token") {
        return Ok(token);
    }
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials` from a profile's `auth_mode` field.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    match profile.auth_mode.as_str() {
        "none" => Ok(AuthCredentials::None),
        "basic" => {
            let (username, password) = resolve_basic_credentials(profile, profile_name)?;
            Ok(AuthCredentials::Basic { username, password })
        }
        "bearer" => Ok(AuthCredentials::Token(resolve_token(profile, profile_name)?)),
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'none', 'basic', or 'bearer', got '{other}'"),
        }),
    }
}

/// Parse an endpoint string into a URL with a trailing slash.
pub fn parse_endpoint(raw: &str) -> Result<url::Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "endpoint".into(),
        reason,
    };
    let url: url::Url = raw
        .parse()
        .map_err(|e| invalid(format!("invalid URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        "unix" => Err(invalid(
            "unix sockets are not supported; point at fleet's TCP listener".into(),
        )),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Build a `FleetConfig` from a profile, with no CLI overrides.
pub fn profile_to_fleet_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<FleetConfig, ConfigError> {
    let endpoint = parse_endpoint(&profile.endpoint)?;
    let auth = resolve_auth(profile, profile_name)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let base = FleetConfig::default();
    Ok(FleetConfig {
        endpoint,
        api_version: profile.api_version.clone().unwrap_or(base.api_version),
        auth,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        connect_timeout: base.connect_timeout,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 300);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                endpoint: "https://fleet.example.com/".into(),
                auth_mode: "basic".into(),
                username: Some("ops".into()),
                timeout: Some(60),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let prod = &loaded.profiles["prod"];
        assert_eq!(prod.endpoint, "https://fleet.example.com/");
        assert_eq!(prod.username.as_deref(), Some("ops"));
        assert_eq!(prod.timeout, Some(60));
    }

    #[test]
    fn profile_without_auth_builds_config() {
        let profile = Profile {
            endpoint: "http://10.0.0.5:49153/".into(),
            api_version: Some("v2".into()),
            ..Profile::default()
        };

        let cfg = profile_to_fleet_config(&profile, "default", &Defaults::default()).unwrap();

        assert_eq!(cfg.endpoint.as_str(), "http://10.0.0.5:49153/");
        assert_eq!(cfg.api_version, "v2");
        assert!(matches!(cfg.auth, AuthCredentials::None));
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.timeout, Duration::from_secs(300));
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let profile = Profile {
            insecure: Some(true),
            ca_cert: Some("/etc/fleet/ca.pem".into()),
            ..Profile::default()
        };
        let cfg = profile_to_fleet_config(&profile, "default", &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_unknown_auth_mode() {
        let profile = Profile {
            auth_mode: "kerberos".into(),
            ..Profile::default()
        };
        let err = resolve_auth(&profile, "default").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "auth_mode"));
    }

    #[test]
    fn rejects_unix_socket_endpoint() {
        let err = parse_endpoint("unix:///var/run/fleet.sock").unwrap_err();
        assert!(err.to_string().contains("unix sockets"));
    }

    #[test]
    fn plaintext_token_is_last_resort() {
        let profile = Profile {
            auth_mode: "bearer".into(),
            token: Some("s3cret".into()),
            token_env: Some("FLEET_CONFIG_TEST_UNSET_TOKEN".into()),
            ..Profile::default()
        };
        // Keyring lookups fail without a keyring daemon and fall through.
        let auth = resolve_auth(&profile, "fleet-config-test-profile").unwrap();
        assert!(matches!(auth, AuthCredentials::Token(_)));
    }
}
