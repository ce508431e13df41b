//! CLI configuration: thin wrapper around `fleet_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--endpoint, --timeout, etc.).

use std::time::Duration;

use fleet_core::{FleetConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fleet_config::{
    Config, KEYRING_SERVICE, Profile, config_path, keyring_key, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `FleetConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, fleet's defaults apply (plain HTTP on the
/// local socket-activated port, no auth) unless an explicit `--profile`
/// was requested.
pub fn build_fleet_config(global: &GlobalOpts, cfg: &Config) -> Result<FleetConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut fleet = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            fleet_config::profile_to_fleet_config(profile, &profile_name, &cfg.defaults)?
        }
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: cfg.profile_names(),
            });
        }
        None => FleetConfig {
            tls: if cfg.defaults.insecure {
                TlsVerification::DangerAcceptInvalid
            } else {
                TlsVerification::SystemDefaults
            },
            timeout: Duration::from_secs(cfg.defaults.timeout),
            ..FleetConfig::default()
        },
    };

    apply_overrides(&mut fleet, global)?;
    Ok(fleet)
}

/// Layer global flags over a resolved configuration. Flags win.
fn apply_overrides(fleet: &mut FleetConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref endpoint) = global.endpoint {
        fleet.endpoint = fleet_config::parse_endpoint(endpoint)?;
    }
    if let Some(ref version) = global.api_version {
        fleet.api_version.clone_from(version);
    }
    if global.insecure {
        fleet.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        fleet.timeout = Duration::from_secs(secs);
    }
    Ok(())
}
