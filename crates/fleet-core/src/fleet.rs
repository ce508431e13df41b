// ── Fleet facade ──
//
// `Fleet` owns a shared backend handle. Lifecycle verbs live in
// `lifecycle.rs`, the joined listing in `reconcile.rs`, the single-unit
// lookup in `lookup.rs`; each adds an `impl` block here.

use std::sync::Arc;

use tracing::debug;

use fleet_api::{FleetClient, Machine, Unit};

use crate::config::FleetConfig;
use crate::error::CoreError;
use crate::ports::FleetBackend;

/// Client-side control surface for one fleet cluster.
///
/// Cheaply cloneable; clones share the backend.
#[derive(Debug)]
pub struct Fleet<B = FleetClient> {
    backend: Arc<B>,
}

impl<B> Clone for Fleet<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl Fleet<FleetClient> {
    /// Build an HTTP-backed handle from configuration.
    pub fn from_config(config: &FleetConfig) -> Result<Self, CoreError> {
        debug!(endpoint = %config.endpoint, version = %config.api_version, "connecting to fleet");
        let client = FleetClient::new(
            config.endpoint.clone(),
            config.api_version.clone(),
            (&config.auth).into(),
            &config.transport(),
        )?;
        Ok(Self::with_backend(client))
    }
}

impl<B: FleetBackend> Fleet<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    // ── Plain listings ───────────────────────────────────────────────

    /// Every machine in the cluster.
    pub async fn list_machines(&self) -> Result<Vec<Machine>, CoreError> {
        Ok(self.backend.list_machines().await?)
    }

    /// Every unit known to the cluster, with its desired state.
    pub async fn list_units(&self) -> Result<Vec<Unit>, CoreError> {
        Ok(self.backend.list_units().await?)
    }

    /// One unit, including its definition.
    ///
    /// A missing unit is reported as [`CoreError::UnitNotFound`].
    pub async fn get_unit(&self, name: &str) -> Result<Unit, CoreError> {
        self.backend
            .get_unit(name)
            .await
            .map_err(|e| crate::lifecycle::not_found_as_unit(e, name))
    }
}
