// ── Unit lifecycle driver ──
//
// Each verb is a single desired-state transition against the backend.
// fleet is eventually consistent: a successful call only means the new
// desired state was recorded, not that any machine acted on it.
//
//   absent --submit--> inactive --load--> loaded --start--> launched
//   launched --stop--> loaded --unload--> inactive
//   any --destroy--> absent

use tracing::{debug, info};

use fleet_api::DesiredState;

use crate::definition::{IntoServiceDefinition, to_unit_payload};
use crate::error::CoreError;
use crate::fleet::Fleet;
use crate::ports::FleetBackend;
use crate::unit_name::UnitName;

impl<B: FleetBackend> Fleet<B> {
    /// Create a unit from a definition.
    ///
    /// The name is validated before anything is sent. If the unit already
    /// exists the backend answers with a precondition failure, which is
    /// treated as success.
    pub async fn submit(
        &self,
        name: &str,
        definition: impl IntoServiceDefinition,
    ) -> Result<(), CoreError> {
        let name = UnitName::parse(name)?;
        let definition = definition.into_service_definition()?;
        let payload = to_unit_payload(&name, &definition);

        match self.backend().create_unit(name.as_str(), &payload).await {
            Ok(()) => {
                info!(unit = %name, options = payload.options.len(), "submitted unit");
                Ok(())
            }
            Err(fleet_api::Error::PreconditionFailed { status, message }) => {
                debug!(unit = %name, status, %message, "unit already submitted");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Set a unit's desired state to `loaded`, submitting it first when a
    /// definition is given.
    pub async fn load<D: IntoServiceDefinition>(
        &self,
        name: &str,
        definition: Option<D>,
    ) -> Result<(), CoreError> {
        if let Some(definition) = definition {
            self.submit(name, definition).await?;
        }
        self.transition(name, DesiredState::Loaded).await
    }

    /// Set a unit's desired state to `launched`.
    pub async fn start(&self, name: &str) -> Result<(), CoreError> {
        self.transition(name, DesiredState::Launched).await
    }

    /// Set a unit's desired state back to `loaded`.
    pub async fn stop(&self, name: &str) -> Result<(), CoreError> {
        self.transition(name, DesiredState::Loaded).await
    }

    /// Set a unit's desired state to `inactive`.
    pub async fn unload(&self, name: &str) -> Result<(), CoreError> {
        self.transition(name, DesiredState::Inactive).await
    }

    /// Remove a unit from the cluster.
    pub async fn destroy(&self, name: &str) -> Result<(), CoreError> {
        self.backend().delete_unit(name).await?;
        info!(unit = name, "destroyed unit");
        Ok(())
    }

    /// The unit's current state as reported by fleet.
    pub async fn status(&self, name: &str) -> Result<DesiredState, CoreError> {
        let unit = self
            .backend()
            .get_unit(name)
            .await
            .map_err(|e| not_found_as_unit(e, name))?;

        unit.current_state.ok_or_else(|| CoreError::InvalidResponse {
            message: format!("unit '{name}' has no currentState"),
        })
    }

    async fn transition(&self, name: &str, state: DesiredState) -> Result<(), CoreError> {
        self.backend().set_desired_state(name, state).await?;
        info!(unit = name, desired = %state, "updated desired state");
        Ok(())
    }
}

/// Translate a 404 on a unit resource into [`CoreError::UnitNotFound`].
pub(crate) fn not_found_as_unit(err: fleet_api::Error, name: &str) -> CoreError {
    if err.is_not_found() {
        CoreError::UnitNotFound { name: name.into() }
    } else {
        err.into()
    }
}
