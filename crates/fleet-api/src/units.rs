// Unit endpoints
//
// fleet uses a single `PUT units/{name}` for both creation (body carries
// options) and desired-state transitions (body carries only the state).

use tracing::debug;

use crate::client::FleetClient;
use crate::error::Error;
use crate::models::{DesiredState, DesiredStateUpdate, Unit, UnitPage, UnitPayload};

impl FleetClient {
    /// List every unit known to the cluster.
    ///
    /// `GET fleet/{version}/units`, following `nextPageToken`.
    pub async fn list_units(&self) -> Result<Vec<Unit>, Error> {
        debug!("listing units");
        self.get_all::<UnitPage>("units", &[]).await
    }

    /// Fetch a single unit, including its `currentState`.
    ///
    /// `GET fleet/{version}/units/{name}`
    pub async fn get_unit(&self, name: &str) -> Result<Unit, Error> {
        debug!(name, "fetching unit");
        self.get("units", &[name], &[]).await
    }

    /// Create a unit from a translated payload.
    ///
    /// `PUT fleet/{version}/units/{name}`. An existing unit answers with
    /// 409/412, surfaced as [`Error::PreconditionFailed`].
    pub async fn create_unit(&self, name: &str, payload: &UnitPayload) -> Result<(), Error> {
        debug!(name, options = payload.options.len(), "creating unit");
        self.put("units", &[name], payload).await
    }

    /// Set a unit's desired state.
    ///
    /// `PUT fleet/{version}/units/{name}` with `{"desiredState", "name"}`
    pub async fn set_desired_state(&self, name: &str, state: DesiredState) -> Result<(), Error> {
        debug!(name, %state, "updating desired state");
        let body = DesiredStateUpdate {
            desired_state: state,
            name,
        };
        self.put("units", &[name], &body).await
    }

    /// Remove a unit from the cluster.
    ///
    /// `DELETE fleet/{version}/units/{name}`
    pub async fn delete_unit(&self, name: &str) -> Result<(), Error> {
        debug!(name, "deleting unit");
        self.delete("units", &[name]).await
    }
}
