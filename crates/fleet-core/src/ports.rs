// ── Backend capability ports ──
//
// The driver, reconciler and lookup only need these three narrow
// capabilities. `FleetClient` implements all of them; tests substitute
// an in-memory fake. Errors stay at the transport level so callers can
// match on conflicts and not-found precisely.

use std::future::Future;

use fleet_api::{
    DesiredState, Error, FleetClient, Machine, StateFilter, Unit, UnitPayload, UnitState,
};

/// Read access to cluster membership.
pub trait MachineQuery: Send + Sync {
    fn list_machines(&self) -> impl Future<Output = Result<Vec<Machine>, Error>> + Send;
}

/// Read access to reported unit states.
pub trait StateQuery: Send + Sync {
    fn list_states(
        &self,
        filter: &StateFilter,
    ) -> impl Future<Output = Result<Vec<UnitState>, Error>> + Send;
}

/// Unit creation, desired-state transitions and removal.
pub trait UnitOps: Send + Sync {
    fn list_units(&self) -> impl Future<Output = Result<Vec<Unit>, Error>> + Send;

    fn get_unit(&self, name: &str) -> impl Future<Output = Result<Unit, Error>> + Send;

    fn create_unit(
        &self,
        name: &str,
        payload: &UnitPayload,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn set_desired_state(
        &self,
        name: &str,
        state: DesiredState,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn delete_unit(&self, name: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Everything [`Fleet`](crate::Fleet) needs from a backend.
pub trait FleetBackend: MachineQuery + StateQuery + UnitOps {}

impl<T: MachineQuery + StateQuery + UnitOps> FleetBackend for T {}

// ── HTTP implementation ──────────────────────────────────────────────

impl MachineQuery for FleetClient {
    async fn list_machines(&self) -> Result<Vec<Machine>, Error> {
        FleetClient::list_machines(self).await
    }
}

impl StateQuery for FleetClient {
    async fn list_states(&self, filter: &StateFilter) -> Result<Vec<UnitState>, Error> {
        FleetClient::list_states(self, filter).await
    }
}

impl UnitOps for FleetClient {
    async fn list_units(&self) -> Result<Vec<Unit>, Error> {
        FleetClient::list_units(self).await
    }

    async fn get_unit(&self, name: &str) -> Result<Unit, Error> {
        FleetClient::get_unit(self, name).await
    }

    async fn create_unit(&self, name: &str, payload: &UnitPayload) -> Result<(), Error> {
        FleetClient::create_unit(self, name, payload).await
    }

    async fn set_desired_state(&self, name: &str, state: DesiredState) -> Result<(), Error> {
        FleetClient::set_desired_state(self, name, state).await
    }

    async fn delete_unit(&self, name: &str) -> Result<(), Error> {
        FleetClient::delete_unit(self, name).await
    }
}
