#![allow(clippy::unwrap_used)]
// In-memory backend that records every call, for driver unit tests.

use std::sync::{Arc, Mutex};

use fleet_api::{DesiredState, Error, Machine, StateFilter, Unit, UnitPayload, UnitState};
use serde_json::Value;

use crate::ports::{MachineQuery, StateQuery, UnitOps};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListMachines,
    ListStates(StateFilter),
    ListUnits,
    GetUnit(String),
    Create(String),
    SetState(String, DesiredState),
    Delete(String),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    machines: Vec<Machine>,
    states: Vec<UnitState>,
    units: Vec<Unit>,
    create_error: Option<Error>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn with_machine(self, machine: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .machines
            .push(serde_json::from_value(machine).unwrap());
        self
    }

    pub fn with_state(self, state: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .states
            .push(serde_json::from_value(state).unwrap());
        self
    }

    pub fn with_unit(self, unit: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .units
            .push(serde_json::from_value(unit).unwrap());
        self
    }

    /// The next `create_unit` fails with `err`.
    pub fn fail_create(self, err: Error) -> Self {
        self.state.lock().unwrap().create_error = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl MachineQuery for FakeBackend {
    async fn list_machines(&self) -> Result<Vec<Machine>, Error> {
        self.record(Call::ListMachines);
        Ok(self.state.lock().unwrap().machines.clone())
    }
}

impl StateQuery for FakeBackend {
    async fn list_states(&self, filter: &StateFilter) -> Result<Vec<UnitState>, Error> {
        self.record(Call::ListStates(filter.clone()));
        let state = self.state.lock().unwrap();
        Ok(state
            .states
            .iter()
            .filter(|s| filter.unit_name.as_ref().is_none_or(|n| *n == s.name))
            .cloned()
            .collect())
    }
}

impl UnitOps for FakeBackend {
    async fn list_units(&self) -> Result<Vec<Unit>, Error> {
        self.record(Call::ListUnits);
        Ok(self.state.lock().unwrap().units.clone())
    }

    async fn get_unit(&self, name: &str) -> Result<Unit, Error> {
        self.record(Call::GetUnit(name.into()));
        self.state
            .lock()
            .unwrap()
            .units
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                path: format!("fleet/v1/units/{name}"),
            })
    }

    async fn create_unit(&self, name: &str, _payload: &UnitPayload) -> Result<(), Error> {
        self.record(Call::Create(name.into()));
        match self.state.lock().unwrap().create_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn set_desired_state(&self, name: &str, state: DesiredState) -> Result<(), Error> {
        self.record(Call::SetState(name.into(), state));
        Ok(())
    }

    async fn delete_unit(&self, name: &str) -> Result<(), Error> {
        self.record(Call::Delete(name.into()));
        Ok(())
    }
}
