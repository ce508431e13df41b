// ── State reconciler ──
//
// Machines and unit states are polled independently and joined on machine
// ID. Every state yields exactly one entry, in backend order; a state on a
// machine that is not (or no longer) listed keeps a null IP.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use fleet_api::{Machine, StateFilter, UnitState};

use crate::error::CoreError;
use crate::fleet::Fleet;
use crate::ports::FleetBackend;

/// One row of the joined cluster view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FleetReportEntry {
    pub name: String,
    pub load_state: Option<String>,
    pub active_state: Option<String>,
    pub sub_state: Option<String>,
    pub machine_id: Option<String>,
    pub machine_ip: Option<String>,
}

/// Join unit states with the machines that report them.
///
/// When a machine ID is listed twice, the later listing's IP wins.
pub fn reconcile(machines: &[Machine], states: Vec<UnitState>) -> Vec<FleetReportEntry> {
    let ips: HashMap<&str, &str> = machines
        .iter()
        .filter_map(|m| Some((m.id.as_str(), m.primary_ip.as_deref()?)))
        .collect();

    states
        .into_iter()
        .map(|state| {
            let machine_ip = state
                .machine_id
                .as_deref()
                .and_then(|id| ips.get(id))
                .map(|ip| (*ip).to_owned());
            FleetReportEntry {
                name: state.name,
                load_state: state.systemd_load_state,
                active_state: state.systemd_active_state,
                sub_state: state.systemd_sub_state,
                machine_id: state.machine_id,
                machine_ip,
            }
        })
        .collect()
}

impl<B: FleetBackend> Fleet<B> {
    /// Current state of every unit on every machine.
    ///
    /// Machines are fetched first, then states; the two calls never overlap.
    pub async fn list(&self) -> Result<Vec<FleetReportEntry>, CoreError> {
        let machines = self.backend().list_machines().await?;
        let states = self.backend().list_states(&StateFilter::default()).await?;
        debug!(
            machines = machines.len(),
            states = states.len(),
            "reconciling unit states"
        );
        Ok(reconcile(&machines, states))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_support::{Call, FakeBackend};

    #[tokio::test]
    async fn joins_state_with_machine_ip() {
        let fake = FakeBackend::default()
            .with_machine(json!({ "id": "m1", "primaryIP": "10.0.0.1" }))
            .with_state(json!({
                "name": "web.service",
                "machineID": "m1",
                "systemdLoadState": "loaded",
                "systemdActiveState": "active",
                "systemdSubState": "running"
            }));
        let fleet = Fleet::with_backend(fake.clone());

        let report = fleet.list().await.unwrap();

        assert_eq!(
            report,
            vec![FleetReportEntry {
                name: "web.service".into(),
                load_state: Some("loaded".into()),
                active_state: Some("active".into()),
                sub_state: Some("running".into()),
                machine_id: Some("m1".into()),
                machine_ip: Some("10.0.0.1".into()),
            }]
        );
        assert_eq!(
            fake.calls(),
            vec![
                Call::ListMachines,
                Call::ListStates(StateFilter::default())
            ]
        );
    }

    #[tokio::test]
    async fn unknown_machine_keeps_entry_with_null_ip() {
        let fake = FakeBackend::default()
            .with_machine(json!({ "id": "m1", "primaryIP": "10.0.0.1" }))
            .with_state(json!({ "name": "a.service", "machineID": "m9" }));
        let fleet = Fleet::with_backend(fake);

        let report = fleet.list().await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].machine_id.as_deref(), Some("m9"));
        assert_eq!(report[0].machine_ip, None);
    }

    #[test]
    fn keeps_backend_order_and_duplicates() {
        let machines: Vec<Machine> = serde_json::from_value(json!([
            { "id": "m1", "primaryIP": "10.0.0.1" },
            { "id": "m2", "primaryIP": "10.0.0.2" }
        ]))
        .unwrap();
        let states: Vec<UnitState> = serde_json::from_value(json!([
            { "name": "z.service", "machineID": "m2" },
            { "name": "a.service", "machineID": "m1" },
            { "name": "a.service", "machineID": "m2" }
        ]))
        .unwrap();

        let report = reconcile(&machines, states);

        let rows: Vec<_> = report
            .iter()
            .map(|e| (e.name.as_str(), e.machine_ip.as_deref()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("z.service", Some("10.0.0.2")),
                ("a.service", Some("10.0.0.1")),
                ("a.service", Some("10.0.0.2")),
            ]
        );
    }

    #[test]
    fn duplicate_machine_ids_take_the_last_ip() {
        let machines: Vec<Machine> = serde_json::from_value(json!([
            { "id": "m1", "primaryIP": "10.0.0.1" },
            { "id": "m1", "primaryIP": "10.0.0.2" }
        ]))
        .unwrap();
        let states: Vec<UnitState> =
            serde_json::from_value(json!([{ "name": "a.service", "machineID": "m1" }])).unwrap();

        let report = reconcile(&machines, states);

        assert_eq!(report[0].machine_ip.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn empty_cluster_yields_empty_report() {
        assert!(reconcile(&[], Vec::new()).is_empty());
    }

    #[test]
    fn entry_serializes_null_ip() {
        let entry = FleetReportEntry {
            name: "a.service".into(),
            load_state: None,
            active_state: None,
            sub_state: None,
            machine_id: None,
            machine_ip: None,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["machine_ip"], serde_json::Value::Null);
    }
}
