// fleet v1 API wire types
//
// Collections come back as `{ "<resource>": [...], "nextPageToken": "..." }`.
// fleet omits empty arrays entirely, so every collection field defaults.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Desired / current state ──────────────────────────────────────────

/// The three target states fleet knows about.
///
/// Used both for the client-asserted `desiredState` and for the
/// `currentState` reported back on a unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DesiredState {
    Inactive,
    Loaded,
    Launched,
}

// ── Machines ─────────────────────────────────────────────────────────

/// A cluster member as reported by `GET machines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    #[serde(rename = "primaryIP", default)]
    pub primary_ip: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Catch-all for fields this client does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Unit states ──────────────────────────────────────────────────────

/// Observed systemd state of one unit on one machine (`GET state`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    pub name: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(rename = "machineID", default)]
    pub machine_id: Option<String>,
    #[serde(rename = "systemdLoadState", default)]
    pub systemd_load_state: Option<String>,
    #[serde(rename = "systemdActiveState", default)]
    pub systemd_active_state: Option<String>,
    #[serde(rename = "systemdSubState", default)]
    pub systemd_sub_state: Option<String>,
}

/// Optional filters for `GET state`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateFilter {
    pub unit_name: Option<String>,
}

impl StateFilter {
    /// Filter on a single unit name.
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            unit_name: Some(name.into()),
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref name) = self.unit_name {
            params.push(("unitName", name.clone()));
        }
        params
    }
}

// ── Units ────────────────────────────────────────────────────────────

/// One unit-file directive: `[section] name=value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOption {
    pub section: String,
    pub name: String,
    pub value: String,
}

/// A unit as returned by `GET units/{name}` and `GET units`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    #[serde(default)]
    pub options: Vec<UnitOption>,
    #[serde(default)]
    pub desired_state: Option<DesiredState>,
    #[serde(default)]
    pub current_state: Option<DesiredState>,
    #[serde(rename = "machineID", default)]
    pub machine_id: Option<String>,
}

/// Body of a unit creation `PUT units/{name}`.
///
/// New units are created `inactive`; the lifecycle verbs move them on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPayload {
    pub name: String,
    pub desired_state: DesiredState,
    pub options: Vec<UnitOption>,
}

impl UnitPayload {
    /// Render the options as unit-file text.
    ///
    /// Consecutive options sharing a section are grouped under one header.
    pub fn content(&self) -> String {
        let mut out = String::new();
        let mut current: Option<&str> = None;
        for opt in &self.options {
            if current != Some(opt.section.as_str()) {
                if current.is_some() {
                    out.push('\n');
                }
                let _ = writeln!(out, "[{}]", opt.section);
                current = Some(opt.section.as_str());
            }
            let _ = writeln!(out, "{}={}", opt.name, opt.value);
        }
        out
    }
}

/// Body of a desired-state transition `PUT units/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DesiredStateUpdate<'a> {
    pub desired_state: DesiredState,
    pub name: &'a str,
}

// ── Paged collections ────────────────────────────────────────────────

/// A single page of a paginated collection.
pub(crate) trait Paged {
    type Item;
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MachinePage {
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatePage {
    #[serde(default)]
    pub states: Vec<UnitState>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitPage {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Paged for MachinePage {
    type Item = Machine;
    fn into_parts(self) -> (Vec<Machine>, Option<String>) {
        (self.machines, self.next_page_token)
    }
}

impl Paged for StatePage {
    type Item = UnitState;
    fn into_parts(self) -> (Vec<UnitState>, Option<String>) {
        (self.states, self.next_page_token)
    }
}

impl Paged for UnitPage {
    type Item = Unit;
    fn into_parts(self) -> (Vec<Unit>, Option<String>) {
        (self.units, self.next_page_token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn desired_state_wire_format() {
        assert_eq!(serde_json::to_value(DesiredState::Launched).unwrap(), json!("launched"));
        assert_eq!("loaded".parse::<DesiredState>().unwrap(), DesiredState::Loaded);
        assert_eq!(DesiredState::Inactive.to_string(), "inactive");
    }

    #[test]
    fn unit_state_tolerates_missing_fields() {
        let state: UnitState = serde_json::from_value(json!({ "name": "a.service" })).unwrap();
        assert_eq!(state.name, "a.service");
        assert!(state.machine_id.is_none());
        assert!(state.systemd_sub_state.is_none());
    }

    #[test]
    fn empty_page_defaults_to_no_items() {
        let page: MachinePage = serde_json::from_value(json!({})).unwrap();
        let (items, token) = page.into_parts();
        assert!(items.is_empty());
        assert!(token.is_none());
    }

    #[test]
    fn payload_content_groups_sections() {
        let payload = UnitPayload {
            name: "web.service".into(),
            desired_state: DesiredState::Inactive,
            options: vec![
                UnitOption {
                    section: "Unit".into(),
                    name: "Description".into(),
                    value: "Web".into(),
                },
                UnitOption {
                    section: "Service".into(),
                    name: "ExecStartPre".into(),
                    value: "/bin/true".into(),
                },
                UnitOption {
                    section: "Service".into(),
                    name: "ExecStart".into(),
                    value: "/usr/bin/web".into(),
                },
            ],
        };

        assert_eq!(
            payload.content(),
            "[Unit]\nDescription=Web\n\n[Service]\nExecStartPre=/bin/true\nExecStart=/usr/bin/web\n"
        );
    }

    #[test]
    fn machine_keeps_unknown_fields() {
        let machine: Machine = serde_json::from_value(json!({
            "id": "m1",
            "primaryIP": "10.0.0.1",
            "metadata": { "region": "us-east" },
            "version": "1.0.0"
        }))
        .unwrap();
        assert_eq!(machine.primary_ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(machine.metadata.get("region").map(String::as_str), Some("us-east"));
        assert_eq!(machine.extra.get("version"), Some(&json!("1.0.0")));
    }
}
