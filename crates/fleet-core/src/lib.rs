//! Client-side control surface for fleet clusters.
//!
//! This crate sits between `fleet-api` (raw HTTP) and consumers such as
//! the `fleetctl` binary:
//!
//! - **[`Fleet`]**: Facade over a backend implementing the capability
//!   [`ports`]. Lifecycle verbs ([`submit`](Fleet::submit),
//!   [`load`](Fleet::load), [`start`](Fleet::start), [`stop`](Fleet::stop),
//!   [`unload`](Fleet::unload), [`destroy`](Fleet::destroy)) become
//!   idempotent desired-state transitions; [`status`](Fleet::status) reads a
//!   unit's current state back.
//!
//! - **Reconciliation**: [`Fleet::list`] fetches machines and unit states
//!   independently and joins them by machine ID into [`FleetReportEntry`]
//!   rows. [`Fleet::get_unit_state`] resolves the reported state of one unit.
//!
//! - **[`ServiceDefinition`]**: Declarative unit directives, translated
//!   into the wire [`UnitPayload`] by [`to_unit_payload`].
//!
//! Nothing is cached: every call goes to the backend and the result is
//! handed straight back.

pub mod config;
pub mod definition;
pub mod error;
pub mod fleet;
pub mod lifecycle;
pub mod lookup;
pub mod ports;
pub mod reconcile;
pub mod unit_name;

#[cfg(test)]
mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, FleetConfig, TlsVerification};
pub use definition::{DirectiveValue, IntoServiceDefinition, ServiceDefinition, to_unit_payload};
pub use error::CoreError;
pub use fleet::Fleet;
pub use ports::{FleetBackend, MachineQuery, StateQuery, UnitOps};
pub use reconcile::{FleetReportEntry, reconcile};
pub use unit_name::UnitName;

// Wire types callers handle directly.
pub use fleet_api::{DesiredState, Machine, Unit, UnitOption, UnitPayload, UnitState};
