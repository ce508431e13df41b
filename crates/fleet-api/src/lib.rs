// fleet-api: Async Rust client for the fleet cluster init system HTTP API.
//
// Endpoint groups (machines, units, state) are implemented as inherent
// methods on `FleetClient` in separate modules; `client` holds the
// transport mechanics.

pub mod auth;
pub mod client;
pub mod error;
pub mod machines;
pub mod models;
pub mod state;
pub mod transport;
pub mod units;

pub use auth::Credentials;
pub use client::FleetClient;
pub use error::Error;
pub use models::{DesiredState, Machine, StateFilter, Unit, UnitOption, UnitPayload, UnitState};
pub use transport::{TlsMode, TransportConfig};
