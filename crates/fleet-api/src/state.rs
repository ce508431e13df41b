// Unit state endpoints
//
// `GET state` reports what systemd on each machine actually did with a
// unit. Results can be narrowed to a single unit name.

use tracing::debug;

use crate::client::FleetClient;
use crate::error::Error;
use crate::models::{StateFilter, StatePage, UnitState};

impl FleetClient {
    /// List unit states, optionally filtered.
    ///
    /// `GET fleet/{version}/state[?unitName=..]`
    pub async fn list_states(&self, filter: &StateFilter) -> Result<Vec<UnitState>, Error> {
        debug!(?filter, "listing unit states");
        self.get_all::<StatePage>("state", &filter.query()).await
    }
}
