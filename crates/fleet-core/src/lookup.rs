// Single-unit state lookup: `GET state?unitName=NAME`, first match wins.

use fleet_api::{StateFilter, UnitState};

use crate::error::CoreError;
use crate::fleet::Fleet;
use crate::ports::FleetBackend;

impl<B: FleetBackend> Fleet<B> {
    /// Reported state of one unit.
    ///
    /// When the unit runs on several machines, the first state fleet
    /// returns is used. No states at all means [`CoreError::UnitNotFound`].
    pub async fn get_unit_state(&self, name: &str) -> Result<UnitState, CoreError> {
        self.backend()
            .list_states(&StateFilter::unit(name))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::UnitNotFound { name: name.into() })
    }
}
