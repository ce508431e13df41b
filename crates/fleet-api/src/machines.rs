// Machine endpoints

use tracing::debug;

use crate::client::FleetClient;
use crate::error::Error;
use crate::models::{Machine, MachinePage};

impl FleetClient {
    /// List every machine in the cluster.
    ///
    /// `GET fleet/{version}/machines`, following `nextPageToken`.
    pub async fn list_machines(&self) -> Result<Vec<Machine>, Error> {
        debug!("listing machines");
        self.get_all::<MachinePage>("machines", &[]).await
    }
}
