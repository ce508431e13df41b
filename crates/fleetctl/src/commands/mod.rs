//! Command dispatch: bridges CLI args -> `Fleet` calls -> output formatting.

pub mod config_cmd;
pub mod machines;
pub mod units;
pub mod util;

use fleet_core::Fleet;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a cluster-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, fleet: &Fleet, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::ListUnits(args) => units::list_units(fleet, &args, global).await,
        Command::ListUnitFiles(args) => units::list_unit_files(fleet, &args, global).await,
        Command::ListMachines(args) => machines::list(fleet, &args, global).await,
        Command::Submit(args) => units::submit(fleet, args, global).await,
        Command::Load(args) => units::load(fleet, args, global).await,
        Command::Start(args) => units::start(fleet, args, global).await,
        Command::Stop(args) => units::stop(fleet, args, global).await,
        Command::Unload(args) => units::unload(fleet, args, global).await,
        Command::Destroy(args) => units::destroy(fleet, args, global).await,
        Command::Status(args) => units::status(fleet, args, global).await,
        Command::UnitState(args) => units::unit_state(fleet, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
