//! Machine command handlers.

use tabled::Tabled;

use fleet_core::{Fleet, Machine};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MachineRow {
    #[tabled(rename = "MACHINE")]
    id: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "METADATA")]
    metadata: String,
}

impl MachineRow {
    fn new(m: &Machine, full: bool) -> Self {
        Self {
            id: output::short_id(&m.id, full),
            ip: m.primary_ip.clone().unwrap_or_else(|| "-".into()),
            metadata: if m.metadata.is_empty() {
                "-".into()
            } else {
                m.metadata
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(",")
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn list(fleet: &Fleet, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let machines = fleet.list_machines().await?;
    let out = output::render_list(
        &global.output,
        &machines,
        |m| MachineRow::new(m, args.full),
        |m| m.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
