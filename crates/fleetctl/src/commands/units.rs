//! Unit command handlers.
//!
//! Multi-unit commands act on each unit in argument order and stop at the
//! first failure.

use std::future::Future;
use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use fleet_core::{
    CoreError, DesiredState, Fleet, FleetReportEntry, ServiceDefinition, Unit, UnitState,
};

use crate::cli::{GlobalOpts, ListArgs, SubmitArgs, UnitStateArgs, UnitsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "UNIT")]
    name: String,
    #[tabled(rename = "MACHINE")]
    machine: String,
    #[tabled(rename = "LOAD")]
    load: String,
    #[tabled(rename = "ACTIVE")]
    active: String,
    #[tabled(rename = "SUB")]
    sub: String,
}

impl ReportRow {
    fn new(e: &FleetReportEntry, full: bool, color: bool) -> Self {
        let machine = match (&e.machine_id, &e.machine_ip) {
            (Some(id), Some(ip)) => format!("{}/{ip}", output::short_id(id, full)),
            (Some(id), None) => output::short_id(id, full),
            (None, _) => "-".into(),
        };
        Self {
            name: e.name.clone(),
            machine,
            load: dash(e.load_state.as_deref()),
            active: output::paint_state(&dash(e.active_state.as_deref()), color),
            sub: output::paint_state(&dash(e.sub_state.as_deref()), color),
        }
    }
}

#[derive(Tabled)]
struct UnitFileRow {
    #[tabled(rename = "UNIT")]
    name: String,
    #[tabled(rename = "DSTATE")]
    desired: String,
    #[tabled(rename = "STATE")]
    current: String,
    #[tabled(rename = "TARGET")]
    target: String,
}

impl UnitFileRow {
    fn new(u: &Unit, full: bool) -> Self {
        Self {
            name: u.name.clone(),
            desired: state_str(u.desired_state),
            current: state_str(u.current_state),
            target: u
                .machine_id
                .as_deref()
                .map_or_else(|| "-".into(), |id| output::short_id(id, full)),
        }
    }
}

#[derive(Serialize)]
struct UnitStatus {
    name: String,
    current_state: DesiredState,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "UNIT")]
    name: String,
    #[tabled(rename = "STATE")]
    state: String,
}

fn dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

fn state_str(state: Option<DesiredState>) -> String {
    state.map_or_else(|| "-".into(), |s| s.to_string())
}

fn detail(s: &UnitState) -> String {
    [
        ("Unit", Some(s.name.as_str())),
        ("Machine", s.machine_id.as_deref()),
        ("Load", s.systemd_load_state.as_deref()),
        ("Active", s.systemd_active_state.as_deref()),
        ("Sub", s.systemd_sub_state.as_deref()),
        ("Hash", s.hash.as_deref()),
    ]
    .iter()
    .map(|(label, value)| format!("{label:<8} {}", value.unwrap_or("-")))
    .collect::<Vec<_>>()
    .join("\n")
}

fn report(global: &GlobalOpts, verb: &str, name: &str) {
    if !global.quiet {
        eprintln!("Unit {name} {verb}");
    }
}

/// Run `op` for each unit argument in order.
async fn each_unit<F, Fut>(
    units: Vec<String>,
    verb: &str,
    global: &GlobalOpts,
    op: F,
) -> Result<(), CliError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), CoreError>>,
{
    for arg in units {
        let name = util::unit_name_arg(&arg)?;
        op(name.clone()).await?;
        report(global, verb, &name);
    }
    Ok(())
}

/// Split an argument into a unit name and, for files, its definition.
fn unit_with_definition(arg: &str) -> Result<(String, Option<ServiceDefinition>), CliError> {
    if util::is_definition_path(arg) {
        let path = Path::new(arg);
        Ok((
            util::unit_name_from_path(path)?,
            Some(util::read_definition_file(path)?),
        ))
    } else {
        Ok((arg.to_owned(), None))
    }
}

// ── Listings ────────────────────────────────────────────────────────

pub async fn list_units(
    fleet: &Fleet,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = fleet.list().await?;
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &entries,
        |e| ReportRow::new(e, args.full, color),
        |e| e.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn list_unit_files(
    fleet: &Fleet,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let units = fleet.list_units().await?;
    let out = output::render_list(
        &global.output,
        &units,
        |u| UnitFileRow::new(u, args.full),
        |u| u.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Lifecycle ───────────────────────────────────────────────────────

pub async fn submit(fleet: &Fleet, args: SubmitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    for path in &args.files {
        let name = util::unit_name_from_path(path)?;
        let definition = util::read_definition_file(path)?;
        fleet.submit(&name, definition).await?;
        report(global, "submitted", &name);
    }
    Ok(())
}

pub async fn load(fleet: &Fleet, args: UnitsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    for arg in &args.units {
        let (name, definition) = unit_with_definition(arg)?;
        fleet.load(&name, definition).await?;
        report(global, "loaded", &name);
    }
    Ok(())
}

/// Launch units; definition files are submitted and loaded first.
pub async fn start(fleet: &Fleet, args: UnitsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    for arg in &args.units {
        let (name, definition) = unit_with_definition(arg)?;
        if definition.is_some() {
            fleet.load(&name, definition).await?;
        }
        fleet.start(&name).await?;
        report(global, "launched", &name);
    }
    Ok(())
}

pub async fn stop(fleet: &Fleet, args: UnitsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    each_unit(args.units, "stopped", global, |name| async move {
        fleet.stop(&name).await
    })
    .await
}

pub async fn unload(fleet: &Fleet, args: UnitsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    each_unit(args.units, "unloaded", global, |name| async move {
        fleet.unload(&name).await
    })
    .await
}

pub async fn destroy(fleet: &Fleet, args: UnitsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let prompt = format!(
        "Destroy {}? This removes the unit(s) from the cluster.",
        args.units.join(", ")
    );
    if !util::confirm(&prompt, "destroy", global.yes)? {
        return Ok(());
    }
    each_unit(args.units, "destroyed", global, |name| async move {
        fleet.destroy(&name).await
    })
    .await
}

// ── State ───────────────────────────────────────────────────────────

pub async fn status(fleet: &Fleet, args: UnitsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut statuses = Vec::with_capacity(args.units.len());
    for arg in &args.units {
        let name = util::unit_name_arg(arg)?;
        let current_state = fleet.status(&name).await?;
        statuses.push(UnitStatus {
            name,
            current_state,
        });
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &statuses,
        |s| StatusRow {
            name: s.name.clone(),
            state: output::paint_state(&s.current_state.to_string(), color),
        },
        |s| format!("{} {}", s.name, s.current_state),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn unit_state(
    fleet: &Fleet,
    args: UnitStateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let name = util::unit_name_arg(&args.unit)?;
    let state = fleet.get_unit_state(&name).await?;
    let out = output::render_single(&global.output, &state, detail, |s| {
        s.systemd_sub_state.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
