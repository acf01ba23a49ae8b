use std::collections::HashMap;
use std::fmt::Write;

use tracing::warn;

use postaja_autopilot::{Plan, Scheduler};
use postaja_core::{
    AutopilotConfig, CatalogSource, History, HistorySource, JsonFileCatalog, JsonFileHistory,
    Product,
};

use super::PlanArgs;

struct Inputs {
    config: AutopilotConfig,
    catalog: Vec<Product>,
    history: History,
}

fn load(args: &PlanArgs) -> anyhow::Result<Inputs> {
    let config = args.horizon.load_config()?;
    let catalog = JsonFileCatalog::new(&args.catalog).snapshot()?;
    let history = match &args.history {
        Some(path) => JsonFileHistory::new(path).history()?,
        None => History::new(),
    };
    Ok(Inputs {
        config,
        catalog,
        history,
    })
}

pub fn plan(args: &PlanArgs, force: bool, format: &str) -> anyhow::Result<()> {
    let inputs = load(args)?;
    match plan_enabled(&inputs, args, force)? {
        Some(plan) => print_plan(&plan, &inputs.catalog, format),
        None => Ok(()),
    }
}

/// Full plan, or `None` when the rule is disabled and not forced.
fn plan_enabled(inputs: &Inputs, args: &PlanArgs, force: bool) -> anyhow::Result<Option<Plan>> {
    if !inputs.config.enabled && !force {
        warn!("autopilot is disabled in {}, nothing planned (use --force)", args.horizon.config);
        return Ok(None);
    }

    let plan = Scheduler::new(&inputs.config).plan(
        &inputs.catalog,
        &inputs.history,
        args.horizon.start_date(),
        args.horizon.days,
    )?;
    Ok(Some(plan))
}

pub fn simulate(args: &PlanArgs, limit: usize, format: &str) -> anyhow::Result<()> {
    let inputs = load(args)?;
    let plan = Scheduler::new(&inputs.config).preview(
        &inputs.catalog,
        &inputs.history,
        args.horizon.start_date(),
        args.horizon.days,
        limit,
    )?;
    print_plan(&plan, &inputs.catalog, format)
}

fn print_plan(plan: &Plan, catalog: &[Product], format: &str) -> anyhow::Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(plan)?),
        _ => print!("{}", format_plan(plan, catalog)),
    }
    Ok(())
}

/// Human-readable plan: one line per post, then any diagnostics.
pub fn format_plan(plan: &Plan, catalog: &[Product]) -> String {
    let names: HashMap<&str, &str> = catalog
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Plan from {} ({} days): {} post(s)",
        plan.horizon_start,
        plan.horizon_days,
        plan.assignments.len()
    );
    for assignment in &plan.assignments {
        let name = names.get(assignment.product_id.as_str()).copied().unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}  {:<13} {} {}",
            assignment.slot,
            assignment.objective.as_str(),
            assignment.product_id,
            name
        );
    }

    if !plan.diagnostics.is_empty() {
        let _ = writeln!(out, "\nDiagnostics:");
        for diagnostic in &plan.diagnostics {
            let _ = writeln!(out, "  - {}", diagnostic.describe());
        }
    }
    if let Some(summary) = plan.summary() {
        let _ = writeln!(out, "\n⚠ {summary}");
    }
    out
}
