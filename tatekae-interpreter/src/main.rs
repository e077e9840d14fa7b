#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod cli;

use clap::Parser;
use cli::{Args, OutputFormat};
use std::{borrow::Cow, fs, process};
use tatekae_application::{
    ExpenseSettlement, GroupSnapshot, SettlementService, SettlementSummary, SnapshotValidator,
};
use tatekae_domain::ExpenseId;
use tatekae_presentation::{SettlementPresenter, format_settlement_error};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let env_file = bootstrap::load_env();
    let args = Args::parse();
    bootstrap::init_logging();
    bootstrap::report_env(&env_file);

    let source = fs::read_to_string(&args.snapshot).map_err(|err| {
        format!("Failed to read '{}': {err}", args.snapshot.display())
    })?;
    let snapshot: GroupSnapshot = serde_json::from_str(&source)
        .map_err(|err| format!("Invalid group snapshot: {err}"))?;
    let group = SnapshotValidator
        .validate(&snapshot)
        .map_err(|err| err.to_string())?;

    let policy = args.policy(&group);
    let tilt = args.tilt_plan();

    let output = match &args.expense {
        Some(id) => {
            let expense_id = ExpenseId::from(id.as_str());
            let settlement = SettlementService
                .settle_expense(&group, &expense_id, tilt.mode_of(&expense_id), &policy)
                .map_err(|err| format_settlement_error(&err))?;
            render_expense(&settlement, args.format)?
        }
        None => {
            let summary = SettlementService
                .summarize(&group, &tilt, &policy)
                .map_err(|err| format_settlement_error(&err))?;
            render_summary(&summary, args.format)?
        }
    };

    println!("{output}");
    Ok(())
}

fn render_summary(summary: &SettlementSummary, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "{}\n{}",
            SettlementPresenter::balance_table(summary),
            SettlementPresenter::settlement_text(summary)
        )),
        OutputFormat::Json => to_json(summary),
    }
}

fn render_expense(settlement: &ExpenseSettlement, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(SettlementPresenter::expense_text(settlement)),
        OutputFormat::Json => to_json(settlement),
    }
}

fn to_json(value: &impl serde::Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| format!("Failed to serialize output: {err}").into())
}
