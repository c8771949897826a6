use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use sunx_commission::commission::{
    report, sample, snapshot_from_json_path, CommissionReport, CommissionRun, HierarchySnapshot,
    RuleConfig, Sale, SalesCsvImporter,
};
use sunx_commission::config::AppConfig;
use sunx_commission::error::AppError;
use sunx_commission::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "SUNX Commission Engine",
    about = "Evaluate reseller commission batches and qualification dashboards from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a sales batch and print the commission report (default)
    Run(RunArgs),
    /// Print standalone qualification summaries for the network
    Eligibility(EligibilityArgs),
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Hierarchy snapshot JSON (defaults to the built-in demo network)
    #[arg(long)]
    hierarchy: Option<PathBuf>,
    /// Sales CSV export (defaults to the built-in demo batch)
    #[arg(long)]
    sales: Option<PathBuf>,
    /// Evaluation date for promotion tracking (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Emit the full report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Default)]
struct EligibilityArgs {
    /// Hierarchy snapshot JSON (defaults to the built-in demo network)
    #[arg(long)]
    hierarchy: Option<PathBuf>,
    /// Evaluation date for promotion tracking (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Emit the summaries as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Command::Run(RunArgs::default()));

    match command {
        Command::Run(args) => run_batch(args, &config),
        Command::Eligibility(args) => run_eligibility(args, &config),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn load_snapshot(path: Option<PathBuf>) -> Result<HierarchySnapshot, AppError> {
    match path {
        Some(path) => Ok(snapshot_from_json_path(path)?),
        None => Ok(sample::demo_network()),
    }
}

fn load_sales(path: Option<PathBuf>) -> Result<Vec<Sale>, AppError> {
    match path {
        Some(path) => {
            let import = SalesCsvImporter::from_path(path)?;
            for warning in &import.warnings {
                eprintln!("warning: line {}: {}", warning.line, warning.reason);
            }
            Ok(import.sales)
        }
        None => Ok(sample::demo_sales()),
    }
}

fn resolve_as_of(arg: Option<NaiveDate>, config: &AppConfig) -> NaiveDate {
    arg.or(config.reporting.as_of)
        .unwrap_or_else(|| Local::now().date_naive())
}

fn run_batch(args: RunArgs, config: &AppConfig) -> Result<(), AppError> {
    let as_of = resolve_as_of(args.as_of, config);
    let snapshot = load_snapshot(args.hierarchy)?;
    let sales = load_sales(args.sales)?;
    let rules = RuleConfig::sunx_standard();

    let run = CommissionRun::execute(&sales, &snapshot, &rules)?;
    info!(
        sales = sales.len(),
        entries = run.entries.len(),
        skipped = run.skipped.len(),
        "batch evaluated"
    );

    let report = CommissionReport::build(&run, &snapshot, &rules, as_of);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).expect("report serializes"));
    } else {
        render_report(&report);
    }
    Ok(())
}

fn run_eligibility(args: EligibilityArgs, config: &AppConfig) -> Result<(), AppError> {
    let as_of = resolve_as_of(args.as_of, config);
    let snapshot = load_snapshot(args.hierarchy)?;
    let rules = RuleConfig::sunx_standard();
    rules.validate().map_err(AppError::from)?;

    let overrides = report::override_qualifications(&snapshot, &rules);
    let service_fees = report::service_fee_status(&snapshot, &rules);
    let promotions = report::promotion_candidates(&snapshot, &rules, as_of);

    if args.json {
        let payload = serde_json::json!({
            "as_of": as_of,
            "override_qualifications": overrides,
            "service_fee_status": service_fees,
            "promotion_candidates": promotions,
        });
        println!("{}", serde_json::to_string_pretty(&payload).expect("payload serializes"));
        return Ok(());
    }

    println!("Qualification summary (as of {as_of})");

    println!("\nIBO group override tiers");
    for view in &overrides {
        println!(
            "- {} ({}): {} qualifying BPs, {}",
            view.name,
            view.reseller_id,
            view.qualifying_directs,
            view.tier.unwrap_or("no override")
        );
    }

    println!("\nBD service fee status");
    for view in &service_fees {
        println!(
            "- {} ({}): {}/{} active IBOs, {}",
            view.name,
            view.reseller_id,
            view.active_ibos,
            view.required_ibos,
            view.tier.unwrap_or("not qualified")
        );
    }

    println!("\nBP promotion tracking");
    for view in &promotions {
        println!(
            "- {} ({}): {}% of {} pesos, month {}/{}, needs {}",
            view.name,
            view.reseller_id,
            view.progress_pct,
            view.volume_threshold,
            view.months_tracked,
            view.months_tracked + view.months_remaining,
            view.volume_needed
        );
    }

    Ok(())
}

fn render_report(report: &CommissionReport) {
    println!("Commission run (as of {})", report.as_of);
    println!("Total payout: {} pesos", report.total_payout);

    println!("\nCommission by type");
    for kind in &report.totals_by_kind {
        println!(
            "- {}: {} pesos across {} entries",
            kind.kind_label, kind.total, kind.entry_count
        );
    }

    println!("\nTop earners");
    for recipient in &report.recipients {
        println!(
            "- {} ({}, {}): {} pesos from {} entries",
            recipient.name,
            recipient.reseller_id,
            recipient.rank_label,
            recipient.total,
            recipient.entry_count
        );
    }

    if !report.skipped_sales.is_empty() {
        println!("\nSkipped sales");
        for skipped in &report.skipped_sales {
            println!("- sale {}: {}", skipped.sale_id, skipped.reason);
        }
    }

    println!("\nIBO override qualifications");
    for view in &report.override_qualifications {
        println!(
            "- {}: {} qualifying BPs, {}",
            view.name,
            view.qualifying_directs,
            view.tier.unwrap_or("no override")
        );
    }

    println!("\nBD service fee status");
    for view in &report.service_fee_status {
        println!(
            "- {}: {}/{} active IBOs, {}",
            view.name,
            view.active_ibos,
            view.required_ibos,
            view.tier.unwrap_or("not qualified")
        );
    }

    println!("\nBP promotion tracking");
    for view in &report.promotion_candidates {
        let status = if view.eligible {
            "eligible".to_string()
        } else {
            format!("{}%", view.progress_pct)
        };
        println!(
            "- {}: {} (needs {} more pesos)",
            view.name, status, view.volume_needed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_date("2024-07-31"),
            Ok(NaiveDate::from_ymd_opt(2024, 7, 31).expect("valid date"))
        );
        assert!(parse_date("31/07/2024").is_err());
    }

    #[test]
    fn demo_batch_produces_a_report() {
        let snapshot = sample::demo_network();
        let sales = sample::demo_sales();
        let rules = RuleConfig::sunx_standard();

        let run = CommissionRun::execute(&sales, &snapshot, &rules).expect("batch runs");
        let report = CommissionReport::build(
            &run,
            &snapshot,
            &rules,
            NaiveDate::from_ymd_opt(2024, 7, 31).expect("valid date"),
        );

        assert!(report.total_payout > 0);
        assert_eq!(report.totals_by_kind.len(), 5);
        assert!(report.skipped_sales.is_empty());
    }
}
