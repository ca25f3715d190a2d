use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use venue_audit::audit::{
    assign_tier, filter_year, simulate, ExchangeRate, PortfolioAudit, PortfolioAuditor,
    ReferenceTables, RentReduction, SemaphoreColor, SimulationResult, VenueHighlight,
    VenueMetrics,
};
use venue_audit::config::AppConfig;
use venue_audit::error::AppError;
use venue_audit::format::{format_ars, format_multiplier, format_percentage, format_usd, NO_DATA};
use venue_audit::import::VenueImporter;
use venue_audit::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "venue-audit",
    about = "Audit an event-venue portfolio against rent, market, and contract references",
    version
)]
struct Cli {
    /// Override the configured log level or filter directive
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every venue in a portfolio export
    Audit(AuditArgs),
    /// Project margin and rent incidence under a rent reduction
    Simulate(SimulateArgs),
    /// Show the market tier assigned to a venue location
    Tier(TierArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Portfolio CSV export
    #[arg(long)]
    input: PathBuf,
    /// Venue ids to drop at import (comma separated)
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<u32>,
}

#[derive(Args, Debug)]
struct AuditArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Only audit rows for this year
    #[arg(long)]
    year: Option<i32>,
    /// Override the configured USD to ARS rate
    #[arg(long, value_parser = parse_rate)]
    rate: Option<ExchangeRate>,
    /// JSON file replacing the builtin tier reference tables
    #[arg(long)]
    reference: Option<PathBuf>,
    /// Report date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Venue id to simulate
    #[arg(long)]
    venue: u32,
    /// Pick the row for this year when the export holds several
    #[arg(long)]
    year: Option<i32>,
    /// Rent reduction percentage between 0 and 50
    #[arg(long, value_parser = parse_reduction)]
    reduction: RentReduction,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct TierArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    municipality: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct AuditResponse<'a> {
    generated_on: NaiveDate,
    year: Option<i32>,
    #[serde(flatten)]
    report: &'a PortfolioAudit,
}

#[derive(Debug, Serialize)]
struct SimulationResponse<'a> {
    venue_id: u32,
    name: &'a str,
    baseline: &'a SimulationResult,
    simulated: &'a SimulationResult,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(level) = cli.log_level {
        config.telemetry.log_level = level;
    }

    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Audit(args) => run_audit(args, &config),
        Command::Simulate(args) => run_simulate(args),
        Command::Tier(args) => {
            println!("{}", tier_text(&args));
            Ok(())
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_rate(raw: &str) -> Result<ExchangeRate, String> {
    let value = parse_number(raw)?;
    ExchangeRate::new(value).map_err(|err| err.to_string())
}

fn parse_reduction(raw: &str) -> Result<RentReduction, String> {
    let value = parse_number(raw)?;
    RentReduction::new(value).map_err(|err| err.to_string())
}

fn parse_number(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))
}

fn import_venues(input: &InputArgs) -> Result<Vec<VenueMetrics>, AppError> {
    let importer = VenueImporter::new().excluding(input.exclude.iter().copied());
    Ok(importer.from_path(&input.input)?)
}

fn run_audit(args: AuditArgs, config: &AppConfig) -> Result<(), AppError> {
    let AuditArgs {
        input,
        year,
        rate,
        reference,
        today,
        format,
    } = args;

    let venues = import_venues(&input)?;
    let venues = match year {
        Some(year) => filter_year(&venues, year),
        None => venues,
    };

    let tables = match reference {
        Some(path) => {
            info!(path = %path.display(), "loading reference tables");
            ReferenceTables::from_json(&std::fs::read_to_string(path)?)?
        }
        None => ReferenceTables::builtin(),
    };

    let mut settings = config.audit.settings(Arc::new(tables));
    if let Some(rate) = rate {
        settings.exchange_rate = Some(rate);
    }

    let report = PortfolioAuditor::new(settings).audit(&venues);
    let generated_on = today.unwrap_or_else(|| Local::now().date_naive());

    let output = match format {
        OutputFormat::Text => audit_report_text(&report, generated_on),
        OutputFormat::Json => serde_json::to_string_pretty(&AuditResponse {
            generated_on,
            year,
            report: &report,
        })?,
    };
    println!("{output}");
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        input,
        venue,
        year,
        reduction,
        format,
    } = args;

    let venues = import_venues(&input)?;
    let metrics = venues
        .iter()
        .find(|candidate| {
            candidate.id == venue && year.map_or(true, |year| candidate.year == Some(year))
        })
        .ok_or(AppError::VenueNotFound(venue))?;

    let baseline = simulate(metrics, RentReduction::NONE)?;
    let simulated = simulate(metrics, reduction)?;

    let output = match format {
        OutputFormat::Text => simulation_text(metrics, &baseline, &simulated),
        OutputFormat::Json => serde_json::to_string_pretty(&SimulationResponse {
            venue_id: metrics.id,
            name: &metrics.name,
            baseline: &baseline,
            simulated: &simulated,
        })?,
    };
    println!("{output}");
    Ok(())
}

fn tier_text(args: &TierArgs) -> String {
    let tier = assign_tier(args.municipality.as_deref(), &args.name);
    let definition = tier.definition();
    format!("{tier} ({}): {}", definition.name, definition.description)
}

fn audit_report_text(report: &PortfolioAudit, generated_on: NaiveDate) -> String {
    let summary = &report.summary;
    let mut lines = vec![
        format!("Venue portfolio audit ({generated_on})"),
        format!(
            "Venues: {} ({} active)",
            summary.venue_count, summary.active_count
        ),
        String::new(),
        "Venues".to_string(),
    ];

    for venue in &report.venues {
        lines.push(format!(
            "- #{} {} [{} {}] performance {} ({}) | market {} ({}) | efficiency {} ({}) | contract {} ({} on {}) => {}",
            venue.id,
            venue.name,
            venue.tier,
            venue.tier_name,
            venue.performance.color,
            fixed(venue.performance.score, 1),
            venue.benchmark.color,
            format_percentage(venue.benchmark.deviation, 1),
            venue.efficiency.color,
            fixed(venue.efficiency.global_index, 2),
            venue.contract.color,
            format_percentage(venue.contract.deviation_percent, 1),
            format_usd(venue.contract.contract_amount_foreign),
            venue.global.verdict.label(),
        ));
    }

    lines.push(String::new());
    lines.push("Portfolio".to_string());
    lines.push(format!("- Total revenue: {}", format_ars(Some(summary.total_revenue))));
    lines.push(format!("- Total margin: {}", format_ars(Some(summary.total_margin))));
    lines.push(format!(
        "- Average rent incidence: {}",
        format_percentage(summary.average_rent_incidence.map(|value| value * 100.0), 1)
    ));
    lines.push(format!(
        "- Average market deviation: {}",
        format_percentage(summary.average_benchmark_deviation, 1)
    ));
    lines.push(format!(
        "- Average efficiency index: {}",
        fixed(summary.average_global_index, 2)
    ));
    lines.push(format!(
        "- Average contract deviation: {}",
        format_percentage(summary.average_contract_deviation, 1)
    ));
    let verdicts = SemaphoreColor::ordered()
        .iter()
        .map(|color| format!("{color} {}", summary.color_counts.global.get(*color)))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("- Global verdicts: {verdicts}"));

    push_highlights(
        &mut lines,
        "Rent incidence alerts (> 25%)",
        &summary.incidence_alerts,
        |value| format_percentage(Some(value * 100.0), 1),
    );
    push_highlights(&mut lines, "Top margin", &summary.top_margin, |value| {
        format_ars(Some(value))
    });

    lines.join("\n")
}

fn push_highlights<F>(lines: &mut Vec<String>, title: &str, entries: &[VenueHighlight], render: F)
where
    F: Fn(f64) -> String,
{
    lines.push(String::new());
    if entries.is_empty() {
        lines.push(format!("{title}: none"));
        return;
    }

    lines.push(title.to_string());
    for entry in entries {
        lines.push(format!(
            "- #{} {} ({}): {}",
            entry.id,
            entry.name,
            entry.tier,
            render(entry.value)
        ));
    }
}

fn simulation_text(
    venue: &VenueMetrics,
    baseline: &SimulationResult,
    simulated: &SimulationResult,
) -> String {
    let incidence = |result: &SimulationResult| {
        format_percentage(result.new_incidence.map(|value| value * 100.0), 1)
    };

    [
        format!("Rent reduction what-if: {} (#{})", venue.name, venue.id),
        format!(
            "Reduction: {}",
            format_percentage(Some(simulated.reduction_percent), 1)
        ),
        format!(
            "Fixed costs: {} -> {}",
            format_ars(Some(baseline.new_fixed_costs)),
            format_ars(Some(simulated.new_fixed_costs))
        ),
        format!(
            "Rent incidence: {} -> {} ({})",
            incidence(baseline),
            incidence(simulated),
            simulated.incidence_color
        ),
        format!(
            "Margin: {} -> {} (improvement {})",
            format_ars(Some(baseline.new_margin)),
            format_ars(Some(simulated.new_margin)),
            format_ars(Some(simulated.margin_improvement))
        ),
        format!(
            "Return on rent: {} -> {}",
            format_multiplier(return_on_rent(venue, baseline)),
            format_multiplier(return_on_rent(venue, simulated))
        ),
    ]
    .join("\n")
}

fn return_on_rent(venue: &VenueMetrics, result: &SimulationResult) -> Option<f64> {
    venue_audit::audit::performance::multiplier(
        result.new_fixed_costs,
        venue.revenue?,
        venue.variable_costs?,
    )
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .filter(|value| value.is_finite())
        .map_or_else(|| NO_DATA.to_string(), |value| format!("{value:.decimals$}"))
}
