use super::{load_config, write_output_to_file};
use crate::analysis::{MetricsEngine, OutputFormat, ReportFormatter};
use crate::errors::AppResult;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Options shared by every metric
#[derive(Args, Clone)]
pub struct AnalyseArgs {
    /// Configuration file (defaults to metrics.toml in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: console, json or plotly
    #[arg(long, default_value = "console")]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Evaluate open items as of this date, YYYY-MM-DD (overrides reference_date)
    #[arg(long)]
    reference_date: Option<NaiveDate>,
}

/// Calculate one metric and print its tables
#[derive(Args)]
pub struct AnalyseCommand {
    #[command(subcommand)]
    pub metric: MetricCommands,
}

#[derive(Subcommand)]
pub enum MetricCommands {
    /// Open defects per month by priority, type and environment
    Defects(AnalyseArgs),
    /// Arrivals versus departures per period
    NetFlow(AnalyseArgs),
    /// Work withdrawn per period by stage
    Waste(AnalyseArgs),
}

impl AnalyseCommand {
    pub fn run(&self) -> AppResult<()> {
        match &self.metric {
            MetricCommands::Defects(args) => run_metric(args, "Defects report", |engine, format| {
                engine
                    .defects()?
                    .map(|report| {
                        ReportFormatter::format_defects(&report, engine.config(), engine.today(), format)
                    })
                    .transpose()
            }),
            MetricCommands::NetFlow(args) => run_metric(args, "Net flow report", |engine, format| {
                engine
                    .net_flow()?
                    .map(|report| ReportFormatter::format_net_flow(&report, engine.config(), format))
                    .transpose()
            }),
            MetricCommands::Waste(args) => run_metric(args, "Waste report", |engine, format| {
                engine
                    .waste()?
                    .map(|report| ReportFormatter::format_waste(&report, engine.config(), format))
                    .transpose()
            }),
        }
    }
}

/// Run a metric and print or write its formatted report
fn run_metric<F>(args: &AnalyseArgs, description: &str, analyse_fn: F) -> AppResult<()>
where
    F: FnOnce(&MetricsEngine, OutputFormat) -> AppResult<Option<String>>,
{
    let config = load_config(args.config.as_deref(), args.reference_date)?;
    let engine = MetricsEngine::from_config(config)?;

    let Some(output) = analyse_fn(&engine, args.format)? else {
        println!("{}: not configured, nothing to report", description);
        return Ok(());
    };

    match &args.output {
        Some(path) => write_output_to_file(path, &output, description),
        None => {
            print!("{}", output);
            Ok(())
        }
    }
}
