//! dailyavg CLI - Daily Sales Average Report Generator
//!
//! Command-line interface for reconciling sales and wastage exports into a
//! per-outlet average-performance workbook, optionally with forecast
//! variance recommendations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dailyavg_core::ReportConfig;
use dailyavg_ingest::{read_export, read_forecast};
use dailyavg_render::ExcelRenderer;

#[derive(Parser)]
#[command(name = "dailyavg")]
#[command(author, version, about = "Daily sales average report generator", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the per-outlet average sales report
    Generate {
        /// Product sales export
        #[arg(long, value_name = "FILE")]
        sales: PathBuf,

        /// Wastage sales export
        #[arg(long, value_name = "FILE")]
        wastage: PathBuf,

        /// Forecast workbook (one sheet per outlet code)
        #[arg(long, value_name = "FILE")]
        forecast: Option<PathBuf>,

        /// TOML configuration overriding naming rules and the outlet directory
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output workbook path
        #[arg(short, long, value_name = "FILE", default_value = "avg_sales_by_outlet.xlsx")]
        output: PathBuf,

        /// Also write the pipeline row-count summary as JSON
        #[arg(long, value_name = "FILE")]
        summary_json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; -v raises the default level, RUST_LOG still wins.
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Some(Commands::Generate {
            sales,
            wastage,
            forecast,
            config,
            output,
            summary_json,
        }) => generate(&sales, &wastage, forecast.as_deref(), config.as_deref(), &output, summary_json.as_deref()),
        None => {
            println!("dailyavg - daily sales average report generator");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

fn generate(
    sales_path: &Path,
    wastage_path: &Path,
    forecast_path: Option<&Path>,
    config_path: Option<&Path>,
    output: &Path,
    summary_json: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;

    let sales = read_export(sales_path)
        .with_context(|| format!("reading sales export {}", sales_path.display()))?;
    let wastage = read_export(wastage_path)
        .with_context(|| format!("reading wastage export {}", wastage_path.display()))?;
    let forecast = forecast_path
        .map(|path| {
            read_forecast(path, &config)
                .with_context(|| format!("reading forecast workbook {}", path.display()))
        })
        .transpose()?;

    let report = dailyavg_pipeline::run(&sales, &wastage, forecast.as_ref(), &config)
        .context("report generation failed")?;

    ExcelRenderer::new()
        .currency(&config.currency)
        .render_to_file(&report, output)
        .with_context(|| format!("writing {}", output.display()))?;

    if let Some(path) = summary_json {
        let json = serde_json::to_string_pretty(&report.summary)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    if report.summary.undated_rows > 0 {
        println!(
            "Note: {} rows excluded (business date did not parse).",
            report.summary.undated_rows
        );
    }
    println!("Report written to {}", output.display());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(ReportConfig::default()),
    }
}
