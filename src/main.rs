use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, info_span, Instrument};

use retail_reports::app::ProcessAllUseCase;
use retail_reports::config::Config;
use retail_reports::infra::fs_snapshot_source::FsSnapshotSource;
use retail_reports::infra::json_report_writer::JsonReportWriter;
use retail_reports::{logging, observability};

#[derive(Parser)]
#[command(name = "retail-reports")]
#[command(about = "Enrich raw retail extracts into export-ready reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a snapshot directory into the five reports
    Process {
        /// Directory with products.json, inventory.json, sales.json, ...
        #[arg(long)]
        input: PathBuf,
        /// Directory the reports are written to
        #[arg(long, default_value = "output")]
        output: PathBuf,
        /// Config file (defaults to $RETAIL_REPORTS_CONFIG or config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print Prometheus metrics after the run
        #[arg(long)]
        metrics: bool,
    },
    /// Resolve one product color code through the fixed mapping
    ResolveColor {
        #[arg(long)]
        code: String,
        /// Database description used when the mapping has no entry
        #[arg(long)]
        fallback: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(Config::default_path);
    Config::load(&path).with_context(|| format!("loading config from {}", path.display()))
}

async fn run_process(
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    metrics: bool,
) -> anyhow::Result<()> {
    let handle = if metrics {
        Some(observability::init()?)
    } else {
        None
    };

    let settings = load_config(config)?.pipeline_settings()?;
    let use_case = ProcessAllUseCase::new(Box::new(FsSnapshotSource::new(&input)), settings);
    let writer = JsonReportWriter::new(&output);

    match use_case.process_and_export(&writer).await {
        Ok(reports) => {
            info!("Reports written");
            println!("📊 Reports written to {}", output.display());
            for (report, rows) in reports.named() {
                println!("   {}: {} rows -> {}", report, rows.len(), writer.report_path(report).display());
            }
        }
        Err(e) => {
            error!("Processing failed: {}", e);
            return Err(e.into());
        }
    }

    if let Some(handle) = handle {
        println!("{}", handle.render());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            metrics,
        } => {
            let span = info_span!("process", input = %input.display(), output = %output.display());
            run_process(input, output, config, metrics).instrument(span).await?;
        }
        Commands::ResolveColor {
            code,
            fallback,
            config,
        } => {
            let settings = load_config(config)?.pipeline_settings()?;
            let resolved = settings
                .color_resolver
                .resolve(Some(code.as_str()), fallback.as_deref());
            println!("{}", resolved);
        }
    }

    Ok(())
}
