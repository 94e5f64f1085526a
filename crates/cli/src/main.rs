use crate::{env::EnvManager, error::CliError};
use analyzer::{
    analysis::{self, Verdict},
    comparison::{BenchmarkRecord, parse_index_pattern},
    monitor::SlowQueryMonitor,
    source::{self, load_report, load_reports},
    summary::PlanSummary,
    thresholds::{Thresholds, ThresholdsBuilder},
};
use clap::Parser;
use commands::Commands;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;

#[derive(Parser, Debug)]
#[command(
    name = "planscope",
    version,
    about = "Inspect and analyse MongoDB explain reports"
)]
struct Cli {
    #[arg(long, global = true, help = "Load settings from this .env file")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let env = EnvManager::discover(cli.env_file.as_deref())?;
    let settings = env.settings()?;

    // Initialize logger; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = env.loaded_from() {
        info!("Loaded settings from {}", path.display());
    }

    let thresholds = |slow_ms: Option<u64>| -> Thresholds {
        ThresholdsBuilder::new()
            .slow_query_ms(slow_ms.unwrap_or(settings.slow_query_ms))
            .max_docs_per_returned(settings.max_docs_per_returned)
            .build()
    };

    match cli.command {
        Commands::Parse { file, output } => {
            let report = load_report(&file).await?;
            output::emit_json(&report, output.as_deref()).await?;
        }
        Commands::Summary { file, json } => {
            let report = load_report(&file).await?;
            let summary = PlanSummary::from_report(&report);
            if json {
                output::emit_json(&summary, None).await?;
            } else {
                output::print_summary(&summary);
            }
        }
        Commands::Check {
            file,
            slow_ms,
            output,
        } => {
            let report = load_report(&file).await?;
            let analysis = analysis::analyze(&report, &thresholds(slow_ms));

            output::emit_json(&analysis, output.as_deref()).await?;
            if output.is_some() {
                output::print_findings(&analysis.findings);
            }

            if analysis.verdict == Verdict::Failed {
                return Err(CliError::CheckFailed {
                    file: file.display().to_string(),
                    verdict: analysis.verdict,
                });
            }
        }
        Commands::Monitor {
            files,
            slow_ms,
            json,
        } => {
            let mut monitor = SlowQueryMonitor::new(thresholds(slow_ms));
            for (path, report) in load_reports(&files).await? {
                monitor.record(source::query_name(&path), &report);
            }

            let report = monitor.report();
            if json {
                output::emit_json(&report, None).await?;
            } else {
                output::print_monitor(&report);
            }
        }
        Commands::Compare {
            before,
            after,
            index,
            name,
            output,
        } => {
            let index_param = index.as_deref().map(parse_index_pattern).transpose()?;
            let name = name.unwrap_or_else(|| source::query_name(&before));

            let before = PlanSummary::from_report(&load_report(&before).await?);
            let after = PlanSummary::from_report(&load_report(&after).await?);
            let record = BenchmarkRecord::new(&name, index_param, before, after);

            info!(
                "{name}: {} ms -> {} ms (improved: {})",
                record.comparison.execution_time_millis.before,
                record.comparison.execution_time_millis.after,
                record.comparison.improved
            );
            output::write_benchmark(&record, output.as_deref()).await?;
        }
    }

    Ok(())
}
