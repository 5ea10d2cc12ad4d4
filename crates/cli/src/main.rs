//! Outlier CLI - iterative prompt optimization for founder-success prediction.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use outlier_agent::{InstructionImprover, OllamaClient, PredictionAdapter};
use outlier_dataset::DatasetReader;
use outlier_storage::{ReportStore, RunArtifacts, SqliteReportStore};
use outlier_trainer::{Trainer, TrainerConfig};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "outlier")]
#[command(about = "Iterative prompt optimization for founder-success prediction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a training pass over the dataset
    Train {
        /// Path to the labeled dataset CSV
        #[arg(long)]
        data: PathBuf,
        /// 1-based dataset row to resume from
        #[arg(long, default_value = "0")]
        start: usize,
        /// Examples per batch
        #[arg(long, default_value = "10")]
        batch_size: usize,
        /// Concurrent prediction calls within a batch
        #[arg(long, default_value = "1")]
        parallelism: usize,
        /// SQLite database file for report history
        #[arg(long, default_value = "outlier.db")]
        db: PathBuf,
        /// Instruction file (read at start, overwritten per batch)
        #[arg(long, default_value = "instructions.txt")]
        instruction_file: PathBuf,
        /// Latest-report file (overwritten per batch)
        #[arg(long, default_value = "report.txt")]
        report_file: PathBuf,
        /// Row-counter file (overwritten per row)
        #[arg(long, default_value = "counter.txt")]
        counter_file: PathBuf,
        /// Ollama server URL
        #[arg(long, default_value = "http://localhost:11434")]
        ollama_url: String,
        /// Model name
        #[arg(long, default_value = "gemma3")]
        model: String,
        /// Per-call timeout in seconds
        #[arg(long, default_value = "120")]
        timeout_secs: u64,
    },
    /// List stored batch reports
    Reports {
        /// SQLite database file for report history
        #[arg(long, default_value = "outlier.db")]
        db: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            start,
            batch_size,
            parallelism,
            db,
            instruction_file,
            report_file,
            counter_file,
            ollama_url,
            model,
            timeout_secs,
        } => {
            let client = Arc::new(OllamaClient::new(
                ollama_url,
                model,
                Duration::from_secs(timeout_secs),
            ));
            let store = SqliteReportStore::new(&db_url(&db)).await?;
            let artifacts = RunArtifacts::new(instruction_file, report_file, counter_file);

            let mut trainer = Trainer::new(
                PredictionAdapter::new(client.clone()),
                InstructionImprover::new(client),
                store,
                artifacts,
            )
            .with_config(TrainerConfig {
                batch_size,
                start_offset: start,
                parallelism,
            });

            let reader = DatasetReader::open(&data)?;
            let started = Instant::now();
            let summary = trainer.run(reader.profiles()).await?;

            info!(
                "{} rows, {} batches, {} trailing examples dropped",
                summary.rows_seen, summary.batches_completed, summary.dropped_trailing
            );
            println!("Total run time: {:.2}s", started.elapsed().as_secs_f64());
        }
        Commands::Reports { db } => {
            let store = SqliteReportStore::new(&db_url(&db)).await?;
            let reports = store.list().await?;

            println!("Reports ({})", reports.len());
            for report in reports {
                println!(
                    "  {} | {} | {}",
                    report.id,
                    report.created_at.to_rfc3339(),
                    report.content.lines().next().unwrap_or_default(),
                );
            }
        }
    }

    Ok(())
}

fn db_url(path: &std::path::Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}
