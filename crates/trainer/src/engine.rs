//! The batch orchestrator.
//!
//! Drives one pass over the dataset:
//! ```text
//! Read -> Format -> Predict -> Score -> Improve -> Persist -> (loop)
//! ```
//! Batches are strictly sequential: each batch's improved instruction
//! is the next batch's input. Within a batch the per-example
//! predictions are independent and may run with bounded concurrency;
//! result order always matches input order.

use anyhow::Context;
use futures::{stream, StreamExt};
use outlier_agent::{InstructionImprover, PredictionAdapter};
use outlier_core::{FounderProfile, PredictionResult, Report};
use outlier_dataset::format_profile;
use outlier_storage::{ReportStore, RunArtifacts};
use tracing::{debug, info, warn};

/// Configuration for a training run.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Examples per batch. A trailing group smaller than this is
    /// dropped at end of dataset.
    pub batch_size: usize,
    /// 1-based row number to resume from; rows before it are skipped
    /// (their counter is still advanced and persisted).
    pub start_offset: usize,
    /// Concurrent prediction calls within a batch. 1 means sequential.
    pub parallelism: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            start_offset: 0,
            parallelism: 1,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Dataset rows read (including skipped ones).
    pub rows_seen: usize,
    /// Full batches evaluated and improved upon.
    pub batches_completed: usize,
    /// Trailing examples dropped because they did not fill a batch.
    pub dropped_trailing: usize,
}

/// The batch orchestrator. Exclusively owns the current instruction
/// and the resume cursor for the duration of a run.
pub struct Trainer<S: ReportStore> {
    adapter: PredictionAdapter,
    improver: InstructionImprover,
    store: S,
    artifacts: RunArtifacts,
    config: TrainerConfig,
}

impl<S: ReportStore> Trainer<S> {
    /// Create a trainer over its collaborating services.
    pub fn new(
        adapter: PredictionAdapter,
        improver: InstructionImprover,
        store: S,
        artifacts: RunArtifacts,
    ) -> Self {
        Self {
            adapter,
            improver,
            store,
            artifacts,
            config: TrainerConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one pass over the dataset.
    ///
    /// Dataset and storage errors are fatal and abort the run;
    /// per-example inference failures are absorbed by the adapter and
    /// only show up inside report reasoning.
    pub async fn run(
        &mut self,
        profiles: impl IntoIterator<Item = outlier_dataset::Result<FounderProfile>>,
    ) -> Result<RunSummary, anyhow::Error> {
        let mut instruction = self
            .artifacts
            .read_instruction()
            .await
            .context("Failed to read instruction file")?;

        let mut cursor = 0usize;
        let mut batches_completed = 0usize;
        let mut prompts: Vec<String> = Vec::new();
        let mut actuals: Vec<bool> = Vec::new();

        for profile in profiles {
            let profile = profile.context("Failed to read dataset row")?;

            cursor += 1;
            self.artifacts.write_counter(cursor).await?;
            if cursor < self.config.start_offset {
                continue;
            }

            prompts.push(format_profile(&profile));
            actuals.push(profile.label);

            if prompts.len() >= self.config.batch_size {
                info!(
                    "Evaluating batch {} ({} examples, through row {})",
                    batches_completed + 1,
                    prompts.len(),
                    cursor
                );

                let results = self.evaluate(&instruction, &prompts).await;
                let report = Report::new(results.into_iter().zip(actuals.iter().copied()));
                debug!(
                    "Batch {} scored: accuracy {:.3}, F_0.5 {:.3}",
                    batches_completed + 1,
                    report.tally.accuracy(),
                    report.tally.f_half()
                );

                let text = report.render();
                self.artifacts.write_report(&text).await?;
                let report_id = self.store.append(&text).await?;
                debug!("Stored report {}", report_id);

                instruction = self
                    .improver
                    .improve(&instruction, &text)
                    .await
                    .context("Failed to improve instructions")?;
                self.artifacts.write_instruction(&instruction).await?;

                prompts.clear();
                actuals.clear();
                batches_completed += 1;
            }
        }

        let dropped_trailing = prompts.len();
        if dropped_trailing > 0 {
            warn!(
                "Dropping trailing partial batch of {} examples (< batch size {})",
                dropped_trailing, self.config.batch_size
            );
        }

        info!(
            "Run complete: {} rows seen, {} batches",
            cursor, batches_completed
        );

        Ok(RunSummary {
            rows_seen: cursor,
            batches_completed,
            dropped_trailing,
        })
    }

    /// Predict for every prompt in the batch, in input order.
    async fn evaluate(&self, instruction: &str, prompts: &[String]) -> Vec<PredictionResult> {
        if self.config.parallelism <= 1 {
            let mut results = Vec::with_capacity(prompts.len());
            for prompt in prompts {
                results.push(self.adapter.predict(instruction, prompt).await);
            }
            return results;
        }

        // buffered() yields in submission order, so concurrency never
        // reorders the batch.
        stream::iter(prompts)
            .map(|prompt| self.adapter.predict(instruction, prompt))
            .buffered(self.config.parallelism)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use outlier_agent::GenerativeClient;
    use outlier_storage::SqliteReportStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Plays all three roles behind the loop: predictor (wraps the
    /// prompt), extractor (answers with a fixed prediction, echoing
    /// the profile's first line as the reason), and improver
    /// (returns a numbered replacement instruction).
    struct LoopClient {
        prediction: bool,
        improver_calls: AtomicUsize,
    }

    impl LoopClient {
        fn new(prediction: bool) -> Arc<Self> {
            Arc::new(Self {
                prediction,
                improver_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GenerativeClient for LoopClient {
        async fn generate(&self, _system: &str, prompt: &str) -> anyhow::Result<String> {
            if prompt.starts_with("Current instructions:") {
                let n = self.improver_calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("improved instructions {n}"))
            } else if let Some(raw) = prompt.strip_prefix("RAW\n") {
                let first_line = raw.lines().next().unwrap_or_default();
                Ok(format!(
                    "{{\"prediction\": {}, \"reason\": \"{}\"}}",
                    self.prediction, first_line
                ))
            } else {
                Ok(format!("RAW\n{prompt}"))
            }
        }
    }

    fn profile(i: usize, label: bool) -> outlier_dataset::Result<FounderProfile> {
        Ok(FounderProfile {
            uuid: format!("uuid-{i}"),
            industry: format!("Industry {i}"),
            ipo_count: None,
            acquisition_count: None,
            education: vec![],
            jobs: vec![],
            label,
        })
    }

    async fn trainer_in(
        dir: &std::path::Path,
        client: Arc<LoopClient>,
        config: TrainerConfig,
    ) -> Trainer<SqliteReportStore> {
        let artifacts = RunArtifacts::new(
            dir.join("instructions.txt"),
            dir.join("report.txt"),
            dir.join("counter.txt"),
        );
        artifacts.write_instruction("seed instruction").await.unwrap();

        let store = SqliteReportStore::in_memory().await.unwrap();
        Trainer::new(
            PredictionAdapter::new(client.clone()),
            InstructionImprover::new(client),
            store,
            artifacts,
        )
        .with_config(config)
    }

    #[tokio::test]
    async fn all_positive_predictions_over_mixed_batch() {
        let dir = tempfile::tempdir().unwrap();
        let client = LoopClient::new(true);
        let mut trainer = trainer_in(dir.path(), client.clone(), TrainerConfig::default()).await;

        // Rows 1-6 labeled success, 7-10 labeled failure.
        let rows: Vec<_> = (1..=10).map(|i| profile(i, i <= 6)).collect();
        let summary = trainer.run(rows).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                rows_seen: 10,
                batches_completed: 1,
                dropped_trailing: 0,
            }
        );

        // TP=6 FP=4 TN=0 FN=0.
        let reports = trainer.store.list().await.unwrap();
        assert_eq!(reports.len(), 1);
        let text = &reports[0].content;
        assert!(text.contains("Precision: 0.6"));
        assert!(text.contains("Recall: 1"));
        assert!(text.contains("Accuracy: 0.6"));
        assert!(text.contains("F_0.5 score: 0.65"));

        // Improver ran exactly once and its output was persisted verbatim.
        assert_eq!(client.improver_calls.load(Ordering::SeqCst), 1);
        let saved = tokio::fs::read_to_string(dir.path().join("instructions.txt"))
            .await
            .unwrap();
        assert_eq!(saved, "improved instructions 1");

        // Counter tracked every row.
        let counter = tokio::fs::read_to_string(dir.path().join("counter.txt"))
            .await
            .unwrap();
        assert_eq!(counter, "10");
    }

    #[tokio::test]
    async fn trailing_partial_batch_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let client = LoopClient::new(false);
        let mut trainer = trainer_in(dir.path(), client.clone(), TrainerConfig::default()).await;

        let rows: Vec<_> = (1..=13).map(|i| profile(i, true)).collect();
        let summary = trainer.run(rows).await.unwrap();

        assert_eq!(summary.rows_seen, 13);
        assert_eq!(summary.batches_completed, 1);
        assert_eq!(summary.dropped_trailing, 3);
        assert_eq!(trainer.store.list().await.unwrap().len(), 1);
        assert_eq!(client.improver_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn offset_at_dataset_length_produces_no_batches() {
        let dir = tempfile::tempdir().unwrap();
        let client = LoopClient::new(true);
        let config = TrainerConfig {
            start_offset: 10,
            ..Default::default()
        };
        let mut trainer = trainer_in(dir.path(), client.clone(), config).await;

        let rows: Vec<_> = (1..=10).map(|i| profile(i, true)).collect();
        let summary = trainer.run(rows).await.unwrap();

        assert_eq!(summary.rows_seen, 10);
        assert_eq!(summary.batches_completed, 0);
        assert!(trainer.store.list().await.unwrap().is_empty());
        assert_eq!(client.improver_calls.load(Ordering::SeqCst), 0);

        // The skipped rows still advanced the persisted counter.
        let counter = tokio::fs::read_to_string(dir.path().join("counter.txt"))
            .await
            .unwrap();
        assert_eq!(counter, "10");
    }

    #[tokio::test]
    async fn concurrent_evaluation_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let client = LoopClient::new(true);
        let config = TrainerConfig {
            parallelism: 4,
            ..Default::default()
        };
        let mut trainer = trainer_in(dir.path(), client.clone(), config).await;

        let rows: Vec<_> = (1..=10).map(|i| profile(i, true)).collect();
        trainer.run(rows).await.unwrap();

        let report = tokio::fs::read_to_string(dir.path().join("report.txt"))
            .await
            .unwrap();
        // The mock echoes each profile's first line as the reasoning,
        // so block k must mention industry k.
        for i in 1..=10 {
            let block = format!(
                "Prediction {i}:\nAgent answer: true\nCorrect answer: true\nReasoning: This founder leads a startup in the Industry {i} industry."
            );
            assert!(report.contains(&block), "missing ordered block {i}");
        }
    }

    #[tokio::test]
    async fn missing_instruction_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let client = LoopClient::new(true);
        let artifacts = RunArtifacts::new(
            dir.path().join("instructions.txt"),
            dir.path().join("report.txt"),
            dir.path().join("counter.txt"),
        );
        let store = SqliteReportStore::in_memory().await.unwrap();
        let mut trainer = Trainer::new(
            PredictionAdapter::new(client.clone()),
            InstructionImprover::new(client),
            store,
            artifacts,
        );

        let err = trainer.run(vec![profile(1, true)]).await.unwrap_err();
        assert!(err.to_string().contains("instruction file"));
    }
}
