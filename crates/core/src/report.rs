//! Batch scoring: confusion tally, derived metrics, and the report
//! artifact that feeds the instruction improver.

use serde::{Deserialize, Serialize};

use crate::PredictionResult;

/// 2x2 confusion counts over one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionTally {
    /// Predicted success, was success.
    pub true_positives: usize,
    /// Predicted success, was failure.
    pub false_positives: usize,
    /// Predicted failure, was failure.
    pub true_negatives: usize,
    /// Predicted failure, was success.
    pub false_negatives: usize,
}

impl ConfusionTally {
    /// Bucket one prediction/actual pair.
    pub fn record(&mut self, prediction: bool, actual: bool) {
        match (prediction, actual) {
            (true, true) => self.true_positives += 1,
            (true, false) => self.false_positives += 1,
            (false, false) => self.true_negatives += 1,
            (false, true) => self.false_negatives += 1,
        }
    }

    /// Total pairs recorded.
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// TP / (TP + FP), 0.0 when no positive predictions were made.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives as f64, (self.true_positives + self.false_positives) as f64)
    }

    /// TP / (TP + FN), 0.0 when no actual positives were seen.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives as f64, (self.true_positives + self.false_negatives) as f64)
    }

    /// (TP + TN) / total, 0.0 on an empty tally.
    pub fn accuracy(&self) -> f64 {
        ratio(
            (self.true_positives + self.true_negatives) as f64,
            self.total() as f64,
        )
    }

    /// F-beta score with beta = 0.5, weighting precision over recall.
    ///
    /// F_0.5 = 1.25*TP / (1.25*TP + 0.25*FN + FP); 0.0 when the
    /// denominator is zero.
    pub fn f_half(&self) -> f64 {
        let tp = self.true_positives as f64;
        ratio(
            1.25 * tp,
            1.25 * tp + 0.25 * self.false_negatives as f64 + self.false_positives as f64,
        )
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// One per-example block of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// What the agent predicted.
    pub prediction: bool,
    /// The actual label.
    pub actual: bool,
    /// The agent's reasoning (or the failure diagnostic).
    pub reason: String,
}

/// Scored batch: aggregate metrics plus per-example detail, in input
/// order. Immutable once built; `render` produces the textual artifact
/// consumed by the instruction improver and persisted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Confusion counts over the batch.
    pub tally: ConfusionTally,
    /// Per-example blocks, 1:1 with the evaluated batch.
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Score an ordered sequence of (result, actual) pairs.
    pub fn new(pairs: impl IntoIterator<Item = (PredictionResult, bool)>) -> Self {
        let mut tally = ConfusionTally::default();
        let entries = pairs
            .into_iter()
            .map(|(result, actual)| {
                tally.record(result.prediction, actual);
                ReportEntry {
                    prediction: result.prediction,
                    actual,
                    reason: result.reason,
                }
            })
            .collect();

        Self { tally, entries }
    }

    /// Render the textual report: aggregate metrics followed by the
    /// per-example blocks, numbered 1..N in input order.
    pub fn render(&self) -> String {
        let mut out = format!(
            "**REPORT OF RESULTS:**\n\nF_0.5 score: {}\nPrecision: {}\nRecall: {}\nAccuracy: {}\n\n",
            self.tally.f_half(),
            self.tally.precision(),
            self.tally.recall(),
            self.tally.accuracy(),
        );

        let blocks: Vec<String> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "Prediction {}:\nAgent answer: {}\nCorrect answer: {}\nReasoning: {}\n",
                    i + 1,
                    entry.prediction,
                    entry.actual,
                    entry.reason,
                )
            })
            .collect();
        out.push_str(&blocks.join("\n"));
        out
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
