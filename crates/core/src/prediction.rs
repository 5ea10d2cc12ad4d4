//! Prediction results produced by the predictor agent.

use serde::{Deserialize, Serialize};

/// Structured outcome of one prediction.
///
/// Always fully populated: a failed generation or extraction is
/// represented as a negative prediction whose `reason` carries the
/// diagnostic, never as a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The agent's binary success prediction.
    pub prediction: bool,
    /// One-paragraph reasoning behind the prediction. Empty string
    /// rather than absent when the agent gave none.
    #[serde(default)]
    pub reason: String,
}

impl PredictionResult {
    /// Sentinel negative result for an upstream failure.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            prediction: false,
            reason: reason.into(),
        }
    }
}
