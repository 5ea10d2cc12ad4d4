//! Prediction service adapter.
//!
//! Two model calls per example: the instruction-bound predictor
//! produces free-form text, and an extractor turns that text into a
//! typed [`PredictionResult`]. Both calls can fail; neither failure
//! escapes this module. A bad example yields a sentinel negative
//! result so the batch evaluation stays total.

use std::sync::Arc;

use outlier_core::PredictionResult;
use tracing::warn;

use crate::GenerativeClient;

/// Behavior contract for the extractor call. The response model is
/// fixed: a JSON object with a boolean `prediction` and a string
/// `reason`, empty string over null.
const EXTRACTOR_INSTRUCTION: &str = "\
You are a data convertor agent.

Your task is to generate a structured response from the unstructured \
output of another AI agent.

Respond with a single JSON object and nothing else:
{\"prediction\": <boolean - the agent's success prediction>, \
\"reason\": <string - the agent's explanation for the prediction>}

Use only the information you are fed. Set a field to an empty string \
if you find nothing in the output matching it. Never use null.";

/// Evaluates one prompt against the current instruction.
pub struct PredictionAdapter {
    client: Arc<dyn GenerativeClient>,
}

impl PredictionAdapter {
    /// Create an adapter over a generative client.
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    /// Predict for one formatted profile prompt.
    ///
    /// Total: generation and extraction failures are converted into a
    /// negative result carrying the diagnostic in `reason`, so one bad
    /// example can never abort a batch.
    pub async fn predict(&self, instruction: &str, prompt: &str) -> PredictionResult {
        let raw = match self.client.generate(instruction, prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Prediction generation failed: {:#}", e);
                return PredictionResult::failure(format!("Error during generation: {e:#}"));
            }
        };

        match self.extract(&raw).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Prediction extraction failed: {:#}", e);
                PredictionResult::failure(format!("Error during conversion: {e:#}"))
            }
        }
    }

    async fn extract(&self, raw: &str) -> anyhow::Result<PredictionResult> {
        let reply = self.client.generate(EXTRACTOR_INSTRUCTION, raw).await?;
        let result = serde_json::from_str(strip_fences(&reply))?;
        Ok(result)
    }
}

/// Models often wrap JSON in markdown code fences; tolerate that.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
