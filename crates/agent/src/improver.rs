//! Instruction improver.
//!
//! Synthesizes the next round's predictor instruction from the current
//! one and the latest score report.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::GenerativeClient;

/// Static meta-instruction for the improver model. Describes the
/// domain and pins the predictor's output contract; it never changes
/// across rounds.
const IMPROVER_INSTRUCTION: &str = "\
You are an expert prompt engineer.

You are trying to build the best prediction agent possible to predict \
\"outlier successes\" based on anonymised founder profiles.

For context, each founder's profile is anonymized, with only details on \
educational and professional background, as well as previous IPOs and \
acquisitions. The source data is a CSV file with the headers: \
founder_uuid, success, industry, ipos, acquisitions, educations_json, \
jobs_json, anonymised_prose. A profile prompt looks like:

This founder leads a startup in the Technology, Information & Internet \
Platforms industry.
Education:
* BA in Computer Science (Institution QS rank 1)

Professional experience:
* CTO for <2 years in the `Sports Teams & Leagues` industry (myself only employees)
* Software Engineer for <2 years in the `Wellness & Community Health` industry (2-10 employees)

You will be provided:
1. the current instructions passed to the agent
2. an F_0.5, precision, recall, and accuracy scoring of the agent, as \
well as its responses, the actual answers, alongside the agent's reasoning

Your task is to write new instructions to pass to the agent.

Make sure that the agent's output format is unchanged:
1. prediction (true or false): success or not
2. reason: one paragraph of reasoning for the prediction";

/// Rewrites the predictor instruction after each scored batch.
pub struct InstructionImprover {
    client: Arc<dyn GenerativeClient>,
}

impl InstructionImprover {
    /// Create an improver over a generative client.
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    /// Produce the full replacement instruction for the next batch.
    ///
    /// The caller treats the returned text as opaque and overwrites its
    /// stored instruction without merging. Unlike per-example
    /// prediction, a failure here is an error: there is no sensible
    /// sentinel instruction to continue with.
    pub async fn improve(&self, instruction: &str, report: &str) -> Result<String> {
        let prompt = format!("Current instructions:\n{instruction}\n\n{report}");

        let revised = self
            .client
            .generate(IMPROVER_INSTRUCTION, &prompt)
            .await
            .context("Instruction improvement call failed")?;

        info!("Improver produced {} chars of new instructions", revised.len());
        Ok(revised)
    }
}
