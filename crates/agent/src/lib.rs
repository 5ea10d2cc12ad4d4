//! Model-backed agents: the predictor adapter and the instruction
//! improver, plus the generative client they share.

#![warn(missing_docs)]

mod client;
mod improver;
mod predictor;

pub use client::{GenerativeClient, OllamaClient};
pub use improver::InstructionImprover;
pub use predictor::PredictionAdapter;
