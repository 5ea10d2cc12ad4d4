//! Batch orchestration - drives the evaluate/improve loop.

#![warn(missing_docs)]

mod engine;

pub use engine::{RunSummary, Trainer, TrainerConfig};
