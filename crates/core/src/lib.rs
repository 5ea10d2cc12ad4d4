//! Outlier core data models.
//!
//! This crate defines the data structures shared by the evaluation and
//! improvement loops: labeled founder profiles, prediction results, and
//! the confusion tally / report that scores a batch.

#![warn(missing_docs)]

mod prediction;
mod profile;
mod report;

pub use prediction::PredictionResult;
pub use profile::{Education, FounderProfile, Job};
pub use report::{ConfusionTally, Report, ReportEntry};
