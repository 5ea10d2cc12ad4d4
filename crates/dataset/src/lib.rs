//! Dataset input: CSV reading and prompt formatting.
//!
//! Reads the labeled founder dataset (a row-oriented CSV with nested
//! JSON array fields) and renders each profile into the
//! natural-language prompt consumed by the predictor agent.

#![warn(missing_docs)]

mod format;
mod reader;

pub use format::format_profile;
pub use reader::{DatasetError, DatasetReader, Result};
