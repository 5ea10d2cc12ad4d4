//! Persistence for the optimization loop.
//!
//! Two ports: an append-only report history (SQLite) and the run
//! artifacts on disk (instruction, latest report, row counter).

#![warn(missing_docs)]

mod artifacts;
mod sqlite_store;
mod trait_;

pub use artifacts::RunArtifacts;
pub use sqlite_store::SqliteReportStore;
pub use trait_::{ReportStore, Result, StorageError, StoredReport};
