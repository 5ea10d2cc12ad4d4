//! Run artifacts on disk.
//!
//! The latest instruction, report, and row counter are written to
//! plain files at explicit points in the loop. They are ports, not
//! state: nothing reads them back mid-run.

use std::path::{Path, PathBuf};

use tokio::fs;

use super::trait_::Result;

/// File paths for one run's artifacts.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    instruction_path: PathBuf,
    report_path: PathBuf,
    counter_path: PathBuf,
}

impl RunArtifacts {
    /// Create an artifact set from explicit paths.
    pub fn new(
        instruction_path: impl AsRef<Path>,
        report_path: impl AsRef<Path>,
        counter_path: impl AsRef<Path>,
    ) -> Self {
        Self {
            instruction_path: instruction_path.as_ref().to_path_buf(),
            report_path: report_path.as_ref().to_path_buf(),
            counter_path: counter_path.as_ref().to_path_buf(),
        }
    }

    /// Read the current instruction. Called once at run start; a
    /// missing instruction file is fatal.
    pub async fn read_instruction(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.instruction_path).await?)
    }

    /// Overwrite the instruction with the improver's output.
    pub async fn write_instruction(&self, text: &str) -> Result<()> {
        fs::write(&self.instruction_path, text).await?;
        Ok(())
    }

    /// Overwrite the latest rendered report.
    pub async fn write_report(&self, text: &str) -> Result<()> {
        fs::write(&self.report_path, text).await?;
        Ok(())
    }

    /// Overwrite the row counter. Written after every dataset row so a
    /// later run can be resumed from an explicit offset.
    pub async fn write_counter(&self, counter: usize) -> Result<()> {
        fs::write(&self.counter_path, counter.to_string()).await?;
        Ok(())
    }
}
