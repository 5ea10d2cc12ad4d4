//! CSV dataset reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use outlier_core::FounderProfile;
use serde::Deserialize;
use tracing::{debug, warn};

/// Error type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors that can occur while reading the dataset.
///
/// All of these are fatal to a run: an unreadable file or broken CSV
/// framing means the pass cannot continue. Malformed *fields* inside a
/// well-framed row are not errors; they degrade to empty values.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing or header error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One raw row, as the CSV carries it.
#[derive(Debug, Deserialize)]
struct RawRow {
    founder_uuid: String,
    success: String,
    industry: String,
    #[serde(default)]
    ipos: String,
    #[serde(default)]
    acquisitions: String,
    #[serde(default)]
    educations_json: String,
    #[serde(default)]
    jobs_json: String,
    #[allow(dead_code)]
    #[serde(default)]
    anonymised_prose: String,
}

/// Reads labeled founder profiles from the dataset CSV, in file order.
pub struct DatasetReader<R: Read> {
    inner: csv::Reader<R>,
}

impl DatasetReader<File> {
    /// Open the dataset file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> DatasetReader<R> {
    /// Read the dataset from any byte source. Used directly by tests.
    pub fn from_reader(reader: R) -> Self {
        Self {
            inner: csv::Reader::from_reader(reader),
        }
    }

    /// Iterate profiles in file order. A CSV-level error terminates
    /// iteration at the caller (fatal); malformed nested fields do not.
    pub fn profiles(self) -> impl Iterator<Item = Result<FounderProfile>> {
        self.inner
            .into_deserialize::<RawRow>()
            .map(|row| row.map(profile_from_row).map_err(DatasetError::from))
    }
}

fn profile_from_row(row: RawRow) -> FounderProfile {
    FounderProfile {
        label: row.success.trim() == "1",
        industry: row.industry,
        ipo_count: parse_count(&row.ipos, "ipos", &row.founder_uuid),
        acquisition_count: parse_count(&row.acquisitions, "acquisitions", &row.founder_uuid),
        education: parse_json_list(&row.educations_json, "educations_json", &row.founder_uuid),
        jobs: parse_json_list(&row.jobs_json, "jobs_json", &row.founder_uuid),
        uuid: row.founder_uuid,
    }
}

fn parse_count(field: &str, name: &str, uuid: &str) -> Option<u32> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    match field.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!("Unparseable {} field {:?} for row {}", name, field, uuid);
            None
        }
    }
}

/// Parse a nested JSON array field. Malformed input degrades to an
/// empty list so that formatting stays total.
fn parse_json_list<T: serde::de::DeserializeOwned>(field: &str, name: &str, uuid: &str) -> Vec<T> {
    if field.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str(field) {
        Ok(list) => list,
        Err(e) => {
            warn!("Malformed {} for row {}: {}", name, uuid, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "founder_uuid,success,industry,ipos,acquisitions,educations_json,jobs_json,anonymised_prose\n";

    fn read_all(csv_text: &str) -> Vec<FounderProfile> {
        DatasetReader::from_reader(csv_text.as_bytes())
            .profiles()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn parses_row_with_nested_json_fields() {
        let csv_text = format!(
            "{HEADER}abc,1,\"Technology, Information & Internet Platforms\",2,,\"[\n  {{\n    \"\"degree\"\": \"\"BA\"\",\n    \"\"field\"\": \"\"Computer Science\"\",\n    \"\"qs_ranking\"\": \"\"1\"\"\n  }}\n]\",\"[\n  {{\n    \"\"role\"\": \"\"CTO\"\",\n    \"\"company_size\"\": \"\"2-10 employees\"\",\n    \"\"industry\"\": \"\"E-Learning\"\",\n    \"\"duration\"\": \"\"<2\"\"\n  }}\n]\",prose\n"
        );

        let profiles = read_all(&csv_text);
        assert_eq!(profiles.len(), 1);

        let p = &profiles[0];
        assert_eq!(p.uuid, "abc");
        assert!(p.label);
        assert_eq!(p.industry, "Technology, Information & Internet Platforms");
        assert_eq!(p.ipo_count, Some(2));
        assert_eq!(p.acquisition_count, None);
        assert_eq!(p.education.len(), 1);
        assert_eq!(p.education[0].degree, "BA");
        assert_eq!(p.education[0].qs_ranking.as_deref(), Some("1"));
        assert_eq!(p.jobs.len(), 1);
        assert_eq!(p.jobs[0].role, "CTO");
        assert_eq!(p.jobs[0].duration, "<2");
    }

    #[test]
    fn zero_label_and_empty_counts() {
        let csv_text = format!("{HEADER}xyz,0,Fintech,,,,,\n");
        let profiles = read_all(&csv_text);
        let p = &profiles[0];
        assert!(!p.label);
        assert_eq!(p.ipo_count, None);
        assert_eq!(p.acquisition_count, None);
        assert!(p.education.is_empty());
        assert!(p.jobs.is_empty());
    }

    #[test]
    fn malformed_nested_json_degrades_to_empty() {
        let csv_text = format!("{HEADER}bad,1,Fintech,,,\"[{{not json\",\"oops\",\n");
        let profiles = read_all(&csv_text);
        assert!(profiles[0].education.is_empty());
        assert!(profiles[0].jobs.is_empty());
    }

    #[test]
    fn preserves_file_order() {
        let csv_text = format!("{HEADER}a,1,X,,,,,\nb,0,Y,,,,,\nc,1,Z,,,,,\n");
        let profiles = read_all(&csv_text);
        let uuids: Vec<_> = profiles.iter().map(|p| p.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["a", "b", "c"]);
    }
}
