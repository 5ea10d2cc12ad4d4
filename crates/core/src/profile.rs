//! Labeled founder profiles as read from the dataset.

use serde::{Deserialize, Serialize};

/// One education entry from a founder's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    /// Degree obtained, e.g. "BA".
    #[serde(default)]
    pub degree: String,
    /// Field of study, e.g. "Computer Science".
    #[serde(default)]
    pub field: String,
    /// QS ranking of the institution, when known.
    #[serde(default)]
    pub qs_ranking: Option<String>,
}

/// One professional-experience entry from a founder's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Role held, e.g. "CTO".
    #[serde(default)]
    pub role: String,
    /// Company size bracket, e.g. "2-10 employees".
    #[serde(default)]
    pub company_size: String,
    /// Industry of the company.
    #[serde(default)]
    pub industry: String,
    /// Duration bracket in years, e.g. "<2".
    #[serde(default)]
    pub duration: String,
}

/// A labeled example: one anonymized founder profile plus its
/// outlier-success label. Immutable once read from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FounderProfile {
    /// Row identifier carried over from the dataset.
    pub uuid: String,
    /// Industry of the founder's current startup.
    pub industry: String,
    /// Number of previous IPOs, when recorded.
    pub ipo_count: Option<u32>,
    /// Number of previous acquisitions, when recorded.
    pub acquisition_count: Option<u32>,
    /// Education history, in dataset order.
    pub education: Vec<Education>,
    /// Professional experience, in dataset order.
    pub jobs: Vec<Job>,
    /// Whether this founder was an outlier success.
    pub label: bool,
}
