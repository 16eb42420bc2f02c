//! Types for copy-level availability.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Effective lending status of one copy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusKind {
    Available,
    OnLoan,
    /// Any status the resolver does not act on (in transit, reserved, ...).
    Other(String),
}

impl From<String> for StatusKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "AVAILABLE" => StatusKind::Available,
            "ON_LOAN" => StatusKind::OnLoan,
            _ => StatusKind::Other(raw),
        }
    }
}

impl From<StatusKind> for String {
    fn from(status: StatusKind) -> Self {
        status.to_string()
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Available => write!(f, "AVAILABLE"),
            StatusKind::OnLoan => write!(f, "ON_LOAN"),
            StatusKind::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// One physical copy as reported by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRecord {
    #[serde(rename = "effectiveStatus")]
    pub status: StatusKind,
    pub branch_name: String,
    #[serde(default)]
    pub sub_location: Option<String>,
    #[serde(default)]
    pub call_number: Option<String>,
    /// ISO-8601 date-time, set while on loan.
    #[serde(default)]
    pub return_date: Option<String>,
}

impl CopyRecord {
    /// Shelf location as "{sub location} {call number}".
    pub fn location(&self) -> String {
        [self.sub_location.as_deref(), self.call_number.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Availability of a title at one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySummary {
    pub per_status_counts: BTreeMap<StatusKind, usize>,
    /// Distinct shelf locations of available copies.
    pub available_locations: BTreeSet<String>,
    /// Expected return dates of copies on loan, ascending.
    pub on_loan_return_dates: Vec<NaiveDate>,
}

impl AvailabilitySummary {
    pub fn count(&self, status: &StatusKind) -> usize {
        self.per_status_counts.get(status).copied().unwrap_or(0)
    }

    pub fn available(&self) -> usize {
        self.count(&StatusKind::Available)
    }

    pub fn on_loan(&self) -> usize {
        self.count(&StatusKind::OnLoan)
    }

    /// Total copies at the branch, any status.
    pub fn total(&self) -> usize {
        self.per_status_counts.values().sum()
    }
}

/// Extended descriptive fields of a title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
