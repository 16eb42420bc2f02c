//! Types flowing out of a pipeline run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::availability::{AvailabilitySummary, TitleDetails};
use crate::matcher::CandidateMatch;

/// A surviving candidate with everything the report shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMatch {
    pub candidate: CandidateMatch,
    /// Branch availability; `None` for digital catalogues without holdings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<AvailabilitySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<TitleDetails>,
}

/// Pipeline stage at which a recovered error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Search,
    Parse,
    Availability,
    Details,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Search => write!(f, "search"),
            FailureStage::Parse => write!(f, "parse"),
            FailureStage::Availability => write!(f, "availability"),
            FailureStage::Details => write!(f, "details"),
        }
    }
}

/// A recovered error, with enough context to re-run the entry by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFailure {
    pub title: String,
    pub author: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Result of processing a whole wishlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Reportable matches, in wishlist order.
    pub matches: Vec<EnrichedMatch>,
    pub failures: Vec<EntryFailure>,
    pub entries_processed: usize,
}
