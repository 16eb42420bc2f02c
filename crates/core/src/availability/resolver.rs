//! Branch-level availability aggregation.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::catalogue::HoldingsClient;
use crate::matcher::ParseError;
use crate::wishlist::WishlistEntry;

use super::types::{AvailabilitySummary, CopyRecord, StatusKind, TitleDetails};
use super::AvailabilityError;

/// Date-time layouts with an explicit offset, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Naive date-time layouts.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a copy-level JSON list into one result per copy.
///
/// Only an unusable body fails as a whole.
pub fn parse_copies(body: &str) -> Result<Vec<Result<CopyRecord, ParseError>>, ParseError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ParseError::MalformedResponse(e.to_string()))?;

    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<CopyRecord>(item.clone()).map_err(|e| {
                ParseError::InvalidValue {
                    reason: e.to_string(),
                    record: item.to_string(),
                }
            })
        })
        .collect())
}

/// Parse the extended details JSON object of a title.
pub fn parse_details(body: &str) -> Result<TitleDetails, ParseError> {
    serde_json::from_str(body).map_err(|e| ParseError::MalformedResponse(e.to_string()))
}

/// Parse an ISO-8601 date-time (or plain date) and keep the date part.
pub fn parse_return_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    {
        return Some(dt.date_naive());
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Summarizes copy availability for one named branch.
#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    branch_name: String,
}

impl AvailabilityResolver {
    pub fn new(branch_name: impl Into<String>) -> Self {
        Self {
            branch_name: branch_name.into(),
        }
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    /// Aggregate the copies held by the branch for a wishlist entry.
    ///
    /// Returns `None` when the branch holds no copy at all; such titles are
    /// not actionable and are left out of the report.
    pub fn summarize(
        &self,
        entry: &WishlistEntry,
        copies: &[CopyRecord],
    ) -> Option<AvailabilitySummary> {
        let mut summary = AvailabilitySummary::default();

        for copy in copies.iter().filter(|c| c.branch_name == self.branch_name) {
            *summary
                .per_status_counts
                .entry(copy.status.clone())
                .or_insert(0) += 1;

            match copy.status {
                StatusKind::Available => {
                    summary.available_locations.insert(copy.location());
                }
                StatusKind::OnLoan => match copy.return_date.as_deref().and_then(parse_return_date)
                {
                    Some(date) => summary.on_loan_return_dates.push(date),
                    None => warn!(
                        title = %entry.title,
                        author = %entry.author,
                        stage = "availability",
                        branch = %self.branch_name,
                        return_date = ?copy.return_date,
                        "Copy on loan without a usable return date"
                    ),
                },
                StatusKind::Other(_) => {}
            }
        }

        if summary.total() == 0 {
            return None;
        }

        summary.on_loan_return_dates.sort();
        Some(summary)
    }

    /// Fetch, parse and summarize the copies of one title.
    ///
    /// Malformed copy records are logged and skipped.
    pub async fn resolve(
        &self,
        client: &dyn HoldingsClient,
        entry: &WishlistEntry,
        external_id: &str,
    ) -> Result<Option<AvailabilitySummary>, AvailabilityError> {
        let body = client.copies(external_id).await?;

        let mut copies = Vec::new();
        for record in parse_copies(&body)? {
            match record {
                Ok(copy) => copies.push(copy),
                Err(e) => warn!(
                    title = %entry.title,
                    author = %entry.author,
                    stage = "availability",
                    external_id,
                    error = %e,
                    "Skipping malformed copy record"
                ),
            }
        }

        debug!(
            external_id,
            copies = copies.len(),
            branch = %self.branch_name,
            "Fetched copy information"
        );
        Ok(self.summarize(entry, &copies))
    }
}
