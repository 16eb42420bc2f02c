//! Result matching.
//!
//! Parses raw catalogue responses into candidate records and scores each
//! against the wishlist (title, author) pair with partial-ratio similarity.
//! Candidates whose author similarity falls below the configured threshold
//! are discarded; title similarity is kept for information only.

mod parse;
mod similarity;
mod types;

pub use parse::{parse_html_results, parse_response, parse_wise_results, reverse_name};
pub use similarity::partial_ratio;
pub use types::*;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalogue::RawResponse;
use crate::wishlist::WishlistEntry;

/// Errors raised while parsing catalogue data.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Record is missing field '{field}': {record}")]
    MissingField { field: &'static str, record: String },

    #[error("Invalid record ({reason}): {record}")]
    InvalidValue { reason: String, record: String },
}

/// Configuration for the matcher.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Minimum author similarity (0-100) for a candidate to survive.
    pub author_threshold: u8,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            author_threshold: 75,
        }
    }
}

/// Scores catalogue results against wishlist entries.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    /// Create a matcher with the given author threshold.
    pub fn new(author_threshold: u8) -> Self {
        Self::with_config(MatcherConfig { author_threshold })
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn author_threshold(&self) -> u8 {
        self.config.author_threshold
    }

    /// Score one parsed record against an entry.
    pub fn score(&self, entry: &WishlistEntry, raw: RawCandidate) -> CandidateMatch {
        let author_similarity = partial_ratio(&entry.author, &raw.author);
        let title_similarity = partial_ratio(&entry.title, &raw.title);
        let edition = if title_similarity >= self.config.author_threshold {
            EditionLanguage::Source
        } else {
            EditionLanguage::Translated
        };

        CandidateMatch {
            source_title: entry.title.clone(),
            source_author: entry.author.clone(),
            matched_title: raw.title,
            matched_author: raw.author,
            external_id: raw.external_id,
            detail_link: raw.detail_link,
            author_similarity,
            title_similarity,
            media: raw.media,
            edition,
        }
    }

    /// Keep the scored records that clear the author threshold.
    ///
    /// Failed records are logged and skipped; order is preserved.
    pub fn select(
        &self,
        entry: &WishlistEntry,
        records: Vec<Result<RawCandidate, ParseError>>,
    ) -> Vec<CandidateMatch> {
        let mut matches = Vec::new();

        for record in records {
            let raw = match record {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        title = %entry.title,
                        author = %entry.author,
                        stage = "parse",
                        error = %e,
                        "Skipping malformed result record"
                    );
                    continue;
                }
            };

            let candidate = self.score(entry, raw);
            if candidate.author_similarity < self.config.author_threshold {
                debug!(
                    title = %entry.title,
                    matched_author = %candidate.matched_author,
                    author_similarity = candidate.author_similarity,
                    "Discarding candidate below author threshold"
                );
                continue;
            }

            debug!(
                title = %entry.title,
                matched_title = %candidate.matched_title,
                author_similarity = candidate.author_similarity,
                title_similarity = candidate.title_similarity,
                edition = ?candidate.edition,
                "Candidate matched"
            );
            matches.push(candidate);
        }

        matches
    }

    /// Parse a raw response and return the surviving candidates.
    pub fn match_response(
        &self,
        entry: &WishlistEntry,
        response: &RawResponse,
    ) -> Result<Vec<CandidateMatch>, ParseError> {
        let records = parse_response(response)?;
        Ok(self.select(entry, records))
    }
}
