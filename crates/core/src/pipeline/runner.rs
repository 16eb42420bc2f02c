//! Sequential wishlist processing.
//!
//! Each entry is taken through search, matching, availability and details
//! before the next one starts. Network and parse failures are recovered per
//! entry: the entry yields no matches and the run moves on.

use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::availability::{parse_details, AvailabilityResolver, TitleDetails};
use crate::catalogue::{HoldingsClient, MediaFilter, SearchClient, SearchQuery};
use crate::matcher::{CandidateMatch, Matcher};
use crate::wishlist::WishlistEntry;

use super::types::{EnrichedMatch, EntryFailure, FailureStage, RunOutcome};

/// Holdings lookups for branch catalogues.
struct Holdings {
    client: Arc<dyn HoldingsClient>,
    resolver: AvailabilityResolver,
}

/// Drives wishlist entries through a catalogue.
pub struct CataloguePipeline {
    search: Arc<dyn SearchClient>,
    holdings: Option<Holdings>,
    matcher: Matcher,
    media_filter: MediaFilter,
}

impl CataloguePipeline {
    /// Create a pipeline that only searches and matches.
    pub fn new(search: Arc<dyn SearchClient>, matcher: Matcher, media_filter: MediaFilter) -> Self {
        Self {
            search,
            holdings: None,
            matcher,
            media_filter,
        }
    }

    /// Resolve branch availability and details for every surviving candidate.
    pub fn with_holdings(
        mut self,
        client: Arc<dyn HoldingsClient>,
        resolver: AvailabilityResolver,
    ) -> Self {
        self.holdings = Some(Holdings { client, resolver });
        self
    }

    /// Process all entries in order.
    pub async fn run(&self, entries: &[WishlistEntry]) -> RunOutcome {
        let mut outcome = RunOutcome::default();

        info!(
            catalogue = self.search.name(),
            entries = entries.len(),
            author_threshold = self.matcher.author_threshold(),
            "Starting catalogue run"
        );

        for entry in entries {
            let matches = self.process_entry(entry, &mut outcome.failures).await;
            outcome.matches.extend(matches);
            outcome.entries_processed += 1;
        }

        info!(
            entries = outcome.entries_processed,
            matches = outcome.matches.len(),
            failures = outcome.failures.len(),
            "Catalogue run complete"
        );

        outcome
    }

    async fn process_entry(
        &self,
        entry: &WishlistEntry,
        failures: &mut Vec<EntryFailure>,
    ) -> Vec<EnrichedMatch> {
        info!(title = %entry.title, author = %entry.author, "Checking availability");

        let query = SearchQuery::for_entry(entry, self.media_filter);
        let response = match self.search.search(&query).await {
            Ok(response) => response,
            Err(e) => {
                failures.push(recover(entry, FailureStage::Search, &e));
                return Vec::new();
            }
        };

        let candidates = match self.matcher.match_response(entry, &response) {
            Ok(candidates) => candidates,
            Err(e) => {
                failures.push(recover(entry, FailureStage::Parse, &e));
                return Vec::new();
            }
        };

        let Some(holdings) = &self.holdings else {
            return candidates
                .into_iter()
                .map(|candidate| EnrichedMatch {
                    candidate,
                    availability: None,
                    details: None,
                })
                .collect();
        };

        let mut enriched = Vec::new();
        for candidate in candidates {
            let availability = match holdings
                .resolver
                .resolve(holdings.client.as_ref(), entry, &candidate.external_id)
                .await
            {
                Ok(Some(summary)) => summary,
                Ok(None) => {
                    debug!(
                        title = %entry.title,
                        external_id = %candidate.external_id,
                        branch = holdings.resolver.branch_name(),
                        "No copies at branch, dropping candidate"
                    );
                    continue;
                }
                Err(e) => {
                    failures.push(recover(entry, FailureStage::Availability, &e));
                    return Vec::new();
                }
            };

            let details = self
                .fetch_details(holdings, entry, &candidate, failures)
                .await;

            enriched.push(EnrichedMatch {
                candidate,
                availability: Some(availability),
                details,
            });
        }

        enriched
    }

    async fn fetch_details(
        &self,
        holdings: &Holdings,
        entry: &WishlistEntry,
        candidate: &CandidateMatch,
        failures: &mut Vec<EntryFailure>,
    ) -> Option<TitleDetails> {
        let body = match holdings.client.details(&candidate.external_id).await {
            Ok(body) => body,
            Err(e) => {
                failures.push(recover(entry, FailureStage::Details, &e));
                return None;
            }
        };

        match parse_details(&body) {
            Ok(details) => Some(details),
            Err(e) => {
                failures.push(recover(entry, FailureStage::Details, &e));
                None
            }
        }
    }
}

/// Log a recovered error and turn it into a failure record.
fn recover(entry: &WishlistEntry, stage: FailureStage, error: &dyn Display) -> EntryFailure {
    warn!(
        title = %entry.title,
        author = %entry.author,
        stage = %stage,
        error = %error,
        "Recovered from catalogue error, skipping"
    );

    EntryFailure {
        title: entry.title.clone(),
        author: entry.author.clone(),
        stage,
        message: error.to_string(),
    }
}
