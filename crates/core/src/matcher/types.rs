//! Types produced by the result matcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Media marker found on a catalogue result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Ebook,
    Audiobook,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Ebook => write!(f, "e-book"),
            MediaType::Audiobook => write!(f, "audiobook"),
        }
    }
}

/// Apparent language of a matched edition relative to the wishlist title.
///
/// Derived from title similarity only, which is a weak signal: a wishlist that
/// mixes languages will be misclassified. Informational, never used to filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditionLanguage {
    /// Title resembles the wishlist title.
    Source,
    /// Title differs; possibly a translation.
    Translated,
}

/// One result record after structural parsing, before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    /// Display title (title and subtitle joined with ": ").
    pub title: String,
    /// Contributors in "Given Surname" form, joined with ", ".
    pub author: String,
    pub external_id: String,
    pub detail_link: String,
    pub media: BTreeSet<MediaType>,
}

/// A catalogue result scored against a wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub source_title: String,
    pub source_author: String,
    pub matched_title: String,
    pub matched_author: String,
    pub external_id: String,
    pub detail_link: String,
    /// Partial-ratio similarity of the authors (0-100).
    pub author_similarity: u8,
    /// Partial-ratio similarity of the titles (0-100).
    pub title_similarity: u8,
    #[serde(default)]
    pub media: BTreeSet<MediaType>,
    pub edition: EditionLanguage,
}
