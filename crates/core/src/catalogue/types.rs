//! Types for catalogue search requests and raw responses.

use serde::{Deserialize, Serialize};

use crate::wishlist::WishlistEntry;

/// Media type restriction for a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaFilter {
    #[default]
    Ebook,
    Audiobook,
    Any,
}

/// A query issued for one wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query (the normalized title, unescaped).
    pub query_text: String,
    pub media_filter: MediaFilter,
}

impl SearchQuery {
    /// Build the query for a wishlist entry.
    pub fn for_entry(entry: &WishlistEntry, media_filter: MediaFilter) -> Self {
        Self {
            query_text: entry.title.clone(),
            media_filter,
        }
    }
}

/// Encoding of a raw response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Result page with `div.content.list-big` blocks.
    Html,
    /// Object list with nested field maps.
    Json,
}

/// Unparsed search response as returned by a catalogue.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub format: ResponseFormat,
    pub body: String,
    /// Base used to turn result references into absolute detail links.
    pub link_base: String,
}
