//! Types for the reading list export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::normalize::normalize_title;

/// A book the user wants to read, as loaded from the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Normalized title used for searching and matching.
    pub title: String,
    /// Author as written in the export.
    pub author: String,
    /// Title exactly as it appeared in the export.
    pub raw_title: String,
    /// Exclusive shelf plus every bookshelf tag on the row.
    pub shelf_tags: BTreeSet<String>,
}

impl WishlistEntry {
    /// Build an entry from a raw export title, normalizing it.
    pub fn new(
        raw_title: impl Into<String>,
        author: impl Into<String>,
        shelf_tags: BTreeSet<String>,
    ) -> Self {
        let raw_title = raw_title.into();
        Self {
            title: normalize_title(&raw_title),
            author: author.into().trim().to_string(),
            raw_title,
            shelf_tags,
        }
    }
}

/// How the target shelf is compared against a row's tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfMatchMode {
    /// A tag must equal the target shelf.
    #[default]
    Exact,
    /// A tag must contain the target shelf (case-insensitive).
    Contains,
}

/// Row selection applied after loading.
#[derive(Debug, Clone)]
pub struct ShelfFilter {
    pub shelf: String,
    pub mode: ShelfMatchMode,
    pub exclude: Vec<String>,
    pub max_entries: Option<usize>,
}

impl ShelfFilter {
    /// Filter on an exact shelf with no exclusions or limit.
    pub fn exact(shelf: impl Into<String>) -> Self {
        Self {
            shelf: shelf.into(),
            mode: ShelfMatchMode::Exact,
            exclude: Vec::new(),
            max_entries: None,
        }
    }

    /// Whether the given tags select the row.
    pub fn selects(&self, tags: &BTreeSet<String>) -> bool {
        match self.mode {
            ShelfMatchMode::Exact => tags.contains(&self.shelf),
            ShelfMatchMode::Contains => {
                let wanted = self.shelf.to_lowercase();
                tags.iter().any(|t| t.to_lowercase().contains(&wanted))
            }
        }
    }

    /// Whether any exclusion matches one of the tags.
    pub fn excludes(&self, tags: &BTreeSet<String>) -> bool {
        self.exclude.iter().any(|excluded| {
            let excluded = excluded.to_lowercase();
            !excluded.is_empty() && tags.iter().any(|t| t.to_lowercase().contains(&excluded))
        })
    }
}
