//! Reading list export loading.
//!
//! Turns a tabular export (Title, Author, Exclusive Shelf, Bookshelves) into
//! normalized [`WishlistEntry`] values selected by shelf.

mod loader;
mod normalize;
mod types;

pub use loader::{load_wishlist, read_wishlist};
pub use normalize::normalize_title;
pub use types::*;

use thiserror::Error;

use crate::config::WishlistConfig;

/// Errors raised while reading the export. All of them abort the run.
#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("Failed to open export {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed export: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export is missing required column: {0}")]
    MissingColumn(String),
}

impl From<&WishlistConfig> for ShelfFilter {
    fn from(config: &WishlistConfig) -> Self {
        Self {
            shelf: config.shelf.clone(),
            mode: config.shelf_match,
            exclude: config.exclude_shelves.clone(),
            max_entries: config.max_entries,
        }
    }
}
