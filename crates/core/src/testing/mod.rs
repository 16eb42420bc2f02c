//! Testing utilities and mock implementations.
//!
//! Mock catalogue clients let the whole pipeline run without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelfcheck_core::testing::{fixtures, MockHoldingsClient, MockSearchClient};
//!
//! let search = MockSearchClient::json("https://example.org/detail/");
//! let holdings = MockHoldingsClient::new();
//!
//! search.set_body("Heen", fixtures::wise_search_body(&[("1", "Verhagen, Laurens", "Heen")])).await;
//! holdings.set_copies("1", fixtures::copies_body(&[("AVAILABLE", "Centrum", "Romans", None)])).await;
//! ```

mod mock_catalogue;

pub use mock_catalogue::{MockHoldingsClient, MockSearchClient};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;
    use std::collections::BTreeSet;

    use crate::wishlist::WishlistEntry;

    /// Create a wishlist entry on the "to-read" shelf.
    pub fn wishlist_entry(title: &str, author: &str) -> WishlistEntry {
        WishlistEntry::new(title, author, BTreeSet::from(["to-read".to_string()]))
    }

    /// Build a Wise search body from (id, "Surname, Given", title) triples.
    pub fn wise_search_body(records: &[(&str, &str, &str)]) -> String {
        let objects: Vec<_> = records
            .iter()
            .map(|(id, author, title)| {
                json!({
                    "fields": {
                        "auteur": {"content": [{"value": author}]},
                        "titel": {"content": {"value": title}},
                        "id": {"content": {"value": id}}
                    }
                })
            })
            .collect();
        json!({ "objects": objects }).to_string()
    }

    /// Build a copy list body from (status, branch, sub location, return date) tuples.
    pub fn copies_body(copies: &[(&str, &str, &str, Option<&str>)]) -> String {
        let items: Vec<_> = copies
            .iter()
            .map(|(status, branch, location, return_date)| {
                json!({
                    "effectiveStatus": status,
                    "branchName": branch,
                    "subLocation": location,
                    "callNumber": "R",
                    "returnDate": return_date
                })
            })
            .collect();
        serde_json::Value::Array(items).to_string()
    }

    /// Build an online library result page from (title, author, href, info) tuples.
    pub fn online_library_page(results: &[(&str, &str, &str, &str)]) -> String {
        let blocks: String = results
            .iter()
            .map(|(title, author, href, info)| {
                format!(
                    r#"<div class="content list-big">
  <a class="distinctparts" href="{href}"><span class="title">{title}</span></a>
  <span class="creator">{author}</span>
  <p class="additional">{info}</p>
</div>
"#
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", blocks)
    }
}
