//! Reading list CSV export loader.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::types::{ShelfFilter, WishlistEntry};
use super::WishlistError;

const TITLE_COLUMN: &str = "Title";
const AUTHOR_COLUMN: &str = "Author";
const EXCLUSIVE_SHELF_COLUMN: &str = "Exclusive Shelf";
const BOOKSHELVES_COLUMN: &str = "Bookshelves";

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    title: usize,
    author: usize,
    exclusive_shelf: Option<usize>,
    bookshelves: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, WishlistError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let title =
            find(TITLE_COLUMN).ok_or_else(|| WishlistError::MissingColumn(TITLE_COLUMN.into()))?;
        let author = find(AUTHOR_COLUMN)
            .ok_or_else(|| WishlistError::MissingColumn(AUTHOR_COLUMN.into()))?;
        let exclusive_shelf = find(EXCLUSIVE_SHELF_COLUMN);
        let bookshelves = find(BOOKSHELVES_COLUMN);

        if exclusive_shelf.is_none() && bookshelves.is_none() {
            return Err(WishlistError::MissingColumn(format!(
                "{} or {}",
                EXCLUSIVE_SHELF_COLUMN, BOOKSHELVES_COLUMN
            )));
        }

        Ok(Self {
            title,
            author,
            exclusive_shelf,
            bookshelves,
        })
    }

    fn shelf_tags(&self, record: &csv::StringRecord) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        if let Some(shelf) = self.exclusive_shelf.and_then(|i| record.get(i)) {
            let shelf = shelf.trim();
            if !shelf.is_empty() {
                tags.insert(shelf.to_string());
            }
        }
        if let Some(shelves) = self.bookshelves.and_then(|i| record.get(i)) {
            tags.extend(
                shelves
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        tags
    }
}

/// Load and filter wishlist entries from an export file.
pub fn load_wishlist(
    path: &Path,
    filter: &ShelfFilter,
) -> Result<Vec<WishlistEntry>, WishlistError> {
    let file = std::fs::File::open(path).map_err(|e| WishlistError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let entries = read_wishlist(file, filter)?;
    info!(
        path = %path.display(),
        shelf = %filter.shelf,
        entries = entries.len(),
        "Loaded wishlist"
    );
    Ok(entries)
}

/// Read and filter wishlist entries from any CSV source.
///
/// Output order follows the export's row order; the optional entry limit is
/// applied after filtering.
pub fn read_wishlist<R: Read>(
    reader: R,
    filter: &ShelfFilter,
) -> Result<Vec<WishlistEntry>, WishlistError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::resolve(reader.headers()?)?;
    debug!(?columns, "Resolved export columns");

    let mut entries = Vec::new();
    for record in reader.records() {
        if filter.max_entries.is_some_and(|max| entries.len() >= max) {
            break;
        }

        let record = record?;
        let tags = columns.shelf_tags(&record);
        if !filter.selects(&tags) || filter.excludes(&tags) {
            continue;
        }

        let raw_title = record.get(columns.title).unwrap_or_default();
        let author = record.get(columns.author).unwrap_or_default();
        entries.push(WishlistEntry::new(raw_title, author, tags));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wishlist::ShelfMatchMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXPORT: &str = "\
Book Id,Title,Author,Exclusive Shelf,Bookshelves
1,Heen: A Novel [Dutch Edition],Laurens Verhagen,to-read,to-read
2,Middlemarch,George Eliot,read,read
3,\"The Fifth Season (The Broken Earth, #1)\",N.K. Jemisin,to-read,\"to-read, owned\"
4,Stoner,John Williams,to-read,\"to-read, fiction\"
5,Circe,Madeline Miller,currently-reading,\"currently-reading, to-read-later\"
";

    #[test]
    fn test_exact_shelf_filter_keeps_order() {
        let entries = read_wishlist(EXPORT.as_bytes(), &ShelfFilter::exact("to-read")).unwrap();
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Heen", "The Fifth Season", "Stoner"]);
        assert_eq!(entries[0].author, "Laurens Verhagen");
        assert!(entries[1].shelf_tags.contains("owned"));
    }

    #[test]
    fn test_contains_mode_matches_substrings() {
        let filter = ShelfFilter {
            mode: ShelfMatchMode::Contains,
            ..ShelfFilter::exact("to-read")
        };
        let entries = read_wishlist(EXPORT.as_bytes(), &filter).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].title, "Circe");
    }

    #[test]
    fn test_exclusions_are_case_insensitive() {
        let filter = ShelfFilter {
            exclude: vec!["OWNED".to_string(), "fict".to_string()],
            ..ShelfFilter::exact("to-read")
        };
        let entries = read_wishlist(EXPORT.as_bytes(), &filter).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Heen");
    }

    #[test]
    fn test_max_entries_truncates_after_filtering() {
        let filter = ShelfFilter {
            max_entries: Some(2),
            ..ShelfFilter::exact("to-read")
        };
        let entries = read_wishlist(EXPORT.as_bytes(), &filter).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title, "The Fifth Season");
    }

    #[test]
    fn test_missing_author_column_is_data_format_error() {
        let export = "Title,Exclusive Shelf\nHeen,to-read\n";
        let err = read_wishlist(export.as_bytes(), &ShelfFilter::exact("to-read")).unwrap_err();
        assert!(matches!(err, WishlistError::MissingColumn(ref c) if c == "Author"));
    }

    #[test]
    fn test_missing_shelf_columns_is_data_format_error() {
        let export = "Title,Author\nHeen,Laurens Verhagen\n";
        let err = read_wishlist(export.as_bytes(), &ShelfFilter::exact("to-read")).unwrap_err();
        assert!(matches!(err, WishlistError::MissingColumn(_)));
    }

    #[test]
    fn test_bookshelves_only_export() {
        let export = "Title,Author,Bookshelves\nStoner,John Williams,\"fiction, to-read\"\n";
        let entries = read_wishlist(export.as_bytes(), &ShelfFilter::exact("to-read")).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_load_wishlist_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let entries = load_wishlist(file.path(), &ShelfFilter::exact("read")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].author, "George Eliot");
    }

    #[test]
    fn test_load_wishlist_missing_file() {
        let result = load_wishlist(
            Path::new("/nonexistent/export.csv"),
            &ShelfFilter::exact("to-read"),
        );
        assert!(matches!(result, Err(WishlistError::Io { .. })));
    }
}
