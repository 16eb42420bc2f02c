//! Human-readable report and CSV result table.
//!
//! One text block per match, blocks separated by a blank line:
//!
//! ```text
//! Heen - Laurens Verhagen
//! https://obgz.hostedwise.nl/wise-apps/catalog/9990/detail/wise/218065
//! Available: 1
//! Locations: Romans VERH
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::availability::AvailabilitySummary;
use crate::matcher::EditionLanguage;
use crate::pipeline::EnrichedMatch;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write result table: {0}")]
    Csv(#[from] csv::Error),
}

/// Render the text report.
pub fn format_report(matches: &[EnrichedMatch]) -> String {
    let mut out = String::new();
    for m in matches {
        out.push_str(&format_block(m));
        out.push('\n');
    }
    out
}

fn format_block(m: &EnrichedMatch) -> String {
    let c = &m.candidate;
    let mut lines = vec![
        format!("{} - {}", c.matched_title, c.matched_author),
        c.detail_link.clone(),
    ];

    if c.edition == EditionLanguage::Translated {
        lines.push(format!(
            "Note: possibly a translated edition of \"{}\"",
            c.source_title
        ));
    }

    if let Some(details) = &m.details {
        if let Some(synopsis) = &details.synopsis {
            lines.push(format!("Synopsis: {}", synopsis.trim()));
        }
        if let Some(note) = &details.acquisition_note {
            lines.push(format!("Acquisition: {}", note.trim()));
        }
        if let Some(language) = &details.language {
            lines.push(format!("Language: {}", language.trim()));
        }
    }

    match &m.availability {
        Some(summary) => {
            let available = summary.available();
            lines.push(format!("Available: {}", available));
            if available > 0 {
                lines.push(format!("Locations: {}", join_locations(summary, ", ")));
            } else {
                lines.push(format!("Return dates: {}", join_dates(summary, ", ")));
            }
        }
        None => {
            if !c.media.is_empty() {
                let media: Vec<String> = c.media.iter().map(ToString::to_string).collect();
                lines.push(format!("Media: {}", media.join(", ")));
            }
        }
    }

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

fn join_locations(summary: &AvailabilitySummary, separator: &str) -> String {
    summary
        .available_locations
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

fn join_dates(summary: &AvailabilitySummary, separator: &str) -> String {
    summary
        .on_loan_return_dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Write the CSV result table, one row per match.
pub fn write_table<W: Write>(writer: W, matches: &[EnrichedMatch]) -> Result<(), ReportError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record([
        "source_title",
        "source_author",
        "title",
        "author",
        "link",
        "author_similarity",
        "title_similarity",
        "media",
        "available",
        "on_loan",
        "locations",
        "return_dates",
    ])?;

    for m in matches {
        let c = &m.candidate;
        let media: Vec<String> = c.media.iter().map(ToString::to_string).collect();
        let (available, on_loan, locations, dates) = match &m.availability {
            Some(summary) => (
                summary.available().to_string(),
                summary.on_loan().to_string(),
                join_locations(summary, "; "),
                join_dates(summary, "; "),
            ),
            None => (String::new(), String::new(), String::new(), String::new()),
        };

        csv.write_record([
            c.source_title.clone(),
            c.source_author.clone(),
            c.matched_title.clone(),
            c.matched_author.clone(),
            c.detail_link.clone(),
            c.author_similarity.to_string(),
            c.title_similarity.to_string(),
            media.join("; "),
            available,
            on_loan,
            locations,
            dates,
        ])?;
    }

    csv.flush().map_err(|e| ReportError::Io {
        path: "result table".to_string(),
        source: e,
    })?;
    Ok(())
}

/// Prints the report and writes it to disk.
#[derive(Debug, Clone)]
pub struct Reporter {
    report_path: PathBuf,
    table_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(report_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
            table_path: None,
        }
    }

    pub fn with_table(mut self, table_path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(table_path.into());
        self
    }

    /// Print the report to `out` and write it (and the table, if configured),
    /// overwriting previous files.
    pub fn publish<W: Write>(
        &self,
        matches: &[EnrichedMatch],
        out: &mut W,
    ) -> Result<String, ReportError> {
        let text = format_report(matches);

        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| io_error(Path::new("<stdout>"), e))?;

        fs::write(&self.report_path, &text).map_err(|e| io_error(&self.report_path, e))?;
        info!(path = %self.report_path.display(), matches = matches.len(), "Report written");

        if let Some(table_path) = &self.table_path {
            let file = fs::File::create(table_path).map_err(|e| io_error(table_path, e))?;
            write_table(file, matches)?;
            info!(path = %table_path.display(), "Result table written");
        }

        Ok(text)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{AvailabilitySummary, StatusKind, TitleDetails};
    use crate::matcher::{CandidateMatch, MediaType};
    use chrono::NaiveDate;
    use std::collections::{BTreeMap, BTreeSet};
    use tempfile::TempDir;

    fn candidate(title: &str, edition: EditionLanguage) -> CandidateMatch {
        CandidateMatch {
            source_title: title.to_string(),
            source_author: "Laurens Verhagen".to_string(),
            matched_title: title.to_string(),
            matched_author: "Laurens Verhagen".to_string(),
            external_id: "218065".to_string(),
            detail_link: "https://example.org/detail/218065".to_string(),
            author_similarity: 100,
            title_similarity: 100,
            media: BTreeSet::new(),
            edition,
        }
    }

    fn available_match() -> EnrichedMatch {
        EnrichedMatch {
            candidate: candidate("Heen", EditionLanguage::Source),
            availability: Some(AvailabilitySummary {
                per_status_counts: BTreeMap::from([(StatusKind::Available, 2)]),
                available_locations: BTreeSet::from(["Romans VERH".to_string()]),
                on_loan_return_dates: vec![],
            }),
            details: Some(TitleDetails {
                synopsis: Some("Een roman over vertrekken.".to_string()),
                acquisition_note: None,
                language: None,
            }),
        }
    }

    fn on_loan_match() -> EnrichedMatch {
        EnrichedMatch {
            candidate: candidate("Stoner", EditionLanguage::Source),
            availability: Some(AvailabilitySummary {
                per_status_counts: BTreeMap::from([(StatusKind::OnLoan, 2)]),
                available_locations: BTreeSet::new(),
                on_loan_return_dates: vec![
                    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
                ],
            }),
            details: None,
        }
    }

    #[test]
    fn test_format_available_block() {
        let text = format_report(&[available_match()]);
        assert_eq!(
            text,
            "Heen - Laurens Verhagen\n\
             https://example.org/detail/218065\n\
             Synopsis: Een roman over vertrekken.\n\
             Available: 2\n\
             Locations: Romans VERH\n\
             \n"
        );
    }

    #[test]
    fn test_format_on_loan_block_lists_dates() {
        let text = format_report(&[on_loan_match()]);
        assert!(text.contains("Available: 0\n"));
        assert!(text.contains("Return dates: 2024-03-01, 2024-03-09\n"));
        assert!(!text.contains("Locations"));
    }

    #[test]
    fn test_format_digital_block_shows_media() {
        let mut c = candidate("Heen", EditionLanguage::Translated);
        c.media = BTreeSet::from([MediaType::Ebook, MediaType::Audiobook]);
        let text = format_report(&[EnrichedMatch {
            candidate: c,
            availability: None,
            details: None,
        }]);
        assert!(text.contains("Media: e-book, audiobook\n"));
        assert!(text.contains("Note: possibly a translated edition of \"Heen\"\n"));
        assert!(!text.contains("Available"));
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let text = format_report(&[available_match(), on_loan_match()]);
        assert!(text.contains("Locations: Romans VERH\n\nStoner - Laurens Verhagen\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(format_report(&[]), "");
    }

    #[test]
    fn test_write_table() {
        let mut buf = Vec::new();
        write_table(&mut buf, &[available_match(), on_loan_match()]).unwrap();
        let table = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("source_title,source_author,title"));
        assert!(lines[1].contains(",2,0,Romans VERH,"));
        assert!(lines[2].ends_with(",0,2,,2024-03-01; 2024-03-09"));
    }

    #[test]
    fn test_publish_overwrites_report_file() {
        let dir = TempDir::new().unwrap();
        let report_path = dir.path().join("report.txt");
        let table_path = dir.path().join("report.csv");
        fs::write(&report_path, "stale contents from a previous run\n".repeat(10)).unwrap();

        let reporter = Reporter::new(&report_path).with_table(&table_path);
        let mut stdout = Vec::new();
        let text = reporter.publish(&[available_match()], &mut stdout).unwrap();

        assert_eq!(String::from_utf8(stdout).unwrap(), text);
        assert_eq!(fs::read_to_string(&report_path).unwrap(), text);
        assert!(fs::read_to_string(&table_path).unwrap().contains("Heen"));
    }
}
