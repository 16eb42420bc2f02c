//! Structural parsing of catalogue search responses.
//!
//! Each parser returns one `Result` per record so a malformed record can be
//! skipped without losing its neighbours.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::catalogue::{RawResponse, ResponseFormat};

use super::types::{MediaType, RawCandidate};
use super::ParseError;

const EBOOK_MARKER: &str = "E-book";
const AUDIOBOOK_MARKER: &str = "Luisterboek";

/// Parse a raw search response into per-record results.
///
/// Fails as a whole only when the body itself is unusable.
pub fn parse_response(
    response: &RawResponse,
) -> Result<Vec<Result<RawCandidate, ParseError>>, ParseError> {
    match response.format {
        ResponseFormat::Html => Ok(parse_html_results(&response.body, &response.link_base)),
        ResponseFormat::Json => parse_wise_results(&response.body, &response.link_base),
    }
}

// ============================================================================
// Online library (HTML)
// ============================================================================

struct ResultSelectors {
    block: Selector,
    creator: Selector,
    title: Selector,
    link: Selector,
    additional: Selector,
}

impl ResultSelectors {
    fn new() -> Self {
        let parse = |css: &str| Selector::parse(css).expect("valid result selector");
        Self {
            block: parse("div.content.list-big"),
            creator: parse("span.creator"),
            title: parse("span.title"),
            link: parse("a.distinctparts"),
            additional: parse("p.additional"),
        }
    }
}

/// Parse result blocks from an online library result page.
pub fn parse_html_results(body: &str, link_base: &str) -> Vec<Result<RawCandidate, ParseError>> {
    let document = Html::parse_document(body);
    let selectors = ResultSelectors::new();

    document
        .select(&selectors.block)
        .map(|block| parse_html_block(block, &selectors, link_base))
        .collect()
}

fn parse_html_block(
    block: ElementRef<'_>,
    selectors: &ResultSelectors,
    link_base: &str,
) -> Result<RawCandidate, ParseError> {
    let first_text = |selector: &Selector, field: &'static str| {
        block
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or_else(|| ParseError::MissingField {
                field,
                record: snippet(&block.html()),
            })
    };

    let author = first_text(&selectors.creator, "creator")?;
    let title = first_text(&selectors.title, "title")?;

    let href = block
        .select(&selectors.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or_else(|| ParseError::MissingField {
            field: "link",
            record: snippet(&block.html()),
        })?;

    let additional = block
        .select(&selectors.additional)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>()
        .join("|");

    let mut media = BTreeSet::new();
    for info in additional.split('|').map(str::trim) {
        match info {
            EBOOK_MARKER => {
                media.insert(MediaType::Ebook);
            }
            AUDIOBOOK_MARKER => {
                media.insert(MediaType::Audiobook);
            }
            _ => {}
        }
    }

    Ok(RawCandidate {
        title,
        author,
        external_id: href.to_string(),
        detail_link: resolve_link(link_base, href),
        media,
    })
}

/// Make a result href absolute.
fn resolve_link(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), href)
    }
}

// ============================================================================
// Wise catalogue (JSON)
// ============================================================================

#[derive(Debug, Deserialize)]
struct WiseSearchResponse {
    objects: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct WiseObject {
    fields: WiseFields,
}

#[derive(Debug, Deserialize)]
struct WiseFields {
    #[serde(default)]
    auteur: Option<MultiField>,
    #[serde(default)]
    ovrg_aut: Option<MultiField>,
    #[serde(default)]
    titel: Option<SingleField>,
    #[serde(default)]
    subtitle: Option<SingleField>,
    id: Option<SingleField>,
}

#[derive(Debug, Deserialize)]
struct MultiField {
    #[serde(default)]
    content: Vec<FieldValue>,
}

#[derive(Debug, Deserialize)]
struct SingleField {
    content: FieldValue,
}

#[derive(Debug, Deserialize)]
struct FieldValue {
    value: Scalar,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Parse the object list of a Wise search response.
pub fn parse_wise_results(
    body: &str,
    link_base: &str,
) -> Result<Vec<Result<RawCandidate, ParseError>>, ParseError> {
    let response: WiseSearchResponse = serde_json::from_str(body)
        .map_err(|e| ParseError::MalformedResponse(e.to_string()))?;

    Ok(response
        .objects
        .unwrap_or_default()
        .into_iter()
        .map(|object| parse_wise_object(object, link_base))
        .collect())
}

fn parse_wise_object(
    object: serde_json::Value,
    link_base: &str,
) -> Result<RawCandidate, ParseError> {
    let record = snippet(&object.to_string());
    let parsed: WiseObject =
        serde_json::from_value(object).map_err(|e| ParseError::InvalidValue {
            reason: e.to_string(),
            record: record.clone(),
        })?;
    let fields = parsed.fields;

    let author = [fields.auteur, fields.ovrg_aut]
        .into_iter()
        .flatten()
        .flat_map(|field| field.content)
        .map(|person| reverse_name(&person.value.to_string()))
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let title = [fields.titel, fields.subtitle]
        .into_iter()
        .flatten()
        .map(|field| field.content.value.to_string())
        .collect::<Vec<_>>()
        .join(": ");

    let id = fields
        .id
        .map(|field| field.content.value.to_string())
        .filter(|id| !id.is_empty())
        .ok_or(ParseError::MissingField { field: "id", record })?;

    Ok(RawCandidate {
        title,
        author,
        detail_link: format!("{}{}", link_base, id),
        external_id: id,
        media: BTreeSet::new(),
    })
}

/// Turn "Surname, Given" into "Given Surname".
pub fn reverse_name(name: &str) -> String {
    name.split(',')
        .rev()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn snippet(raw: &str) -> String {
    const MAX: usize = 200;
    if raw.chars().count() > MAX {
        format!("{}...", raw.chars().take(MAX).collect::<String>())
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<div class="content list-big">
  <h3><a class="distinctparts" href="/catalogus/heen/12345"><span class="title">Heen</span></a></h3>
  <span class="creator">Laurens Verhagen</span>
  <p class="additional">E-book | Nederlands</p>
  <p class="additional">2020</p>
</div>
<div class="content list-big">
  <span class="title">Heen</span>
  <span class="creator">Laurens Verhagen</span>
  <p class="additional">Luisterboek</p>
</div>
<div class="content list-big">
  <a class="distinctparts" href="https://other.example/heen"><span class="title">Heen en weer</span></a>
  <span class="creator">Iemand Anders</span>
  <p class="additional">Luisterboek|E-book</p>
</div>
</body></html>
"#;

    #[test]
    fn test_parse_html_results() {
        let records = parse_html_results(PAGE, "https://www.onlinebibliotheek.nl");
        assert_eq!(records.len(), 3);

        let first = records[0].as_ref().unwrap();
        assert_eq!(first.title, "Heen");
        assert_eq!(first.author, "Laurens Verhagen");
        assert_eq!(first.external_id, "/catalogus/heen/12345");
        assert_eq!(
            first.detail_link,
            "https://www.onlinebibliotheek.nl/catalogus/heen/12345"
        );
        assert_eq!(first.media, BTreeSet::from([MediaType::Ebook]));

        assert!(matches!(
            records[1],
            Err(ParseError::MissingField { field: "link", .. })
        ));

        let third = records[2].as_ref().unwrap();
        assert_eq!(third.detail_link, "https://other.example/heen");
        assert_eq!(
            third.media,
            BTreeSet::from([MediaType::Ebook, MediaType::Audiobook])
        );
    }

    #[test]
    fn test_parse_html_without_results() {
        let records = parse_html_results("<html><body><p>Geen resultaten</p></body></html>", "x");
        assert!(records.is_empty());
    }

    const WISE: &str = r#"{
  "objects": [
    {"fields": {
      "auteur": {"content": [{"value": "Verhagen, Laurens"}]},
      "titel": {"content": {"value": "Heen"}},
      "subtitle": {"content": {"value": "roman"}},
      "id": {"content": {"value": "218065"}}
    }},
    {"fields": {
      "titel": {"content": {"value": "Zonder id"}}
    }},
    {"fields": {
      "auteur": {"content": [{"value": "Jemisin, N.K."}]},
      "ovrg_aut": {"content": [{"value": "Kluitmann, Paul"}]},
      "titel": {"content": {"value": "Het vijfde seizoen"}},
      "id": {"content": {"value": 99}}
    }},
    "not an object"
  ]
}"#;

    #[test]
    fn test_parse_wise_results() {
        let base = "https://obgz.hostedwise.nl/wise-apps/catalog/9990/detail/wise/";
        let records = parse_wise_results(WISE, base).unwrap();
        assert_eq!(records.len(), 4);

        let first = records[0].as_ref().unwrap();
        assert_eq!(first.author, "Laurens Verhagen");
        assert_eq!(first.title, "Heen: roman");
        assert_eq!(first.external_id, "218065");
        assert_eq!(
            first.detail_link,
            "https://obgz.hostedwise.nl/wise-apps/catalog/9990/detail/wise/218065"
        );

        assert!(matches!(
            records[1],
            Err(ParseError::MissingField { field: "id", .. })
        ));

        let third = records[2].as_ref().unwrap();
        assert_eq!(third.author, "N.K. Jemisin, Paul Kluitmann");
        assert_eq!(third.external_id, "99");

        assert!(matches!(records[3], Err(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_wise_malformed_body() {
        let result = parse_wise_results("<html>login required</html>", "");
        assert!(matches!(result, Err(ParseError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_wise_missing_objects_is_empty() {
        let records = parse_wise_results("{}", "").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_reverse_name() {
        assert_eq!(reverse_name("Verhagen, Laurens"), "Laurens Verhagen");
        assert_eq!(reverse_name("Plato"), "Plato");
        assert_eq!(reverse_name(" Eliot , George "), "George Eliot");
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(resolve_link("https://a.nl/", "/b"), "https://a.nl/b");
        assert_eq!(resolve_link("https://a.nl", "b"), "https://a.nl/b");
        assert_eq!(resolve_link("https://a.nl", "http://c.nl/d"), "http://c.nl/d");
    }
}
