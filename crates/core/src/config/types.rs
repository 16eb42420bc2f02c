use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalogue::MediaFilter;
use crate::wishlist::ShelfMatchMode;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub wishlist: WishlistConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    pub catalogue: CatalogueConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Reading list export and shelf filtering
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WishlistConfig {
    /// Path to the reading list CSV export
    pub export_path: PathBuf,
    /// Shelf tag that selects wishlist rows (default: "to-read")
    #[serde(default = "default_shelf")]
    pub shelf: String,
    #[serde(default)]
    pub shelf_match: ShelfMatchMode,
    /// Rows carrying any of these shelves are skipped (case-insensitive substring)
    #[serde(default)]
    pub exclude_shelves: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

fn default_shelf() -> String {
    "to-read".to_string()
}

/// Fuzzy matching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Minimum author similarity (0-100) for a candidate to be kept
    #[serde(default = "default_author_threshold")]
    pub author_threshold: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            author_threshold: default_author_threshold(),
        }
    }
}

fn default_author_threshold() -> u8 {
    75
}

/// Which catalogue to query
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogueConfig {
    pub kind: CatalogueKind,
    /// Online library configuration (required when kind = "online_library")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_library: Option<OnlineLibraryConfig>,
    /// Wise branch catalogue configuration (required when kind = "wise")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wise: Option<WiseConfig>,
}

/// Available catalogue backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatalogueKind {
    OnlineLibrary,
    Wise,
}

/// Digital lending catalogue (HTML search pages)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OnlineLibraryConfig {
    #[serde(default = "default_online_library_url")]
    pub base_url: String,
    #[serde(default)]
    pub media: MediaFilter,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_online_library_url() -> String {
    "https://www.onlinebibliotheek.nl".to_string()
}

/// Branch catalogue backed by a Wise installation (JSON endpoints)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WiseConfig {
    pub base_url: String,
    #[serde(default = "default_branch_id")]
    pub branch_id: String,
    /// Physical branch whose copies are reported
    pub branch_name: String,
    /// Number of search results requested per query (default: 10)
    #[serde(default = "default_result_count")]
    pub result_count: u32,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub session: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_branch_id() -> String {
    "9990".to_string()
}

fn default_result_count() -> u32 {
    10
}

fn default_timeout() -> u32 {
    30
}

/// Report destinations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    /// Optional CSV result table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            table_path: None,
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from("shelfcheck.txt")
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub wishlist: WishlistConfig,
    pub matching: MatchingConfig,
    pub catalogue: SanitizedCatalogueConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogueConfig {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_library: Option<OnlineLibraryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wise: Option<SanitizedWiseConfig>,
}

/// Sanitized Wise config (key and session hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedWiseConfig {
    pub base_url: String,
    pub branch_id: String,
    pub branch_name: String,
    pub result_count: u32,
    pub api_key_configured: bool,
    pub session_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            wishlist: config.wishlist.clone(),
            matching: config.matching.clone(),
            catalogue: SanitizedCatalogueConfig {
                kind: match config.catalogue.kind {
                    CatalogueKind::OnlineLibrary => "online_library".to_string(),
                    CatalogueKind::Wise => "wise".to_string(),
                },
                online_library: config.catalogue.online_library.clone(),
                wise: config.catalogue.wise.as_ref().map(|w| SanitizedWiseConfig {
                    base_url: w.base_url.clone(),
                    branch_id: w.branch_id.clone(),
                    branch_name: w.branch_name.clone(),
                    result_count: w.result_count,
                    api_key_configured: !w.api_key.is_empty(),
                    session_configured: !w.session.is_empty(),
                    timeout_secs: w.timeout_secs,
                }),
            },
            output: config.output.clone(),
        }
    }
}
