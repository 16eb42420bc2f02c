pub mod availability;
pub mod catalogue;
pub mod config;
pub mod matcher;
pub mod pipeline;
pub mod report;
pub mod testing;
pub mod wishlist;

pub use availability::{
    AvailabilityError, AvailabilityResolver, AvailabilitySummary, CopyRecord, StatusKind,
    TitleDetails,
};
pub use catalogue::{
    CatalogueError, HoldingsClient, MediaFilter, OnlineLibraryClient, RawResponse, SearchClient,
    SearchQuery, WiseClient,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogueKind, Config, ConfigError,
    SanitizedConfig,
};
pub use matcher::{CandidateMatch, EditionLanguage, Matcher, MediaType, ParseError};
pub use pipeline::{CataloguePipeline, EnrichedMatch, EntryFailure, FailureStage, RunOutcome};
pub use report::{format_report, write_table, ReportError, Reporter};
pub use wishlist::{load_wishlist, ShelfFilter, WishlistEntry, WishlistError};
