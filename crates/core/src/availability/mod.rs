//! Per-copy availability at a target branch.

mod resolver;
mod types;

pub use resolver::{parse_copies, parse_details, parse_return_date, AvailabilityResolver};
pub use types::*;

use thiserror::Error;

use crate::catalogue::CatalogueError;
use crate::matcher::ParseError;

/// Errors raised while resolving availability for one title.
#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error(transparent)]
    Network(#[from] CatalogueError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
