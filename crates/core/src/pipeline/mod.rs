//! Wishlist-to-report pipeline.

mod runner;
mod types;

pub use runner::CataloguePipeline;
pub use types::*;
