//! Async fetch pipelines
//!
//! - `search`: query string -> movie summaries
//! - `detail`: selected id -> movie detail, rating session, display title
//! - `fetch`: the generation-tagged slot both pipelines are built on

pub mod detail;
pub mod fetch;
pub mod search;

pub use detail::{DetailPipeline, NEUTRAL_RATING};
pub use fetch::{Completion, FetchSlot};
pub use search::{SearchPipeline, MIN_QUERY_LEN};
