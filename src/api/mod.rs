//! API clients for external services
//!
//! - OMDb: movie search and detail lookup
//!
//! Pipelines talk to a [`MovieSource`] rather than a concrete client so the
//! catalog can be swapped out (and scripted in tests).

pub mod omdb;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{MovieDetail, MovieSummary};

pub use omdb::OmdbClient;

/// Message shown when the catalog has no match for a query or id
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

/// Message shown when the catalog answered with something we could not parse
pub const MALFORMED_MESSAGE: &str = "Something went wrong with fetching movies";

/// Catalog lookup error types
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Movie not found")]
    NotFound,

    #[error("Invalid or missing API key (401)")]
    Unauthorized,

    #[error("Rate limited (429)")]
    RateLimited,

    #[error("API error: {0}")]
    Api(String),

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Request timed out after {:.1}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("Request task stopped before answering: {0}")]
    TaskFailed(String),
}

/// Coarse class of a failed lookup, kept after the error is flattened
/// into a display message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The catalog has no such movie
    NotFound,
    /// Anything else: transport, upstream, timeout, malformed payload
    Unavailable,
}

impl LookupError {
    /// Text to present to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            LookupError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            LookupError::InvalidResponse(_) => MALFORMED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            LookupError::NotFound => FailureKind::NotFound,
            _ => FailureKind::Unavailable,
        }
    }

    /// Whether the upstream answered with an unparseable payload
    pub fn is_malformed(&self) -> bool {
        matches!(self, LookupError::InvalidResponse(_))
    }
}

/// A remote movie catalog
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Free-text search, first page only
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, LookupError>;

    /// Full record for one movie id
    async fn detail(&self, id: &str) -> Result<MovieDetail, LookupError>;
}
