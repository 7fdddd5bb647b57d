//! OMDb (Open Movie Database) API client
//!
//! Provides search and detail lookup for movies.
//! API docs: https://www.omdbapi.com/

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{LookupError, MovieSource};
use crate::models::{parse_leading_number, MovieDetail, MovieSummary};

/// Public OMDb endpoint
pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// Default bound on a single request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// OMDb API client
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OmdbClient {
    /// Create a new OMDb client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OMDB_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_http_client(DEFAULT_TIMEOUT),
        }
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    /// Make an authenticated GET request and decode an OMDb envelope
    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, LookupError> {
        let mut url = format!(
            "{}/?apikey={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        debug!(?params, "omdb request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                decode_envelope(&body)
            }
            StatusCode::UNAUTHORIZED => Err(LookupError::Unauthorized),
            StatusCode::NOT_FOUND => Err(LookupError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(LookupError::RateLimited),
            status => Err(LookupError::ServerError(status.as_u16())),
        }
    }

    /// Search movies by title, first page only
    pub async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, LookupError> {
        let response: SearchResponse = self.get(&[("s", query), ("page", "1")]).await?;
        Ok(response.into_summaries())
    }

    /// Get movie details by IMDb id
    pub async fn movie_detail(&self, id: &str) -> Result<MovieDetail, LookupError> {
        let response: DetailResponse = self.get(&[("i", id)]).await?;
        Ok(response.into_detail(id))
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, LookupError> {
        OmdbClient::search(self, query).await
    }

    async fn detail(&self, id: &str) -> Result<MovieDetail, LookupError> {
        self.movie_detail(id).await
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// OMDb answers 200 for misses too; `Response: "False"` carries the reason
fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, LookupError> {
    let status: ResponseStatus = serde_json::from_str(body).map_err(|e| malformed(&e))?;

    if status.response.eq_ignore_ascii_case("false") {
        let message = status.error.unwrap_or_else(|| "Unknown error".to_string());
        return Err(if is_not_found(&message) {
            LookupError::NotFound
        } else {
            LookupError::Api(message)
        });
    }

    serde_json::from_str(body).map_err(|e| malformed(&e))
}

fn malformed(err: &serde_json::Error) -> LookupError {
    LookupError::InvalidResponse(format!("JSON parse error: {}", err))
}

fn is_not_found(message: &str) -> bool {
    let normalized = message
        .trim()
        .trim_end_matches(|c| c == '!' || c == '.')
        .to_ascii_lowercase();
    normalized == "movie not found" || normalized == "incorrect imdb id"
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<SearchItemRaw>,
}

impl SearchResponse {
    fn into_summaries(self) -> Vec<MovieSummary> {
        self.search.into_iter().map(SearchItemRaw::into_summary).collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchItemRaw {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

impl SearchItemRaw {
    fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: poster_url(self.poster),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
}

impl DetailResponse {
    fn into_detail(self, requested_id: &str) -> MovieDetail {
        let runtime_minutes = self
            .runtime
            .as_deref()
            .and_then(parse_leading_number)
            .map(|n| n as u32)
            .unwrap_or(0);
        let imdb_rating = self
            .imdb_rating
            .as_deref()
            .and_then(parse_leading_number)
            .unwrap_or(0.0);

        MovieDetail {
            id: self.imdb_id.unwrap_or_else(|| requested_id.to_string()),
            title: self.title,
            year: self.year.unwrap_or_default(),
            poster_url: poster_url(self.poster),
            runtime_minutes,
            imdb_rating,
            plot: self.plot.unwrap_or_default(),
            released: self.released.unwrap_or_default(),
            actors: self.actors.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
        }
    }
}

/// OMDb uses "N/A" for missing posters
fn poster_url(raw: Option<String>) -> String {
    raw.filter(|p| p != "N/A").unwrap_or_default()
}
