//! Tracker API access.
//!
//! The matching engine only sees the [`TrackerClient`] trait. `RedactedClient`
//! is the HTTP implementation, optionally backed by a [`ResponseCache`].

mod cache;
mod http;
mod types;

pub use cache::{CacheError, ResponseCache, SqliteResponseCache};
pub use http::{RedactedClient, RedactedClientConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the tracker.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimited,

    /// Unexpected HTTP status.
    #[error("HTTP error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The API answered with a failure envelope.
    #[error("API error: {0}")]
    Api(String),

    /// Body was not a valid envelope or had the wrong shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Response cache failure.
    #[error("Cache error: {0}")]
    Cache(String),
}

/// The three read-only tracker operations the matcher consumes.
#[async_trait]
pub trait TrackerClient: Send + Sync {
    /// Keyword search over release groups.
    async fn search(&self, query: &str) -> Result<SearchResponse, ClientError>;

    /// Full discography of one artist.
    async fn get_artist(&self, artist_id: u64) -> Result<ArtistResponse, ClientError>;

    /// The requesting user's seeding, leeching, uploaded and snatched torrents.
    async fn get_user_torrents(&self) -> Result<UserResponse, ClientError>;
}
