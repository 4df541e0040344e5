//! Mock tracker client for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::{
    ArtistResponse, ClientError, SearchGroup, SearchResponse, TrackerClient, UserResponse,
};

/// Mock implementation of the TrackerClient trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search, discography and history responses
/// - Track queries for assertions
/// - Simulate failures per query or artist id
///
/// Queries without a configured response return no results. Artist ids
/// without a configured response fail like the real API does.
///
/// # Example
///
/// ```rust,ignore
/// use redmatch_core::testing::{MockTrackerClient, fixtures};
///
/// let client = MockTrackerClient::new();
/// client
///     .set_search_results("Test Artist Test Album", vec![fixtures::search_group()])
///     .await;
///
/// let response = client.search("Test Artist Test Album").await?;
/// assert_eq!(response.results.len(), 1);
/// assert_eq!(client.queries().await, vec!["Test Artist Test Album"]);
/// ```
#[derive(Debug, Default)]
pub struct MockTrackerClient {
    /// Search responses by exact query string.
    search_responses: Arc<RwLock<HashMap<String, SearchResponse>>>,
    /// Discographies by artist id.
    artist_responses: Arc<RwLock<HashMap<u64, ArtistResponse>>>,
    /// The user's history.
    user_response: Arc<RwLock<UserResponse>>,
    /// Queries that fail.
    error_queries: Arc<RwLock<HashSet<String>>>,
    /// Artist ids whose lookup fails.
    error_artists: Arc<RwLock<HashSet<u64>>>,
    /// Whether the history lookup fails.
    user_error: Arc<RwLock<bool>>,
    /// Recorded search queries.
    queries: Arc<RwLock<Vec<String>>>,
    /// Recorded artist lookups.
    artist_queries: Arc<RwLock<Vec<u64>>>,
    /// Number of history lookups.
    user_calls: Arc<RwLock<usize>>,
}

impl MockTrackerClient {
    /// Create a new mock with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the groups returned for an exact query.
    pub async fn set_search_results(&self, query: &str, results: Vec<SearchGroup>) {
        self.search_responses
            .write()
            .await
            .insert(query.to_string(), SearchResponse { results });
    }

    /// Set the discography returned for `artist_id`.
    pub async fn set_artist(&self, artist_id: u64, response: ArtistResponse) {
        self.artist_responses
            .write()
            .await
            .insert(artist_id, response);
    }

    /// Set the user's history.
    pub async fn set_user_torrents(&self, response: UserResponse) {
        *self.user_response.write().await = response;
    }

    /// Make a search query fail.
    pub async fn fail_query(&self, query: &str) {
        self.error_queries.write().await.insert(query.to_string());
    }

    /// Make an artist lookup fail.
    pub async fn fail_artist(&self, artist_id: u64) {
        self.error_artists.write().await.insert(artist_id);
    }

    /// Make the history lookup fail.
    pub async fn fail_user_torrents(&self) {
        *self.user_error.write().await = true;
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// Search queries in the order they were issued.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Artist ids looked up, in order.
    pub async fn artist_queries(&self) -> Vec<u64> {
        self.artist_queries.read().await.clone()
    }

    /// Number of history lookups.
    pub async fn user_calls(&self) -> usize {
        *self.user_calls.read().await
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
        self.artist_queries.write().await.clear();
        *self.user_calls.write().await = 0;
    }
}

#[async_trait]
impl TrackerClient for MockTrackerClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, ClientError> {
        self.queries.write().await.push(query.to_string());

        if self.error_queries.read().await.contains(query) {
            return Err(ClientError::Api(format!("Mock search failure for '{}'", query)));
        }

        Ok(self
            .search_responses
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_artist(&self, artist_id: u64) -> Result<ArtistResponse, ClientError> {
        self.artist_queries.write().await.push(artist_id);

        if self.error_artists.read().await.contains(&artist_id) {
            return Err(ClientError::RateLimited);
        }

        self.artist_responses
            .read()
            .await
            .get(&artist_id)
            .cloned()
            .ok_or_else(|| ClientError::Api("no such artist".to_string()))
    }

    async fn get_user_torrents(&self) -> Result<UserResponse, ClientError> {
        *self.user_calls.write().await += 1;

        if *self.user_error.read().await {
            return Err(ClientError::Status {
                status: 500,
                message: "Mock history failure".to_string(),
            });
        }

        Ok(self.user_response.read().await.clone())
    }
}
