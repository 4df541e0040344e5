//! HTTP client for the tracker's JSON API.
//!
//! All calls go to a single endpoint, selected by an `action` parameter, with
//! the API key in the `Authorization` header.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, OnceCell};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::cache::{cache_key, ResponseCache};
use super::types::{
    ApiEnvelope, ArtistResponse, IndexResponse, SearchResponse, UserResponse, UserTorrent,
};
use super::{ClientError, TrackerClient};
use crate::metrics;

/// Page size for history listings.
const USER_TORRENTS_LIMIT: &str = "500";

/// History relations, in the order they are fetched.
const USER_TORRENT_KINDS: [&str; 4] = ["seeding", "leeching", "uploaded", "snatched"];

/// Actions never served from or written to the response cache.
const UNCACHED_ACTIONS: [&str; 1] = ["user_torrents"];

/// Client settings, usually taken from `[api]` in the config file.
#[derive(Debug, Clone)]
pub struct RedactedClientConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
    /// Minimum spacing between two network requests.
    pub min_request_interval: Duration,
}

/// Tracker API client.
pub struct RedactedClient {
    client: Client,
    config: RedactedClientConfig,
    last_request: Arc<Mutex<Option<Instant>>>,
    user_id: OnceCell<u64>,
    /// User history, fetched once per client.
    history: OnceCell<UserResponse>,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl RedactedClient {
    pub fn new(config: RedactedClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(format!("redmatch/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Arc::new(Mutex::new(None)),
            user_id: OnceCell::new(),
            history: OnceCell::new(),
            cache: None,
        })
    }

    /// Serve repeated requests from a response cache.
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Wait for rate limit if needed.
    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.config.min_request_interval {
                let wait_time = self.config.min_request_interval - elapsed;
                debug!("Tracker rate limit: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Perform one action and decode its envelope.
    async fn request<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let key = cache_key(action, params);
        let cache = self
            .cache
            .as_ref()
            .filter(|_| !UNCACHED_ACTIONS.contains(&action));

        if let Some(cache) = cache {
            match cache.get(&key) {
                Ok(Some(body)) => {
                    metrics::CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                    debug!(action, "Serving response from cache");
                    return parse_envelope(&body);
                }
                Ok(None) => metrics::CACHE_LOOKUPS.with_label_values(&["miss"]).inc(),
                Err(e) => warn!(action, error = %e, "Response cache lookup failed"),
            }
        }

        let body = self.fetch(action, params).await?;
        let parsed = parse_envelope(&body)?;

        if let Some(cache) = cache {
            if let Err(e) = cache.put(&key, &body) {
                warn!(action, error = %e, "Failed to store response in cache");
            }
        }

        Ok(parsed)
    }

    async fn fetch(&self, action: &str, params: &[(&str, String)]) -> Result<String, ClientError> {
        self.wait_for_rate_limit().await;

        let mut query: Vec<(&str, &str)> = vec![("action", action)];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        debug!(
            action,
            params = %describe_params(params),
            "Tracker request"
        );

        let response = self
            .client
            .get(&self.config.url)
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            warn!("Tracker rate limit exceeded");
            return Err(ClientError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(response.text().await?)
    }

    /// All four history relations for the current user.
    async fn fetch_history(&self) -> Result<UserResponse, ClientError> {
        let user_id = self.user_id().await?;
        let mut user = UserResponse::default();

        for kind in USER_TORRENT_KINDS {
            let result: Result<std::collections::HashMap<String, Vec<UserTorrent>>, _> = self
                .request(
                    "user_torrents",
                    &[
                        ("id", user_id.to_string()),
                        ("type", kind.to_string()),
                        ("limit", USER_TORRENTS_LIMIT.to_string()),
                    ],
                )
                .await;
            record_call("user_torrents", &result);

            let entries = result?.remove(kind).unwrap_or_default();
            match kind {
                "seeding" => user.seeding = entries,
                "leeching" => user.leeching = entries,
                "uploaded" => user.uploaded = entries,
                _ => user.snatched = entries,
            }
        }

        debug!(
            user_id,
            seeding = user.seeding.len(),
            leeching = user.leeching.len(),
            uploaded = user.uploaded.len(),
            snatched = user.snatched.len(),
            "Fetched user history"
        );
        Ok(user)
    }

    /// Id of the user owning the API key, looked up once.
    async fn user_id(&self) -> Result<u64, ClientError> {
        self.user_id
            .get_or_try_init(|| async {
                let index: IndexResponse = self.request("index", &[]).await?;
                debug!(user_id = index.id, "Resolved tracker user");
                Ok::<_, ClientError>(index.id)
            })
            .await
            .copied()
    }
}

/// Decode a `{"status": ...}` envelope into its payload.
pub(crate) fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

    match envelope {
        ApiEnvelope::Success { response } => Ok(response),
        ApiEnvelope::Failure { error } => Err(ClientError::Api(error)),
    }
}

/// Query string for logs, URL-encoded the same way it goes on the wire.
fn describe_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn record_call<T>(endpoint: &str, result: &Result<T, ClientError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(ClientError::RateLimited) => "rate_limited",
        Err(_) => "error",
    };
    metrics::REMOTE_CALLS
        .with_label_values(&[endpoint, outcome])
        .inc();
}

#[async_trait]
impl TrackerClient for RedactedClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, ClientError> {
        let result = self
            .request("browse", &[("searchstr", query.to_string())])
            .await;
        record_call("browse", &result);
        result
    }

    async fn get_artist(&self, artist_id: u64) -> Result<ArtistResponse, ClientError> {
        let result = self
            .request("artist", &[("id", artist_id.to_string())])
            .await;
        record_call("artist", &result);
        result
    }

    async fn get_user_torrents(&self) -> Result<UserResponse, ClientError> {
        self.history
            .get_or_try_init(|| self.fetch_history())
            .await
            .cloned()
    }
}
