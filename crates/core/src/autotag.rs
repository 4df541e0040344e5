//! Candidate releases for an autotagger.

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::TrackerClient;
use crate::reconcile::normalize_query_part;

/// A release suggested by keyword search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumCandidate {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub group_id: Option<u64>,
}

/// Search results for `"<artist> <album>"`, in API order.
///
/// Likely various-artists releases, empty queries and failed searches all give
/// an empty list.
pub async fn candidates(
    client: &dyn TrackerClient,
    artist: &str,
    album: &str,
    va_likely: bool,
) -> Vec<AlbumCandidate> {
    if va_likely {
        return Vec::new();
    }

    let query = normalize_query_part(&format!("{} {}", artist, album));
    if query.is_empty() {
        return Vec::new();
    }

    match client.search(&query).await {
        Ok(response) => {
            debug!(query = %query, results = response.results.len(), "Autotag candidates");
            response
                .results
                .into_iter()
                .map(|group| AlbumCandidate {
                    artist: group.artist,
                    album: group.group_name,
                    year: group.group_year,
                    group_id: group.group_id,
                })
                .collect()
        }
        Err(e) => {
            warn!(query = %query, error = %e, "Autotag search failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::*;
    use crate::testing::MockTrackerClient;

    #[tokio::test]
    async fn test_candidates_in_api_order() {
        let client = MockTrackerClient::new();
        client
            .set_search_results(
                &default_query(),
                vec![
                    search_group(),
                    search_group_with(9, "Other", "Test Album Live", 2021, search_torrent(10, None)),
                ],
            )
            .await;

        let found = candidates(&client, TEST_ARTIST_NAME, TEST_ALBUM_NAME, false).await;

        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0],
            AlbumCandidate {
                artist: Some(TEST_ARTIST_NAME.to_string()),
                album: Some(TEST_ALBUM_NAME.to_string()),
                year: Some(TEST_ALBUM_YEAR),
                group_id: Some(TEST_GROUP_ID),
            }
        );
        assert_eq!(found[1].group_id, Some(9));
    }

    #[tokio::test]
    async fn test_bracketed_text_dropped_from_query() {
        let client = MockTrackerClient::new();
        candidates(&client, TEST_ARTIST_NAME, "Test Album (Deluxe) [2CD]", false).await;
        assert_eq!(client.queries().await, vec![default_query()]);
    }

    #[tokio::test]
    async fn test_various_artists_not_searched() {
        let client = MockTrackerClient::new();
        let found = candidates(&client, "Various Artists", TEST_ALBUM_NAME, true).await;
        assert!(found.is_empty());
        assert!(client.queries().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_not_searched() {
        let client = MockTrackerClient::new();
        let found = candidates(&client, "", "(Bonus)", false).await;
        assert!(found.is_empty());
        assert!(client.queries().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_gives_no_candidates() {
        let client = MockTrackerClient::new();
        client.fail_query(&default_query()).await;
        let found = candidates(&client, TEST_ARTIST_NAME, TEST_ALBUM_NAME, false).await;
        assert!(found.is_empty());
    }
}
