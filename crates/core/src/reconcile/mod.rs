//! Album reconciliation against the tracker.
//!
//! One reconciliation runs keyword search and the user's history side by
//! side, derives an artist id from them, and then trusts only that artist's
//! discography to pick the final group and torrent. Remote failures along the
//! way degrade to "no signal" or "no match" and are never returned.

mod query;
mod select;

pub use query::{normalize_query_part, query_variants};

use tracing::{debug, info, info_span, warn, Instrument};

use crate::client::{SearchResponse, SearchTorrent, TrackerClient, UserResponse};
use crate::config::MatchingConfig;
use crate::fields::{build_red_fields, validate_red_fields, FieldMappingError, RedFields};
use crate::library::Album;
use crate::matching::album_matchable;
use crate::metrics;

use select::{
    best_artist_group, best_history_entry, best_search_candidate, choose_artist_torrent,
};

/// How one reconciliation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(RedFields),
    /// Neither search nor history yielded an artist id.
    NoArtist,
    /// The discography for the artist id could not be fetched.
    DiscographyFailed,
    /// No discography group cleared the threshold.
    NoMatch,
    /// The winning triple lacked an artist, group or torrent id.
    IncompleteIdentity,
}

impl MatchOutcome {
    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched(_) => "matched",
            Self::NoArtist => "no_artist",
            Self::DiscographyFailed => "discography_failed",
            Self::NoMatch => "no_match",
            Self::IncompleteIdentity => "incomplete_identity",
        }
    }

    pub fn into_fields(self) -> Option<RedFields> {
        match self {
            Self::Matched(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Matches local albums against the tracker.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: MatchingConfig,
}

impl Reconciler {
    /// Create a reconciler. Fails if the output field schema is misconfigured.
    pub fn new(config: MatchingConfig) -> Result<Self, FieldMappingError> {
        validate_red_fields()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Output fields for `album`, or `None` when no confident match exists.
    pub async fn search_match(
        &self,
        album: &Album,
        client: &dyn TrackerClient,
    ) -> Option<RedFields> {
        self.reconcile(album, client).await.into_fields()
    }

    /// Run one reconciliation and report how it ended.
    pub async fn reconcile(&self, album: &Album, client: &dyn TrackerClient) -> MatchOutcome {
        let span = info_span!("reconcile", album_id = album.id);
        let outcome = self.run(album, client).instrument(span).await;
        metrics::RECONCILE_OUTCOMES
            .with_label_values(&[outcome.label()])
            .inc();
        outcome
    }

    async fn run(&self, album: &Album, client: &dyn TrackerClient) -> MatchOutcome {
        let weights = &self.config.weights;
        let min_score = self.config.min_score;
        let target = album_matchable(album);
        let variants = query_variants(album);

        debug!(
            artist = %target.artist,
            title = %target.title,
            year = ?target.year,
            variants = variants.len(),
            "Reconciling album"
        );

        let (search, history) = tokio::join!(
            search_variants(&variants, client),
            fetch_history(client)
        );

        let search_candidate = search
            .as_ref()
            .and_then(|response| best_search_candidate(&target, response, weights, min_score));
        if let Some(candidate) = &search_candidate {
            metrics::MATCH_SCORE
                .with_label_values(&["search"])
                .observe(candidate.score);
            debug!(
                group_id = ?candidate.group.group_id,
                score = candidate.score,
                "Search candidate"
            );
        }

        let hint = history
            .as_ref()
            .and_then(|history| best_history_entry(&target, history, weights, min_score));
        if let Some(hint) = &hint {
            metrics::MATCH_SCORE
                .with_label_values(&["history"])
                .observe(hint.score);
            debug!(
                group_id = ?hint.group_id,
                torrent_id = ?hint.torrent_id,
                score = hint.score,
                "History match"
            );
        }

        let artist_id = hint.and_then(|h| h.artist_id).or_else(|| {
            search_candidate
                .and_then(|c| c.torrent)
                .and_then(SearchTorrent::sole_artist_id)
        });
        let Some(artist_id) = artist_id else {
            info!("No artist id from search or history");
            return MatchOutcome::NoArtist;
        };

        let artist = match client.get_artist(artist_id).await {
            Ok(artist) => artist,
            Err(e) => {
                warn!(artist_id, error = %e, "Failed to fetch discography");
                return MatchOutcome::DiscographyFailed;
            }
        };

        let Some((group, group_score)) = best_artist_group(&target, &artist, weights, min_score)
        else {
            info!(
                artist_id,
                groups = artist.torrentgroup.len(),
                "No discography group above threshold"
            );
            return MatchOutcome::NoMatch;
        };
        metrics::MATCH_SCORE
            .with_label_values(&["discography"])
            .observe(group_score);

        let Some(torrent) =
            choose_artist_torrent(group, hint.as_ref(), album.media(), album.format())
        else {
            warn!(group_id = ?group.group_id, "Matched group has no torrents");
            return MatchOutcome::IncompleteIdentity;
        };

        match build_red_fields(&artist, group, &torrent) {
            Ok(fields) => {
                info!(
                    artist_id = ?fields.red_artistid,
                    group_id = ?fields.red_groupid,
                    torrent_id = ?fields.red_torrentid,
                    score = group_score,
                    "Matched album"
                );
                MatchOutcome::Matched(fields)
            }
            Err(e) => {
                warn!(error = %e, "Incomplete identity on matched triple");
                MatchOutcome::IncompleteIdentity
            }
        }
    }
}

/// Try each query until one returns results. Failures move on to the next.
async fn search_variants(variants: &[String], client: &dyn TrackerClient) -> Option<SearchResponse> {
    for query in variants {
        match client.search(query).await {
            Ok(response) if !response.results.is_empty() => {
                debug!(query = %query, results = response.results.len(), "Search returned results");
                return Some(response);
            }
            Ok(_) => debug!(query = %query, "No search results"),
            Err(e) => warn!(query = %query, error = %e, "Search failed"),
        }
    }
    None
}

async fn fetch_history(client: &dyn TrackerClient) -> Option<UserResponse> {
    match client.get_user_torrents().await {
        Ok(history) => Some(history),
        Err(e) => {
            warn!(error = %e, "Failed to fetch user history");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        let labels: Vec<&str> = [
            MatchOutcome::Matched(RedFields::default()),
            MatchOutcome::NoArtist,
            MatchOutcome::DiscographyFailed,
            MatchOutcome::NoMatch,
            MatchOutcome::IncompleteIdentity,
        ]
        .iter()
        .map(MatchOutcome::label)
        .collect();

        assert_eq!(
            labels,
            vec![
                "matched",
                "no_artist",
                "discography_failed",
                "no_match",
                "incomplete_identity"
            ]
        );
    }

    #[test]
    fn test_only_matched_yields_fields() {
        assert!(MatchOutcome::Matched(RedFields::default())
            .into_fields()
            .is_some());
        assert!(MatchOutcome::NoMatch.into_fields().is_none());
    }
}
