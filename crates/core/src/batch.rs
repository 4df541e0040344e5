//! Library-wide and single-album update runs.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::client::TrackerClient;
use crate::fields::{apply, FieldMappingError};
use crate::library::{Album, AlbumQuery, Library, LibraryError};
use crate::reconcile::Reconciler;

/// Field that marks an album as already matched.
const MATCHED_MARKER: &str = "red_groupid";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    FieldMapping(#[from] FieldMappingError),
}

/// Options for [`BatchRunner::run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Re-match albums that already carry tracker fields.
    pub force: bool,
    /// Reconcile but never write back.
    pub dry_run: bool,
}

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Albums actually reconciled.
    pub total: usize,
    /// Albums written back. Always zero for dry runs.
    pub modified: usize,
    /// Reconciled albums with no match, no field change, or a dry run.
    pub unmodified: usize,
    /// Albums left alone: already matched, or compilations.
    pub skipped: usize,
}

/// Result of updating one album.
#[derive(Debug, Clone, PartialEq)]
pub enum AlbumUpdate {
    /// Compilation, not reconciled.
    Skipped,
    NoMatch,
    /// Matched, and every field already had the matched value.
    Unchanged,
    /// Matched with at least one changed field. Holds the merged album.
    Updated(Album),
}

/// Runs reconciliation over albums from a [`Library`].
pub struct BatchRunner {
    reconciler: Reconciler,
    client: Arc<dyn TrackerClient>,
}

impl BatchRunner {
    pub fn new(reconciler: Reconciler, client: Arc<dyn TrackerClient>) -> Self {
        Self { reconciler, client }
    }

    /// Reconcile `album` and merge the result, without persisting.
    pub async fn update_album(&self, album: &Album) -> Result<AlbumUpdate, BatchError> {
        if album.is_compilation() {
            debug!(album_id = album.id, "Skipping compilation");
            return Ok(AlbumUpdate::Skipped);
        }

        let Some(fields) = self
            .reconciler
            .search_match(album, self.client.as_ref())
            .await
        else {
            return Ok(AlbumUpdate::NoMatch);
        };

        let (changed, merged) = apply(&album.fields, &fields)?;
        if !changed {
            return Ok(AlbumUpdate::Unchanged);
        }

        let mut updated = album.clone();
        updated.fields = merged;
        Ok(AlbumUpdate::Updated(updated))
    }

    /// Single-album form used on import: reconcile and persist on change.
    pub async fn process_album(
        &self,
        library: &dyn Library,
        album: &Album,
    ) -> Result<AlbumUpdate, BatchError> {
        let update = self.update_album(album).await?;
        if let AlbumUpdate::Updated(updated) = &update {
            library.store(updated)?;
            info!(album_id = album.id, "Updated tracker fields");
        }
        Ok(update)
    }

    /// Reconcile every album selected by `query`.
    pub async fn run(
        &self,
        library: &dyn Library,
        query: &AlbumQuery,
        options: BatchOptions,
    ) -> Result<BatchSummary, BatchError> {
        let albums = library.albums(query)?;
        let mut summary = BatchSummary::default();

        let (pending, already_matched): (Vec<Album>, Vec<Album>) = albums
            .into_iter()
            .partition(|album| options.force || !album.contains(MATCHED_MARKER));
        summary.skipped += already_matched.len();

        info!(
            selected = pending.len() + already_matched.len(),
            pending = pending.len(),
            force = options.force,
            dry_run = options.dry_run,
            "Starting batch"
        );

        let concurrency = self.reconciler.config().concurrency.max(1);
        let mut updates = stream::iter(pending.iter())
            .map(|album| async move { (album.id, self.update_album(album).await) })
            .buffer_unordered(concurrency);

        while let Some((album_id, update)) = updates.next().await {
            match update? {
                AlbumUpdate::Skipped => summary.skipped += 1,
                AlbumUpdate::NoMatch | AlbumUpdate::Unchanged => {
                    summary.total += 1;
                    summary.unmodified += 1;
                }
                AlbumUpdate::Updated(updated) => {
                    summary.total += 1;
                    if options.dry_run {
                        summary.unmodified += 1;
                        info!(album_id, "Would update tracker fields (dry run)");
                    } else {
                        library.store(&updated)?;
                        summary.modified += 1;
                        info!(album_id, "Updated tracker fields");
                    }
                }
            }
        }

        info!(
            total = summary.total,
            modified = summary.modified,
            unmodified = summary.unmodified,
            skipped = summary.skipped,
            "Batch complete"
        );
        Ok(summary)
    }
}
