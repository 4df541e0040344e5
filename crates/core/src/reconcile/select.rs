//! Candidate selection over each response shape.
//!
//! Every selector keeps the first of equally scored candidates: a later
//! candidate replaces the current best only with a strictly higher score.

use crate::client::{
    ArtistGroup, ArtistResponse, ArtistTorrent, SearchGroup, SearchResponse, SearchTorrent,
    UserResponse,
};
use crate::matching::{
    artist_group_matchable, score, search_group_matchable, user_torrent_matchable, Matchable,
    ScoreWeights,
};

/// Torrent-level attributes used to pick one edition of a group.
pub(crate) trait Edition {
    fn media(&self) -> Option<&str>;
    fn format(&self) -> Option<&str>;
}

impl Edition for SearchTorrent {
    fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

impl Edition for ArtistTorrent {
    fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

fn same(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.eq_ignore_ascii_case(b))
}

/// Torrent matching the album's media and format, then format alone, then
/// media alone, then the first listed.
pub(crate) fn preferred_torrent<'a, T: Edition>(
    torrents: &'a [T],
    media: Option<&str>,
    format: Option<&str>,
) -> Option<&'a T> {
    torrents
        .iter()
        .find(|t| same(t.media(), media) && same(t.format(), format))
        .or_else(|| torrents.iter().find(|t| same(t.format(), format)))
        .or_else(|| torrents.iter().find(|t| same(t.media(), media)))
        .or_else(|| torrents.first())
}

fn with_edition<T: Edition>(mut candidate: Matchable, torrent: Option<&T>) -> Matchable {
    if let Some(torrent) = torrent {
        candidate.media = torrent.media().map(str::to_string);
        candidate.format = torrent.format().map(str::to_string);
    }
    candidate
}

/// Best keyword-search group and its representative torrent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchCandidate<'a> {
    pub group: &'a SearchGroup,
    pub torrent: Option<&'a SearchTorrent>,
    pub score: f64,
}

pub(crate) fn best_search_candidate<'a>(
    target: &Matchable,
    response: &'a SearchResponse,
    weights: &ScoreWeights,
    min_score: f64,
) -> Option<SearchCandidate<'a>> {
    let mut best: Option<SearchCandidate<'a>> = None;

    for group in &response.results {
        let Some(candidate) = search_group_matchable(group) else {
            continue;
        };
        let torrent = preferred_torrent(
            &group.torrents,
            target.media.as_deref(),
            target.format.as_deref(),
        );
        let result = score(target, &with_edition(candidate, torrent), weights);

        if result.is_match(min_score) && best.map_or(true, |b| result.total_score > b.score) {
            best = Some(SearchCandidate {
                group,
                torrent,
                score: result.total_score,
            });
        }
    }

    best
}

/// A matching entry from the user's own history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HistoryHint {
    pub artist_id: Option<u64>,
    pub group_id: Option<u64>,
    pub torrent_id: Option<u64>,
    pub score: f64,
}

pub(crate) fn best_history_entry(
    target: &Matchable,
    history: &UserResponse,
    weights: &ScoreWeights,
    min_score: f64,
) -> Option<HistoryHint> {
    let mut best: Option<HistoryHint> = None;

    for entry in history.iter() {
        let Some(candidate) = user_torrent_matchable(entry) else {
            continue;
        };
        let result = score(target, &candidate, weights);

        if result.is_match(min_score) && best.map_or(true, |b| result.total_score > b.score) {
            best = Some(HistoryHint {
                artist_id: entry.artist_id,
                group_id: entry.group_id,
                torrent_id: entry.torrent_id,
                score: result.total_score,
            });
        }
    }

    best
}

/// Best discography group, scored with the response's artist name.
pub(crate) fn best_artist_group<'a>(
    target: &Matchable,
    artist: &'a ArtistResponse,
    weights: &ScoreWeights,
    min_score: f64,
) -> Option<(&'a ArtistGroup, f64)> {
    let artist_name = artist.name.as_deref()?;
    let mut best: Option<(&'a ArtistGroup, f64)> = None;

    for group in &artist.torrentgroup {
        let Some(candidate) = artist_group_matchable(group, artist_name) else {
            continue;
        };
        let torrent = preferred_torrent(
            &group.torrent,
            target.media.as_deref(),
            target.format.as_deref(),
        );
        let result = score(target, &with_edition(candidate, torrent), weights);

        if result.is_match(min_score) && best.map_or(true, |(_, s)| result.total_score > s) {
            best = Some((group, result.total_score));
        }
    }

    best
}

/// Torrent to report for the winning discography group.
///
/// A history hint naming this group wins over the album's media and format.
/// If the hinted torrent is not listed in the group it is still used, with
/// only its ids known.
pub(crate) fn choose_artist_torrent(
    group: &ArtistGroup,
    hint: Option<&HistoryHint>,
    media: Option<&str>,
    format: Option<&str>,
) -> Option<ArtistTorrent> {
    if let Some(hint) = hint {
        if let (Some(hint_group), Some(torrent_id)) = (hint.group_id, hint.torrent_id) {
            if group.group_id == Some(hint_group) {
                let listed = group.torrent.iter().find(|t| t.id == Some(torrent_id));
                return Some(listed.cloned().unwrap_or_else(|| ArtistTorrent {
                    id: Some(torrent_id),
                    group_id: group.group_id,
                    ..Default::default()
                }));
            }
        }
    }

    preferred_torrent(&group.torrent, media, format).cloned()
}
