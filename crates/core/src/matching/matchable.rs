//! Projection of local and remote records into one comparable shape.

use serde::{Deserialize, Serialize};

use crate::client::{ArtistGroup, SearchGroup, UserTorrent};
use crate::library::Album;

/// Normalized comparison record.
///
/// `artist` and `title` are non-empty for every value produced from a remote
/// record; extractors return `None` instead of an empty-valued `Matchable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matchable {
    pub artist: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Matchable {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Local album. Local records are assumed well-formed, so this never fails.
pub fn album_matchable(album: &Album) -> Matchable {
    Matchable {
        artist: album.albumartist().to_string(),
        title: album.album().to_string(),
        year: album.year(),
        media: album.media().map(str::to_string),
        format: album.format().map(str::to_string),
    }
}

/// Keyword-search group. Needs both a display artist and a group name.
pub fn search_group_matchable(group: &SearchGroup) -> Option<Matchable> {
    let artist = non_empty(group.artist.as_deref())?;
    let title = non_empty(group.group_name.as_deref())?;

    Some(Matchable::new(artist, title).with_year(group.group_year.filter(|y| *y > 0)))
}

/// Discography group, with the artist name taken from the enclosing response.
///
/// The literal name "None" is an ordinary name here, not an absence marker.
pub fn artist_group_matchable(group: &ArtistGroup, artist_name: &str) -> Option<Matchable> {
    let title = non_empty(group.group_name.as_deref())?;
    if artist_name.is_empty() {
        return None;
    }

    Some(Matchable::new(artist_name, title).with_year(group.group_year.filter(|y| *y > 0)))
}

/// User history entry. History carries no year.
pub fn user_torrent_matchable(entry: &UserTorrent) -> Option<Matchable> {
    let artist = non_empty(entry.artist_name.as_deref())?;
    let title = non_empty(entry.name.as_deref())?;

    Some(Matchable::new(artist, title))
}
