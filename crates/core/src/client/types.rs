//! Types for tracker API responses.
//!
//! Three endpoints return overlapping views of the same (artist, group,
//! torrent) identity with different field names and nesting: keyword search
//! (`browse`), artist discography (`artist`) and the user's own history
//! (`user_torrents`). They are kept as separate types and reconciled later.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Response envelope
// ============================================================================

/// The JSON envelope every tracker response is wrapped in.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiEnvelope<T> {
    Success { response: T },
    Failure { error: String },
}

// ============================================================================
// Keyword search (action=browse)
// ============================================================================

/// Response of a keyword search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// Release groups in API result order.
    #[serde(default)]
    pub results: Vec<SearchGroup>,
}

/// A release group as returned by keyword search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchGroup {
    pub group_id: Option<u64>,
    pub group_name: Option<String>,
    /// Display artist for the whole group.
    pub artist: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub bookmarked: Option<bool>,
    pub vanity_house: Option<bool>,
    pub group_year: Option<i32>,
    pub release_type: Option<String>,
    pub group_time: Option<i64>,
    pub max_size: Option<u64>,
    pub total_snatched: Option<u64>,
    pub total_seeders: Option<u64>,
    pub total_leechers: Option<u64>,
    #[serde(default)]
    pub torrents: Vec<SearchTorrent>,
}

/// A torrent nested in a keyword search group.
///
/// Only used to pick an artist id; nothing from it is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchTorrent {
    pub torrent_id: u64,
    pub edition_id: Option<u64>,
    pub artists: Option<Vec<TorrentArtist>>,
    pub remastered: Option<bool>,
    pub remaster_year: Option<i32>,
    pub remaster_catalogue_number: Option<String>,
    pub remaster_title: Option<String>,
    pub media: Option<String>,
    pub encoding: Option<String>,
    pub format: Option<String>,
    pub has_log: Option<bool>,
    pub log_score: Option<i64>,
    pub has_cue: Option<bool>,
    pub scene: Option<bool>,
    pub vanity_house: Option<bool>,
    pub file_count: Option<u64>,
    pub time: Option<String>,
    pub size: Option<u64>,
    pub snatches: Option<u64>,
    pub seeders: Option<u64>,
    pub leechers: Option<u64>,
    pub is_freeleech: Option<bool>,
    pub is_neutral_leech: Option<bool>,
    pub is_freeload: Option<bool>,
    pub is_personal_freeleech: Option<bool>,
    pub trumpable: Option<bool>,
    pub can_use_token: Option<bool>,
}

impl SearchTorrent {
    /// The single credited artist id, if exactly one artist is embedded.
    ///
    /// Zero or several credited artists cannot identify one artist page.
    pub fn sole_artist_id(&self) -> Option<u64> {
        match self.artists.as_deref() {
            Some([artist]) => Some(artist.id),
            _ => None,
        }
    }
}

/// An artist credit embedded in a search torrent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TorrentArtist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub aliasid: Option<u64>,
}

// ============================================================================
// Artist discography (action=artist)
// ============================================================================

/// Full discography for one artist id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistResponse {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub has_bookmarked: Option<bool>,
    pub image: Option<String>,
    pub body: Option<String>,
    pub vanity_house: Option<bool>,
    #[serde(default)]
    pub tags: Vec<ArtistTag>,
    pub statistics: Option<ArtistStatistics>,
    /// Release groups in API result order.
    #[serde(default)]
    pub torrentgroup: Vec<ArtistGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistTag {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistStatistics {
    pub num_groups: u64,
    pub num_torrents: u64,
    pub num_seeders: u64,
    pub num_leechers: u64,
    pub num_snatches: u64,
}

/// A release group inside an artist discography.
///
/// The artist is implied by the enclosing response, and the torrent list is
/// named `torrent` (singular) on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistGroup {
    pub group_id: Option<u64>,
    pub group_name: Option<String>,
    pub group_year: Option<i32>,
    pub group_record_label: Option<String>,
    pub group_catalogue_number: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub release_type: Option<i64>,
    pub group_vanity_house: Option<bool>,
    pub has_bookmarked: Option<bool>,
    #[serde(default)]
    pub torrent: Vec<ArtistTorrent>,
}

/// A torrent inside a discography group. Uses `id`, not `torrentId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtistTorrent {
    pub id: Option<u64>,
    pub group_id: Option<u64>,
    /// e.g. "CD", "Vinyl", "WEB".
    pub media: Option<String>,
    /// e.g. "FLAC", "MP3".
    pub format: Option<String>,
    /// e.g. "Lossless", "24bit Lossless", "V0 (VBR)".
    pub encoding: Option<String>,
    /// 0 means no remaster.
    pub remaster_year: Option<i32>,
    pub remastered: Option<bool>,
    pub remaster_title: Option<String>,
    pub remaster_record_label: Option<String>,
    pub scene: Option<bool>,
    pub has_log: Option<bool>,
    pub has_cue: Option<bool>,
    pub log_score: Option<i64>,
    /// May include non-audio files.
    pub file_count: Option<u64>,
    pub free_torrent: Option<bool>,
    pub is_neutralleech: Option<bool>,
    pub is_freeload: Option<bool>,
    pub size: Option<u64>,
    pub leechers: Option<u64>,
    pub seeders: Option<u64>,
    pub snatched: Option<u64>,
    /// e.g. "2009-06-06 19:04:22".
    pub time: Option<String>,
    pub has_file: Option<i64>,
}

// ============================================================================
// User history (action=user_torrents)
// ============================================================================

/// The requesting user's own torrents, one list per relation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    #[serde(default)]
    pub seeding: Vec<UserTorrent>,
    #[serde(default)]
    pub leeching: Vec<UserTorrent>,
    #[serde(default)]
    pub uploaded: Vec<UserTorrent>,
    #[serde(default)]
    pub snatched: Vec<UserTorrent>,
}

impl UserResponse {
    /// All entries, seeding first, then leeching, uploaded and snatched.
    pub fn iter(&self) -> impl Iterator<Item = &UserTorrent> {
        self.seeding
            .iter()
            .chain(&self.leeching)
            .chain(&self.uploaded)
            .chain(&self.snatched)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A lightweight torrent reference from the user's history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserTorrent {
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub torrent_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub artist_id: Option<u64>,
    pub artist_name: Option<String>,
    /// Release (group) name.
    pub name: Option<String>,
}

/// Accept ids encoded either as JSON numbers or as numeric strings.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(n)) => Ok(Some(n)),
        Some(RawId::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {:?}", s))),
    }
}

/// Identity of the user owning the API key (action=index).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IndexResponse {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
}
