//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`TrackerClient`](crate::client::TrackerClient),
//! an in-memory library and fixture builders for every remote record shape,
//! so reconciliation can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use redmatch_core::testing::{fixtures, MemoryLibrary, MockTrackerClient};
//!
//! let client = MockTrackerClient::new();
//! client
//!     .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
//!     .await;
//! client
//!     .set_artist(fixtures::TEST_ARTIST_ID, fixtures::artist_response(vec![fixtures::artist_group()]))
//!     .await;
//!
//! let library = MemoryLibrary::new(vec![fixtures::album()]);
//! ```

mod mock_tracker_client;

pub use crate::library::MemoryLibrary;
pub use mock_tracker_client::MockTrackerClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::client::{
        ArtistGroup, ArtistResponse, ArtistTorrent, SearchGroup, SearchTorrent, TorrentArtist,
        UserTorrent,
    };
    use crate::library::Album;

    pub const TEST_ARTIST_ID: u64 = 1;
    pub const TEST_GROUP_ID: u64 = 2;
    pub const TEST_TORRENT_ID: u64 = 3;
    pub const TEST_ALBUM_ID: i64 = 4;
    pub const TEST_ARTIST_NAME: &str = "Test Artist";
    pub const TEST_ALBUM_NAME: &str = "Test Album";
    pub const TEST_ALBUM_YEAR: i32 = 2020;

    /// The first query tried for [`album`].
    pub fn default_query() -> String {
        format!("{} {}", TEST_ARTIST_NAME, TEST_ALBUM_NAME)
    }

    /// A well-formed local album with alternate spellings.
    pub fn album() -> Album {
        Album::new(TEST_ALBUM_ID)
            .with("albumartist", TEST_ARTIST_NAME)
            .with("albumartist_sort", "Artist, Test")
            .with("album", TEST_ALBUM_NAME)
            .with("albumdisambig", "The Great Test Album")
            .with("year", TEST_ALBUM_YEAR)
            .with("media", "CD")
            .with("format", "FLAC")
    }

    /// A search torrent crediting exactly one artist.
    pub fn search_torrent(torrent_id: u64, artist_id: Option<u64>) -> SearchTorrent {
        SearchTorrent {
            torrent_id,
            edition_id: Some(1),
            artists: Some(
                artist_id
                    .map(|id| TorrentArtist {
                        id,
                        name: TEST_ARTIST_NAME.to_string(),
                        aliasid: Some(id + 500),
                    })
                    .into_iter()
                    .collect(),
            ),
            remastered: Some(false),
            remaster_year: Some(0),
            media: Some("CD".to_string()),
            encoding: Some("Lossless".to_string()),
            format: Some("FLAC".to_string()),
            has_log: Some(true),
            log_score: Some(100),
            has_cue: Some(true),
            scene: Some(false),
            file_count: Some(10),
            time: Some("2012-04-14 15:57:00".to_string()),
            size: Some(1_000_000),
            snatches: Some(100),
            seeders: Some(50),
            leechers: Some(10),
            ..Default::default()
        }
    }

    /// A search group named after the test album, with one torrent.
    pub fn search_group() -> SearchGroup {
        search_group_with(
            TEST_GROUP_ID,
            TEST_ARTIST_NAME,
            TEST_ALBUM_NAME,
            TEST_ALBUM_YEAR,
            search_torrent(TEST_TORRENT_ID, Some(TEST_ARTIST_ID)),
        )
    }

    pub fn search_group_with(
        group_id: u64,
        artist: &str,
        name: &str,
        year: i32,
        torrent: SearchTorrent,
    ) -> SearchGroup {
        SearchGroup {
            group_id: Some(group_id),
            group_name: Some(name.to_string()),
            artist: Some(artist.to_string()),
            tags: vec!["electronic".to_string()],
            group_year: Some(year),
            release_type: Some("Album".to_string()),
            torrents: vec![torrent],
            ..Default::default()
        }
    }

    /// A discography torrent in CD / FLAC.
    pub fn artist_torrent(group_id: u64, torrent_id: u64) -> ArtistTorrent {
        ArtistTorrent {
            id: Some(torrent_id),
            group_id: Some(group_id),
            media: Some("CD".to_string()),
            format: Some("FLAC".to_string()),
            encoding: Some("Lossless".to_string()),
            remaster_year: Some(TEST_ALBUM_YEAR),
            remastered: Some(false),
            remaster_title: Some(String::new()),
            remaster_record_label: Some(String::new()),
            scene: Some(false),
            has_log: Some(true),
            has_cue: Some(true),
            log_score: Some(100),
            file_count: Some(10),
            size: Some(1_000_000),
            seeders: Some(50),
            leechers: Some(10),
            snatched: Some(100),
            time: Some("2012-04-14 15:57:00".to_string()),
            ..Default::default()
        }
    }

    /// The test album's discography group.
    pub fn artist_group() -> ArtistGroup {
        artist_group_with(
            TEST_GROUP_ID,
            TEST_ALBUM_NAME,
            TEST_ALBUM_YEAR,
            vec![artist_torrent(TEST_GROUP_ID, TEST_TORRENT_ID)],
        )
    }

    pub fn artist_group_with(
        group_id: u64,
        name: &str,
        year: i32,
        torrents: Vec<ArtistTorrent>,
    ) -> ArtistGroup {
        ArtistGroup {
            group_id: Some(group_id),
            group_name: Some(name.to_string()),
            group_year: Some(year),
            group_record_label: Some("Test Label".to_string()),
            group_catalogue_number: Some("TEST-001".to_string()),
            tags: vec!["electronic".to_string(), "test".to_string()],
            release_type: Some(1),
            group_vanity_house: Some(false),
            has_bookmarked: Some(false),
            torrent: torrents,
        }
    }

    /// The test artist's discography.
    pub fn artist_response(groups: Vec<ArtistGroup>) -> ArtistResponse {
        ArtistResponse {
            id: Some(TEST_ARTIST_ID),
            name: Some(TEST_ARTIST_NAME.to_string()),
            notifications_enabled: Some(false),
            has_bookmarked: Some(false),
            image: Some("https://example.com/artist.jpg".to_string()),
            body: Some(String::new()),
            vanity_house: Some(false),
            torrentgroup: groups,
            ..Default::default()
        }
    }

    /// A history entry for the test album.
    pub fn user_torrent(group_id: u64, torrent_id: u64) -> UserTorrent {
        UserTorrent {
            group_id: Some(group_id),
            torrent_id: Some(torrent_id),
            artist_id: Some(TEST_ARTIST_ID),
            artist_name: Some(TEST_ARTIST_NAME.to_string()),
            name: Some(TEST_ALBUM_NAME.to_string()),
        }
    }
}
