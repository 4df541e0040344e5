//! Reconciliation scenario tests.
//!
//! These tests drive the full search -> history -> discography flow against
//! the mock tracker client:
//! - Candidate selection across search results and discography groups
//! - Artist id sourcing from history and embedded torrent artists
//! - Failure handling for each remote call
//! - Preferred-torrent hints from the user's history

use redmatch_core::{
    client::UserResponse,
    config::MatchingConfig,
    library::Album,
    testing::{
        fixtures::{self, TEST_ARTIST_ID, TEST_GROUP_ID, TEST_TORRENT_ID},
        MockTrackerClient,
    },
    MatchOutcome, Reconciler,
};

fn reconciler() -> Reconciler {
    Reconciler::new(MatchingConfig::default()).expect("field schema is valid")
}

/// Client with the test artist's discography configured.
async fn client_with_discography() -> MockTrackerClient {
    let client = MockTrackerClient::new();
    client
        .set_artist(
            TEST_ARTIST_ID,
            fixtures::artist_response(vec![fixtures::artist_group()]),
        )
        .await;
    client
}

#[tokio::test]
async fn test_search_with_artist_lookup() {
    let client = client_with_discography().await;
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;

    let fields = reconciler()
        .search_match(&fixtures::album(), &client)
        .await
        .expect("album should match");

    assert_eq!(fields.red_artistid, Some(TEST_ARTIST_ID));
    assert_eq!(fields.red_groupid, Some(TEST_GROUP_ID));
    assert_eq!(fields.red_torrentid, Some(TEST_TORRENT_ID));
    assert_eq!(fields.red_artist.as_deref(), Some("Test Artist"));
    assert_eq!(fields.red_groupname.as_deref(), Some("Test Album"));
    assert_eq!(fields.red_grouprecordlabel.as_deref(), Some("Test Label"));
    assert_eq!(fields.red_media.as_deref(), Some("CD"));
    assert_eq!(fields.red_format.as_deref(), Some("FLAC"));
    assert_eq!(fields.red_encoding.as_deref(), Some("Lossless"));
    assert_eq!(fields.red_mtime, None);

    assert_eq!(client.queries().await, vec![fixtures::default_query()]);
    assert_eq!(client.artist_queries().await, vec![TEST_ARTIST_ID]);
    assert_eq!(client.user_calls().await, 1);
}

#[tokio::test]
async fn test_exact_group_selected_from_search() {
    let client = client_with_discography().await;
    let irrelevant = fixtures::search_group_with(
        10,
        "Different Artist",
        "Different Album",
        2020,
        fixtures::search_torrent(100, Some(98)),
    );
    let close = fixtures::search_group_with(
        11,
        "Test Artist",
        "Test Album 2",
        2019,
        fixtures::search_torrent(110, Some(99)),
    );
    client
        .set_search_results(
            &fixtures::default_query(),
            vec![irrelevant, fixtures::search_group(), close],
        )
        .await;

    let fields = reconciler()
        .search_match(&fixtures::album(), &client)
        .await
        .expect("album should match");

    assert_eq!(fields.red_groupid, Some(TEST_GROUP_ID));
    // Only the exact group's embedded artist was looked up.
    assert_eq!(client.artist_queries().await, vec![TEST_ARTIST_ID]);
}

#[tokio::test]
async fn test_no_artist_id_in_torrent() {
    let client = client_with_discography().await;
    let group = fixtures::search_group_with(
        TEST_GROUP_ID,
        "Test Artist",
        "Test Album",
        2020,
        fixtures::search_torrent(TEST_TORRENT_ID, None),
    );
    client
        .set_search_results(&fixtures::default_query(), vec![group])
        .await;

    let outcome = reconciler().reconcile(&fixtures::album(), &client).await;

    assert_eq!(outcome, MatchOutcome::NoArtist);
    assert!(client.queries().await.contains(&fixtures::default_query()));
    assert!(client.artist_queries().await.is_empty());
}

#[tokio::test]
async fn test_multiple_embedded_artists_give_no_artist_id() {
    let client = client_with_discography().await;
    let mut torrent = fixtures::search_torrent(TEST_TORRENT_ID, Some(TEST_ARTIST_ID));
    if let Some(artists) = torrent.artists.as_mut() {
        let mut second = artists[0].clone();
        second.id = 42;
        artists.push(second);
    }
    let group = fixtures::search_group_with(TEST_GROUP_ID, "Test Artist", "Test Album", 2020, torrent);
    client
        .set_search_results(&fixtures::default_query(), vec![group])
        .await;

    let outcome = reconciler().reconcile(&fixtures::album(), &client).await;

    assert_eq!(outcome, MatchOutcome::NoArtist);
    assert!(client.artist_queries().await.is_empty());
}

#[tokio::test]
async fn test_discography_failure_is_no_match() {
    let client = client_with_discography().await;
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;
    client.fail_artist(TEST_ARTIST_ID).await;

    let outcome = reconciler().reconcile(&fixtures::album(), &client).await;

    assert_eq!(outcome, MatchOutcome::DiscographyFailed);
    assert_eq!(client.artist_queries().await, vec![TEST_ARTIST_ID]);
}

#[tokio::test]
async fn test_snatched_hint_selects_torrent() {
    let client = MockTrackerClient::new();
    let group = fixtures::artist_group_with(
        TEST_GROUP_ID,
        "Test Album",
        2020,
        vec![
            fixtures::artist_torrent(TEST_GROUP_ID, TEST_TORRENT_ID),
            fixtures::artist_torrent(TEST_GROUP_ID, 17),
        ],
    );
    client
        .set_artist(TEST_ARTIST_ID, fixtures::artist_response(vec![group]))
        .await;
    client
        .set_user_torrents(UserResponse {
            snatched: vec![fixtures::user_torrent(TEST_GROUP_ID, 17)],
            ..Default::default()
        })
        .await;

    let fields = reconciler()
        .search_match(&fixtures::album(), &client)
        .await
        .expect("album should match");

    assert_eq!(fields.red_groupid, Some(TEST_GROUP_ID));
    assert_eq!(fields.red_torrentid, Some(17));
    // Every variant was tried and none returned results.
    assert_eq!(client.queries().await.len(), 4);
}

#[tokio::test]
async fn test_history_artist_preferred_over_search() {
    let client = client_with_discography().await;
    let group = fixtures::search_group_with(
        TEST_GROUP_ID,
        "Test Artist",
        "Test Album",
        2020,
        fixtures::search_torrent(TEST_TORRENT_ID, Some(99)),
    );
    client
        .set_search_results(&fixtures::default_query(), vec![group])
        .await;
    client
        .set_user_torrents(UserResponse {
            seeding: vec![fixtures::user_torrent(TEST_GROUP_ID, TEST_TORRENT_ID)],
            ..Default::default()
        })
        .await;

    let fields = reconciler()
        .search_match(&fixtures::album(), &client)
        .await
        .expect("album should match");

    assert_eq!(fields.red_artistid, Some(TEST_ARTIST_ID));
    assert_eq!(client.artist_queries().await, vec![TEST_ARTIST_ID]);
}

#[tokio::test]
async fn test_history_failure_is_not_fatal() {
    let client = client_with_discography().await;
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;
    client.fail_user_torrents().await;

    let fields = reconciler().search_match(&fixtures::album(), &client).await;

    assert_eq!(fields.and_then(|f| f.red_groupid), Some(TEST_GROUP_ID));
}

#[tokio::test]
async fn test_failed_variant_moves_to_next() {
    let client = client_with_discography().await;
    client.fail_query(&fixtures::default_query()).await;
    client
        .set_search_results(
            "Test Artist The Great Test Album",
            vec![fixtures::search_group()],
        )
        .await;

    let fields = reconciler().search_match(&fixtures::album(), &client).await;

    assert!(fields.is_some());
    assert_eq!(
        client.queries().await,
        vec![
            fixtures::default_query(),
            "Test Artist The Great Test Album".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_search_error_without_other_signal() {
    let client = client_with_discography().await;
    client.fail_query(&fixtures::default_query()).await;

    let outcome = reconciler().reconcile(&fixtures::album(), &client).await;

    assert_eq!(outcome, MatchOutcome::NoArtist);
}

#[tokio::test]
async fn test_variants_from_alternate_spellings() {
    let client = client_with_discography().await;
    let album = Album::new(fixtures::TEST_ALBUM_ID)
        .with("albumartist", "Artist, Test")
        .with("albumartist_sort", "Test Artist")
        .with("album", "Test Album")
        .with("albumdisambig", "Album, Test (2020)")
        .with("year", 2020);
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;

    let fields = reconciler().search_match(&album, &client).await;

    assert_eq!(
        client.queries().await,
        vec![
            "Artist, Test Test Album".to_string(),
            "Artist, Test Album, Test".to_string(),
            fixtures::default_query(),
        ]
    );
    assert_eq!(fields.and_then(|f| f.red_groupid), Some(TEST_GROUP_ID));
    assert_eq!(client.artist_queries().await, vec![TEST_ARTIST_ID]);
}

#[tokio::test]
async fn test_discography_finds_better_group() {
    let client = MockTrackerClient::new();
    let deluxe = fixtures::search_group_with(
        3,
        "Test Artist",
        "Test Album (Deluxe)",
        2020,
        fixtures::search_torrent(30, Some(TEST_ARTIST_ID)),
    );
    client
        .set_search_results(&fixtures::default_query(), vec![deluxe])
        .await;
    client
        .set_artist(
            TEST_ARTIST_ID,
            fixtures::artist_response(vec![
                fixtures::artist_group(),
                fixtures::artist_group_with(
                    3,
                    "Test Album (Deluxe)",
                    2020,
                    vec![fixtures::artist_torrent(3, 30)],
                ),
            ]),
        )
        .await;

    let fields = reconciler()
        .search_match(&fixtures::album(), &client)
        .await
        .expect("album should match");

    assert_eq!(fields.red_groupid, Some(TEST_GROUP_ID));
    assert_eq!(fields.red_torrentid, Some(TEST_TORRENT_ID));
}

#[tokio::test]
async fn test_no_discography_group_above_threshold() {
    let client = MockTrackerClient::new();
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;
    client
        .set_artist(
            TEST_ARTIST_ID,
            fixtures::artist_response(vec![fixtures::artist_group_with(
                TEST_GROUP_ID,
                "Completely Different Album",
                2020,
                vec![fixtures::artist_torrent(TEST_GROUP_ID, TEST_TORRENT_ID)],
            )]),
        )
        .await;

    let outcome = reconciler().reconcile(&fixtures::album(), &client).await;

    assert_eq!(outcome, MatchOutcome::NoMatch);
}

#[tokio::test]
async fn test_group_without_torrents_is_incomplete() {
    let client = MockTrackerClient::new();
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;
    client
        .set_artist(
            TEST_ARTIST_ID,
            fixtures::artist_response(vec![fixtures::artist_group_with(
                TEST_GROUP_ID,
                "Test Album",
                2020,
                Vec::new(),
            )]),
        )
        .await;

    let outcome = reconciler().reconcile(&fixtures::album(), &client).await;

    assert_eq!(outcome, MatchOutcome::IncompleteIdentity);
}

#[tokio::test]
async fn test_missing_artist_id_on_discography_is_incomplete() {
    let client = MockTrackerClient::new();
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;
    let mut artist = fixtures::artist_response(vec![fixtures::artist_group()]);
    artist.id = None;
    client.set_artist(TEST_ARTIST_ID, artist).await;

    let outcome = reconciler().reconcile(&fixtures::album(), &client).await;

    assert_eq!(outcome, MatchOutcome::IncompleteIdentity);
}

#[tokio::test]
async fn test_torrent_matching_album_media_preferred() {
    let client = MockTrackerClient::new();
    client
        .set_search_results(&fixtures::default_query(), vec![fixtures::search_group()])
        .await;
    let mut web = fixtures::artist_torrent(TEST_GROUP_ID, 30);
    web.media = Some("WEB".to_string());
    web.format = Some("MP3".to_string());
    let cd = fixtures::artist_torrent(TEST_GROUP_ID, 31);
    client
        .set_artist(
            TEST_ARTIST_ID,
            fixtures::artist_response(vec![fixtures::artist_group_with(
                TEST_GROUP_ID,
                "Test Album",
                2020,
                vec![web, cd],
            )]),
        )
        .await;

    let fields = reconciler()
        .search_match(&fixtures::album(), &client)
        .await
        .expect("album should match");

    assert_eq!(fields.red_torrentid, Some(31));
}

#[tokio::test]
async fn test_group_named_none_is_matchable() {
    let client = MockTrackerClient::new();
    let album = Album::new(9)
        .with("albumartist", "Test Artist")
        .with("album", "None");
    client
        .set_search_results(
            "Test Artist None",
            vec![fixtures::search_group_with(
                8,
                "Test Artist",
                "None",
                2020,
                fixtures::search_torrent(80, Some(TEST_ARTIST_ID)),
            )],
        )
        .await;
    client
        .set_artist(
            TEST_ARTIST_ID,
            fixtures::artist_response(vec![fixtures::artist_group_with(
                8,
                "None",
                2020,
                vec![fixtures::artist_torrent(8, 80)],
            )]),
        )
        .await;

    let fields = reconciler().search_match(&album, &client).await;

    assert_eq!(fields.and_then(|f| f.red_groupname), Some("None".to_string()));
}
