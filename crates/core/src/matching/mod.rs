//! Similarity primitives, record extractors and the weighted scorer.

mod matchable;
mod scorer;
mod similarity;

pub use matchable::{
    album_matchable, artist_group_matchable, search_group_matchable, user_torrent_matchable,
    Matchable,
};
pub use scorer::{score, MatchField, MatchScore, ScoreWeights};
pub use similarity::{string_similarity, year_similarity};
