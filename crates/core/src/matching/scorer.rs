//! Weighted scoring of one `Matchable` against another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::matchable::Matchable;
use super::similarity::{string_similarity, year_similarity};

/// A scored field of a `Matchable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Artist,
    Title,
    Year,
    Media,
    Format,
}

/// Per-field weights. They need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_artist_weight")]
    pub artist: f64,
    #[serde(default = "default_title_weight")]
    pub title: f64,
    #[serde(default = "default_year_weight")]
    pub year: f64,
    #[serde(default)]
    pub media: f64,
    #[serde(default)]
    pub format: f64,
}

fn default_artist_weight() -> f64 {
    0.4
}

fn default_title_weight() -> f64 {
    0.4
}

fn default_year_weight() -> f64 {
    0.2
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            artist: default_artist_weight(),
            title: default_title_weight(),
            year: default_year_weight(),
            media: 0.0,
            format: 0.0,
        }
    }
}

impl ScoreWeights {
    fn entries(&self) -> [(MatchField, f64); 5] {
        [
            (MatchField::Artist, self.artist),
            (MatchField::Title, self.title),
            (MatchField::Year, self.year),
            (MatchField::Media, self.media),
            (MatchField::Format, self.format),
        ]
    }

    /// Whether at least one weight is positive.
    pub fn is_usable(&self) -> bool {
        self.entries().iter().any(|(_, w)| *w > 0.0)
    }
}

/// Result of comparing two `Matchable`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Weighted mean of `field_scores`, in `[0, 1]`.
    pub total_score: f64,
    /// Similarity of every field with a positive weight.
    pub field_scores: BTreeMap<MatchField, f64>,
}

impl MatchScore {
    pub fn is_match(&self, min_score: f64) -> bool {
        self.total_score >= min_score
    }
}

/// Optional text attributes are not penalized when either side is unknown.
fn optional_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => string_similarity(a, b),
        _ => 1.0,
    }
}

fn field_similarity(field: MatchField, a: &Matchable, b: &Matchable) -> f64 {
    match field {
        MatchField::Artist => string_similarity(&a.artist, &b.artist),
        MatchField::Title => string_similarity(&a.title, &b.title),
        MatchField::Year => year_similarity(a.year, b.year),
        MatchField::Media => optional_similarity(a.media.as_deref(), b.media.as_deref()),
        MatchField::Format => optional_similarity(a.format.as_deref(), b.format.as_deref()),
    }
}

/// Score `b` against `a`.
///
/// Fields with a weight of zero or less are skipped entirely. With no positive
/// weight at all the total is 0.0.
pub fn score(a: &Matchable, b: &Matchable, weights: &ScoreWeights) -> MatchScore {
    let mut field_scores = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (field, weight) in weights.entries() {
        if weight <= 0.0 {
            continue;
        }
        let similarity = field_similarity(field, a, b);
        field_scores.insert(field, similarity);
        weighted_sum += weight * similarity;
        weight_total += weight;
    }

    let total_score = if weight_total > 0.0 {
        (weighted_sum / weight_total).clamp(0.0, 1.0)
    } else {
        0.0
    };

    trace!(
        a_artist = %a.artist,
        a_title = %a.title,
        b_artist = %b.artist,
        b_title = %b.title,
        total_score,
        "Scored candidate"
    );

    MatchScore {
        total_score,
        field_scores,
    }
}
