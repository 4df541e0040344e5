//! Pure similarity primitives for strings and release years.

/// Case-insensitive normalized edit similarity in `[0, 1]`.
///
/// Identical strings (ignoring case) score 1.0. An empty input on either side
/// scores 0.0, including two empty strings.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    strsim::normalized_levenshtein(&a, &b).clamp(0.0, 1.0)
}

/// Similarity between two optional release years.
///
/// An unknown year is never penalized. Years one apart score 0.5, anything
/// further apart scores 0.0.
pub fn year_similarity(a: Option<i32>, b: Option<i32>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => match a.abs_diff(b) {
            0 => 1.0,
            1 => 0.5,
            _ => 0.0,
        },
        _ => 1.0,
    }
}
