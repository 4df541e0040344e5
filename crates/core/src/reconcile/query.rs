//! Search query variants for one album.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::library::Album;

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").unwrap());

/// Strip bracketed and parenthesised segments and collapse whitespace.
///
/// `"Album, Test (2020)"` becomes `"Album, Test"`.
pub fn normalize_query_part(text: &str) -> String {
    BRACKETED
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn spellings<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.into_iter().flatten() {
        let normalized = normalize_query_part(value);
        if !normalized.is_empty() && !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

/// Keyword queries to try, best guess first.
///
/// Every artist spelling (album artist, then sort name) is paired with every
/// title spelling (album, then disambiguation). Duplicates are dropped.
pub fn query_variants(album: &Album) -> Vec<String> {
    let artists = spellings([Some(album.albumartist()), album.albumartist_sort()]);
    let titles = spellings([Some(album.album()), album.albumdisambig()]);

    let mut queries: Vec<String> = Vec::new();
    for artist in &artists {
        for title in &titles {
            let query = format!("{} {}", artist, title);
            if !queries.contains(&query) {
                queries.push(query);
            }
        }
    }
    queries
}
