//! Album selection queries.

use super::{Album, FieldValue};

/// A conjunction of album filter terms.
///
/// `field:value` terms match a case-insensitive substring of that field.
/// Bare terms match the album artist or the album title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumQuery {
    terms: Vec<QueryTerm>,
}

#[derive(Debug, Clone, PartialEq)]
enum QueryTerm {
    Field { field: String, needle: String },
    Any(String),
}

impl AlbumQuery {
    /// Matches every album.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse whitespace-separated terms.
    pub fn parse<S: AsRef<str>>(parts: &[S]) -> Self {
        let terms = parts
            .iter()
            .flat_map(|p| p.as_ref().split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .map(|term| match term.split_once(':') {
                Some((field, needle)) if !field.is_empty() => QueryTerm::Field {
                    field: field.to_string(),
                    needle: needle.to_lowercase(),
                },
                _ => QueryTerm::Any(term.to_lowercase()),
            })
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, album: &Album) -> bool {
        self.terms.iter().all(|term| match term {
            QueryTerm::Field { field, needle } => {
                let value = if field == "id" {
                    Some(album.id.to_string())
                } else {
                    album.get(field).map(FieldValue::to_string)
                };
                value.is_some_and(|v| v.to_lowercase().contains(needle.as_str()))
            }
            QueryTerm::Any(needle) => [album.albumartist(), album.album()]
                .iter()
                .any(|v| v.to_lowercase().contains(needle.as_str())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album() -> Album {
        Album::new(7)
            .with("albumartist", "Test Artist")
            .with("album", "Test Album")
            .with("year", 2020)
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(AlbumQuery::all().matches(&album()));
        assert!(AlbumQuery::parse::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_field_terms() {
        assert!(AlbumQuery::parse(&["albumartist:test"]).matches(&album()));
        assert!(AlbumQuery::parse(&["year:2020"]).matches(&album()));
        assert!(AlbumQuery::parse(&["id:7"]).matches(&album()));
        assert!(!AlbumQuery::parse(&["year:2019"]).matches(&album()));
        assert!(!AlbumQuery::parse(&["media:cd"]).matches(&album()));
    }

    #[test]
    fn test_bare_terms_are_anded() {
        assert!(AlbumQuery::parse(&["artist album"]).matches(&album()));
        assert!(!AlbumQuery::parse(&["artist", "missing"]).matches(&album()));
    }
}
