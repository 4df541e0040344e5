use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::sources::{attributes, declared_fields, SourceEntity, FIELD_SOURCES};
use super::{FieldMappingError, RedFields};
use crate::client::{ArtistGroup, ArtistResponse, ArtistTorrent};
use crate::library::{FieldMap, FieldValue};

/// Name of the modification timestamp field.
pub const MTIME_FIELD: &str = "red_mtime";

/// Assemble output fields from a winning (artist, group, torrent) triple.
///
/// Values whose JSON type disagrees with the source table are skipped with a
/// warning. A missing required value is an error.
pub fn build_red_fields(
    artist: &ArtistResponse,
    group: &ArtistGroup,
    torrent: &ArtistTorrent,
) -> Result<RedFields, FieldMappingError> {
    let artist = attributes(artist)?;
    let group = attributes(group)?;
    let torrent = attributes(torrent)?;

    let mut fields = Map::new();
    for row in FIELD_SOURCES {
        let entity = match row.entity {
            SourceEntity::Artist => &artist,
            SourceEntity::Group => &group,
            SourceEntity::Torrent => &torrent,
        };

        let value = entity.get(row.attribute).cloned().unwrap_or(Value::Null);
        if value.is_null() {
            if row.required {
                return Err(FieldMappingError::MissingRequired(row.field.to_string()));
            }
            continue;
        }
        if !row.kind.accepts(&value) {
            warn!(
                field = row.field,
                attribute = row.attribute,
                value = %value,
                "Source value has unexpected type, skipping"
            );
            continue;
        }

        fields.insert(row.field.to_string(), value);
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| FieldMappingError::Serialization(e.to_string()))
}

/// Merge `new` into an album's existing fields.
///
/// Returns `(changed, merged)`. When every declared field already matches,
/// `existing` comes back untouched and `red_mtime` keeps its old value.
/// Otherwise declared fields take the new values, absent ones are removed,
/// and `red_mtime` is set to now.
pub fn apply(
    existing: &FieldMap,
    new: &RedFields,
) -> Result<(bool, FieldMap), FieldMappingError> {
    let new_values = attributes(new)?;
    let declared = declared_fields()?;

    let updates: Vec<(String, Option<FieldValue>)> = declared
        .into_iter()
        .map(|field| {
            let value = new_values.get(&field).and_then(FieldValue::from_json);
            (field, value)
        })
        .collect();

    let changed: Vec<&str> = updates
        .iter()
        .filter(|(field, value)| existing.get(field) != value.as_ref())
        .map(|(field, _)| field.as_str())
        .collect();

    if changed.is_empty() {
        return Ok((false, existing.clone()));
    }
    debug!(fields = ?changed, "Output fields changed");

    let mut merged = existing.clone();
    for (field, value) in updates {
        match value {
            Some(value) => {
                merged.insert(field, value);
            }
            None => {
                merged.remove(&field);
            }
        }
    }
    merged.insert(MTIME_FIELD.to_string(), FieldValue::Float(now_seconds()));

    Ok((true, merged))
}

fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple() -> (ArtistResponse, ArtistGroup, ArtistTorrent) {
        let artist = ArtistResponse {
            id: Some(1),
            name: Some("Test Artist".to_string()),
            ..Default::default()
        };
        let group = ArtistGroup {
            group_id: Some(2),
            group_name: Some("Test Album".to_string()),
            group_year: Some(2020),
            release_type: Some(1),
            ..Default::default()
        };
        let torrent = ArtistTorrent {
            id: Some(3),
            media: Some("CD".to_string()),
            format: Some("FLAC".to_string()),
            encoding: Some("Lossless".to_string()),
            has_log: Some(true),
            log_score: Some(100),
            ..Default::default()
        };
        (artist, group, torrent)
    }

    #[test]
    fn test_build_red_fields() {
        let (artist, group, torrent) = triple();
        let fields = build_red_fields(&artist, &group, &torrent).unwrap();

        assert_eq!(fields.red_artistid, Some(1));
        assert_eq!(fields.red_groupid, Some(2));
        assert_eq!(fields.red_torrentid, Some(3));
        assert_eq!(fields.red_artist.as_deref(), Some("Test Artist"));
        assert_eq!(fields.red_groupyear, Some(2020));
        assert_eq!(fields.red_groupreleasetype, Some(1));
        assert_eq!(fields.red_media.as_deref(), Some("CD"));
        assert_eq!(fields.red_haslog, Some(true));
        assert_eq!(fields.red_image, None);
        assert_eq!(fields.red_mtime, None);
    }

    #[test]
    fn test_build_red_fields_requires_identity() {
        let (artist, group, mut torrent) = triple();
        torrent.id = None;
        assert_eq!(
            build_red_fields(&artist, &group, &torrent),
            Err(FieldMappingError::MissingRequired("red_torrentid".to_string()))
        );
    }

    #[test]
    fn test_apply_sets_fields_and_mtime() {
        let (artist, group, torrent) = triple();
        let new = build_red_fields(&artist, &group, &torrent).unwrap();

        let mut existing = FieldMap::new();
        existing.insert("album".to_string(), "Test Album".into());
        existing.insert("red_image".to_string(), "stale.jpg".into());

        let (changed, merged) = apply(&existing, &new).unwrap();
        assert!(changed);
        assert_eq!(merged.get("album"), Some(&FieldValue::from("Test Album")));
        assert_eq!(merged.get("red_groupid"), Some(&FieldValue::Int(2)));
        assert_eq!(merged.get("red_haslog"), Some(&FieldValue::Bool(true)));
        assert!(!merged.contains_key("red_image"));
        assert!(matches!(merged.get(MTIME_FIELD), Some(FieldValue::Float(t)) if *t > 0.0));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (artist, group, torrent) = triple();
        let new = build_red_fields(&artist, &group, &torrent).unwrap();

        let (_, merged) = apply(&FieldMap::new(), &new).unwrap();
        let (changed, again) = apply(&merged, &new).unwrap();

        assert!(!changed);
        assert_eq!(again, merged);
        assert_eq!(again.get(MTIME_FIELD), merged.get(MTIME_FIELD));
    }

    #[test]
    fn test_apply_ignores_mtime_difference() {
        let (artist, group, torrent) = triple();
        let mut new = build_red_fields(&artist, &group, &torrent).unwrap();

        let (_, merged) = apply(&FieldMap::new(), &new).unwrap();
        new.red_mtime = Some(1.0);
        let (changed, _) = apply(&merged, &new).unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_apply_detects_single_change() {
        let (artist, group, mut torrent) = triple();
        let first = build_red_fields(&artist, &group, &torrent).unwrap();
        let (_, merged) = apply(&FieldMap::new(), &first).unwrap();

        torrent.seeders = Some(12);
        let second = build_red_fields(&artist, &group, &torrent).unwrap();
        let (changed, merged) = apply(&merged, &second).unwrap();

        assert!(changed);
        assert_eq!(merged.get("red_seeders"), Some(&FieldValue::Int(12)));
    }
}
