use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::{FieldMappingError, RedFields};
use crate::client::{ArtistGroup, ArtistResponse, ArtistTorrent};

/// Which part of the winning triple a field comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEntity {
    /// The discography response itself.
    Artist,
    /// The winning group inside the discography.
    Group,
    /// The chosen torrent inside that group.
    Torrent,
}

impl fmt::Display for SourceEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artist => write!(f, "artist"),
            Self::Group => write!(f, "group"),
            Self::Torrent => write!(f, "torrent"),
        }
    }
}

/// JSON value type a source attribute is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Str,
    Bool,
}

impl ValueKind {
    /// Whether a non-null JSON value has this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Str => value.is_string(),
            Self::Bool => value.is_boolean(),
        }
    }

    fn sample(&self) -> Value {
        match self {
            Self::Int => json!(1),
            Self::Str => json!("x"),
            Self::Bool => json!(true),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "integer"),
            Self::Str => write!(f, "string"),
            Self::Bool => write!(f, "boolean"),
        }
    }
}

/// One row of the output field source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSource {
    /// Output field name on the album.
    pub field: &'static str,
    pub entity: SourceEntity,
    /// Attribute name as it appears on the wire.
    pub attribute: &'static str,
    pub kind: ValueKind,
    /// A match without this value is not persisted.
    pub required: bool,
}

const fn source(
    field: &'static str,
    entity: SourceEntity,
    attribute: &'static str,
    kind: ValueKind,
) -> FieldSource {
    FieldSource {
        field,
        entity,
        attribute,
        kind,
        required: false,
    }
}

const fn required(
    field: &'static str,
    entity: SourceEntity,
    attribute: &'static str,
) -> FieldSource {
    FieldSource {
        field,
        entity,
        attribute,
        kind: ValueKind::Int,
        required: true,
    }
}

use SourceEntity::{Artist, Group, Torrent};
use ValueKind::{Bool, Int, Str};

/// Where each output field is read from.
pub static FIELD_SOURCES: &[FieldSource] = &[
    required("red_artistid", Artist, "id"),
    required("red_groupid", Group, "groupId"),
    required("red_torrentid", Torrent, "id"),
    source("red_artist", Artist, "name", Str),
    source("red_image", Artist, "image", Str),
    source("red_groupname", Group, "groupName", Str),
    source("red_groupyear", Group, "groupYear", Int),
    source("red_grouprecordlabel", Group, "groupRecordLabel", Str),
    source("red_groupcataloguenumber", Group, "groupCatalogueNumber", Str),
    source("red_groupreleasetype", Group, "releaseType", Int),
    source("red_media", Torrent, "media", Str),
    source("red_format", Torrent, "format", Str),
    source("red_encoding", Torrent, "encoding", Str),
    source("red_remastered", Torrent, "remastered", Bool),
    source("red_remasteryear", Torrent, "remasterYear", Int),
    source("red_remastertitle", Torrent, "remasterTitle", Str),
    source("red_remasterrecordlabel", Torrent, "remasterRecordLabel", Str),
    source("red_scene", Torrent, "scene", Bool),
    source("red_haslog", Torrent, "hasLog", Bool),
    source("red_logscore", Torrent, "logScore", Int),
    source("red_hascue", Torrent, "hasCue", Bool),
    source("red_filecount", Torrent, "fileCount", Int),
    source("red_freetorrent", Torrent, "freeTorrent", Bool),
    source("red_isneutralleech", Torrent, "isNeutralleech", Bool),
    source("red_isfreeload", Torrent, "isFreeload", Bool),
    source("red_size", Torrent, "size", Int),
    source("red_leechers", Torrent, "leechers", Int),
    source("red_seeders", Torrent, "seeders", Int),
    source("red_snatched", Torrent, "snatched", Int),
    source("red_time", Torrent, "time", Str),
    source("red_hasfile", Torrent, "hasFile", Int),
];

/// Serialize `value` and return its top-level attributes.
pub(super) fn attributes<T: Serialize>(value: &T) -> Result<Map<String, Value>, FieldMappingError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(FieldMappingError::Serialization(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(FieldMappingError::Serialization(e.to_string())),
    }
}

/// Output fields declared on [`RedFields`], excluding the timestamp.
pub fn declared_fields() -> Result<Vec<String>, FieldMappingError> {
    Ok(attributes(&RedFields::default())?
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| name != super::MTIME_FIELD)
        .collect())
}

fn known_attributes(entity: SourceEntity) -> Result<Map<String, Value>, FieldMappingError> {
    match entity {
        SourceEntity::Artist => attributes(&ArtistResponse::default()),
        SourceEntity::Group => attributes(&ArtistGroup::default()),
        SourceEntity::Torrent => attributes(&ArtistTorrent::default()),
    }
}

/// Whether `T` accepts a lone `key` set to a sample of `kind`.
fn holds<T: DeserializeOwned>(key: &str, kind: ValueKind) -> bool {
    let mut object = Map::new();
    object.insert(key.to_string(), kind.sample());
    serde_json::from_value::<T>(Value::Object(object)).is_ok()
}

fn entity_holds(entity: SourceEntity, attribute: &str, kind: ValueKind) -> bool {
    match entity {
        SourceEntity::Artist => holds::<ArtistResponse>(attribute, kind),
        SourceEntity::Group => holds::<ArtistGroup>(attribute, kind),
        SourceEntity::Torrent => holds::<ArtistTorrent>(attribute, kind),
    }
}

/// Check a source table against the declared output fields.
///
/// Every declared field needs exactly one row, every row must name a declared
/// field and an attribute that exists on its entity, and both ends must be
/// able to hold the row's value kind.
pub fn validate_field_sources(sources: &[FieldSource]) -> Result<(), FieldMappingError> {
    let declared = declared_fields()?;
    let declared_set: HashSet<&str> = declared.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    for row in sources {
        if !seen.insert(row.field) {
            return Err(FieldMappingError::DuplicateSource(row.field.to_string()));
        }
        if !declared_set.contains(row.field) {
            return Err(FieldMappingError::UndeclaredField(row.field.to_string()));
        }
        if !known_attributes(row.entity)?.contains_key(row.attribute) {
            return Err(FieldMappingError::UnknownAttribute {
                field: row.field.to_string(),
                entity: row.entity,
                attribute: row.attribute.to_string(),
            });
        }
        if !holds::<RedFields>(row.field, row.kind)
            || !entity_holds(row.entity, row.attribute, row.kind)
        {
            return Err(FieldMappingError::TypeMismatch {
                field: row.field.to_string(),
                kind: row.kind,
            });
        }
    }

    for field in &declared {
        if !seen.contains(field.as_str()) {
            return Err(FieldMappingError::MissingSource(field.clone()));
        }
    }

    Ok(())
}

/// Validate the built-in [`FIELD_SOURCES`] table.
pub fn validate_red_fields() -> Result<(), FieldMappingError> {
    validate_field_sources(FIELD_SOURCES)
}

#[cfg(test)]
mod tests {
    use super::SourceEntity::{Group, Torrent};
    use super::ValueKind::Str;
    use super::*;

    #[test]
    fn test_builtin_table_is_valid() {
        validate_red_fields().unwrap();
    }

    #[test]
    fn test_declared_fields_exclude_mtime() {
        let fields = declared_fields().unwrap();
        assert_eq!(fields.len(), FIELD_SOURCES.len());
        assert!(!fields.iter().any(|f| f == "red_mtime"));
        assert!(fields.iter().any(|f| f == "red_artistid"));
    }

    #[test]
    fn test_missing_source_detected() {
        let table: Vec<FieldSource> = FIELD_SOURCES
            .iter()
            .filter(|s| s.field != "red_encoding")
            .copied()
            .collect();
        assert_eq!(
            validate_field_sources(&table),
            Err(FieldMappingError::MissingSource("red_encoding".to_string()))
        );
    }

    #[test]
    fn test_duplicate_source_detected() {
        let mut table = FIELD_SOURCES.to_vec();
        table.push(source("red_media", Torrent, "format", Str));
        assert_eq!(
            validate_field_sources(&table),
            Err(FieldMappingError::DuplicateSource("red_media".to_string()))
        );
    }

    #[test]
    fn test_undeclared_field_detected() {
        let mut table = FIELD_SOURCES.to_vec();
        table.push(source("red_bitrate", Torrent, "encoding", Str));
        assert_eq!(
            validate_field_sources(&table),
            Err(FieldMappingError::UndeclaredField("red_bitrate".to_string()))
        );
    }

    #[test]
    fn test_unknown_attribute_detected() {
        let table: Vec<FieldSource> = FIELD_SOURCES
            .iter()
            .map(|s| {
                if s.field == "red_media" {
                    source("red_media", Group, "media", Str)
                } else {
                    *s
                }
            })
            .collect();
        let err = validate_field_sources(&table).unwrap_err();
        assert!(matches!(
            err,
            FieldMappingError::UnknownAttribute { ref field, entity: SourceEntity::Group, .. }
                if field == "red_media"
        ));
    }

    #[test]
    fn test_type_mismatch_detected() {
        let table: Vec<FieldSource> = FIELD_SOURCES
            .iter()
            .map(|s| {
                if s.field == "red_scene" {
                    source("red_scene", Torrent, "scene", Str)
                } else {
                    *s
                }
            })
            .collect();
        assert_eq!(
            validate_field_sources(&table),
            Err(FieldMappingError::TypeMismatch {
                field: "red_scene".to_string(),
                kind: ValueKind::Str,
            })
        );
    }

    #[test]
    fn test_value_kind_accepts() {
        assert!(ValueKind::Int.accepts(&json!(3)));
        assert!(!ValueKind::Int.accepts(&json!("3")));
        assert!(ValueKind::Bool.accepts(&json!(false)));
        assert!(ValueKind::Str.accepts(&json!("None")));
    }
}
