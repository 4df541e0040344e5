//! Output field schema written back onto matched albums.
//!
//! Every field of [`RedFields`] except `red_mtime` is derived from exactly one
//! attribute of the winning artist, group or torrent. The derivation lives in
//! the [`FIELD_SOURCES`] table and is checked by [`validate_field_sources`]
//! before any matching runs.

mod apply;
mod sources;

pub use apply::{apply, build_red_fields, MTIME_FIELD};
pub use sources::{
    declared_fields, validate_field_sources, validate_red_fields, FieldSource, SourceEntity,
    ValueKind, FIELD_SOURCES,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in the output field schema or its source table.
#[derive(Debug, Error, PartialEq)]
pub enum FieldMappingError {
    #[error("Output field '{0}' has no source mapping")]
    MissingSource(String),

    #[error("Output field '{field}' maps to unknown {entity} attribute '{attribute}'")]
    UnknownAttribute {
        field: String,
        entity: SourceEntity,
        attribute: String,
    },

    #[error("Output field '{0}' is mapped more than once")]
    DuplicateSource(String),

    #[error("Source mapping names undeclared output field '{0}'")]
    UndeclaredField(String),

    #[error("Output field '{field}' cannot hold a {kind} value")]
    TypeMismatch { field: String, kind: ValueKind },

    #[error("Required output field '{0}' has no value")]
    MissingRequired(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Tracker fields stored on a local album.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RedFields {
    /// Last time any other field changed, in seconds since the epoch.
    pub red_mtime: Option<f64>,

    // Identity
    pub red_artistid: Option<u64>,
    pub red_groupid: Option<u64>,
    pub red_torrentid: Option<u64>,

    // Artist
    pub red_artist: Option<String>,
    pub red_image: Option<String>,

    // Group
    pub red_groupname: Option<String>,
    pub red_groupyear: Option<i32>,
    pub red_grouprecordlabel: Option<String>,
    pub red_groupcataloguenumber: Option<String>,
    pub red_groupreleasetype: Option<i64>,

    // Torrent
    pub red_media: Option<String>,
    pub red_format: Option<String>,
    pub red_encoding: Option<String>,
    pub red_remastered: Option<bool>,
    pub red_remasteryear: Option<i32>,
    pub red_remastertitle: Option<String>,
    pub red_remasterrecordlabel: Option<String>,
    pub red_scene: Option<bool>,
    pub red_haslog: Option<bool>,
    pub red_logscore: Option<i64>,
    pub red_hascue: Option<bool>,
    pub red_filecount: Option<u64>,
    pub red_freetorrent: Option<bool>,
    pub red_isneutralleech: Option<bool>,
    pub red_isfreeload: Option<bool>,
    pub red_size: Option<u64>,
    pub red_leechers: Option<u64>,
    pub red_seeders: Option<u64>,
    pub red_snatched: Option<u64>,
    pub red_time: Option<String>,
    pub red_hasfile: Option<i64>,
}
