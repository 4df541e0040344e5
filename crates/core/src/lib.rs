pub mod autotag;
pub mod batch;
pub mod client;
pub mod config;
pub mod fields;
pub mod library;
pub mod matching;
pub mod metrics;
pub mod reconcile;
pub mod testing;

pub use autotag::{candidates, AlbumCandidate};
pub use batch::{AlbumUpdate, BatchError, BatchOptions, BatchRunner, BatchSummary};
pub use client::{
    CacheError, ClientError, RedactedClient, RedactedClientConfig, ResponseCache,
    SqliteResponseCache, TrackerClient,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use fields::{apply, validate_red_fields, FieldMappingError, RedFields};
pub use library::{Album, AlbumQuery, FieldMap, FieldValue, JsonLibrary, Library, LibraryError};
pub use matching::{score, Matchable, MatchScore, ScoreWeights};
pub use reconcile::{MatchOutcome, Reconciler};
