//! Album records as key/value bags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single stored value on an album record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FieldValue {
    /// Convert a JSON scalar. Arrays, objects and null have no field form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// Flat field map of one album.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A local album record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl Album {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: FieldMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(FieldValue::as_i64)
    }

    pub fn albumartist(&self) -> &str {
        self.get_str("albumartist").unwrap_or_default()
    }

    pub fn albumartist_sort(&self) -> Option<&str> {
        self.get_str("albumartist_sort")
    }

    pub fn album(&self) -> &str {
        self.get_str("album").unwrap_or_default()
    }

    pub fn albumdisambig(&self) -> Option<&str> {
        self.get_str("albumdisambig")
    }

    /// Release year. Zero is the "unknown" marker in most libraries.
    pub fn year(&self) -> Option<i32> {
        self.get_i64("year")
            .filter(|y| *y > 0)
            .and_then(|y| i32::try_from(y).ok())
    }

    pub fn media(&self) -> Option<&str> {
        self.get_str("media")
    }

    pub fn format(&self) -> Option<&str> {
        self.get_str("format")
    }

    /// Whether this looks like a compilation / various-artists release.
    pub fn is_compilation(&self) -> bool {
        self.get("comp").and_then(FieldValue::as_bool).unwrap_or(false)
            || self.albumartist().eq_ignore_ascii_case("various artists")
    }
}
