use std::fmt;

use serde::{Deserialize, Deserializer};

/// Catalog identifier of a track.
///
/// The catalog emits ids as JSON numbers or strings; both normalize to the
/// same textual form used in `/api/track/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TrackId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            U64(u64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => TrackId::new(n.to_string()),
            RawId::U64(n) => TrackId::new(n.to_string()),
            RawId::Float(f) => TrackId::new(f.to_string()),
            RawId::Text(s) => TrackId::new(s),
        })
    }
}

/// A playable catalog item. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: TrackId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artist: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub cover: Option<String>,
}

impl Track {
    /// Cover reference, or `fallback` when the catalog provided none.
    pub fn cover_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.cover.as_deref().unwrap_or(fallback)
    }
}

/// Body of `GET /api/track/<id>`.
///
/// Only a non-empty string `url` counts as resolved; anything else
/// (absent, `null`, `""`, `false`, a number) is an unresolved track.
#[derive(Debug, Default, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    url: Option<serde_json::Value>,
}

impl Resolution {
    pub fn playable_url(&self) -> Option<&str> {
        match &self.url {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let v: Option<String> = Option::deserialize(deserializer)?;
    Ok(v.filter(|s| !s.trim().is_empty()))
}
