//! Stored link records and their localized preview metadata.
//!
//! A [`LinkRecord`] is read-only from the server's point of view. Records are
//! written by an external admin surface; this crate only models and inspects
//! them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored mapping from a short path to redirect behaviour and preview metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Exact request path this record answers (e.g. `/welcome`).
    pub path: String,

    /// Send the visitor to the platform app store instead of `redirect_url`.
    #[serde(default)]
    pub redirect_to_store: bool,

    /// Destination when `redirect_to_store` is false.
    #[serde(default)]
    pub redirect_url: String,

    /// After this instant the record renders nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    /// Open Graph preview fields, localized per language code.
    #[serde(default)]
    pub og: OgMetadata,
}

impl LinkRecord {
    /// Create a record that redirects `path` to `redirect_url` with no metadata.
    pub fn new(path: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirect_url: redirect_url.into(),
            ..Self::default()
        }
    }

    /// Whether the record's expiry lies strictly before `now`.
    ///
    /// A record without `expires` never expires. A record expiring exactly at
    /// `now` is still live.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires < now)
    }
}

/// Mapping from language code to a localized string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Value for `lang`, or the empty string when that language is missing.
    pub fn get_or_empty(&self, lang: &str) -> &str {
        self.0.get(lang).map_or("", String::as_str)
    }

    /// Set the value for `lang`, replacing any previous value.
    pub fn insert(&mut self, lang: impl Into<String>, value: impl Into<String>) {
        self.0.insert(lang.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Language codes with a value, in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for LocalizedText
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Open Graph fields of a link, each localized independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgMetadata {
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub image: LocalizedText,
}

/// Open Graph fields resolved for a single language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalizedOg<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image: &'a str,
}

impl OgMetadata {
    /// Resolve every field for `lang`. Missing languages give empty strings.
    pub fn localized(&self, lang: &str) -> LocalizedOg<'_> {
        LocalizedOg {
            title: self.title.get_or_empty(lang),
            description: self.description.get_or_empty(lang),
            image: self.image.get_or_empty(lang),
        }
    }

    /// Strictly parse a stored `og` JSON document.
    pub fn parse_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
