//! Core types for ig-export

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::shortcode::Shortcode;

/// One page of the media listing, as returned by the Graph API
///
/// Wire shape: `{ "data": [...], "paging": { "next": "..." } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(rename = "data", default)]
    pub records: Vec<PostRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl PageResponse {
    pub fn new(records: Vec<PostRecord>, next_page_url: Option<String>) -> Self {
        Self {
            records,
            paging: next_page_url.map(|next| Paging { next: Some(next) }),
        }
    }

    /// Continuation URL, if the server supplied a non-empty one
    pub fn next_page_url(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}

/// A media record straight from the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "id")]
    pub raw_id: String,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timestamp: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
}

impl PostRecord {
    pub fn new(raw_id: &str, permalink: &str, timestamp: &str) -> Self {
        Self {
            raw_id: raw_id.to_string(),
            permalink: Some(permalink.to_string()).filter(|p| !p.is_empty()),
            timestamp: timestamp.to_string(),
            media_type: None,
            media_url: None,
        }
    }

    pub fn with_media_type(mut self, media_type: &str) -> Self {
        self.media_type = Some(media_type.to_string());
        self
    }
}

/// Explicit `null` decodes the same as an absent field
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Everything needed to write one content file
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPost {
    pub id: String,
    pub shortcode: Shortcode,
    pub published: DateTime<FixedOffset>,
    /// True when the record's timestamp could not be parsed and the clock was used
    pub timestamp_recovered: bool,
    pub permalink: String,
    pub media_type: String,
}
