use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::payload::Lookup;

/// Kind of a downloadable media entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Gif,
    Video,
}

impl MediaKind {
    /// File extension used when saving an entry of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Video => "mp4",
            MediaKind::Image | MediaKind::Gif => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl MediaItem {
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            width: None,
            height: None,
            thumbnail_url: None,
        }
    }

    pub fn with_dimensions(mut self, width: Option<u64>, height: Option<u64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_url: Option<String>) -> Self {
        self.thumbnail_url = thumbnail_url;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Canonical, flattened view of one pin.
///
/// `images` only holds `Image`/`Gif` entries and `videos` only `Video` entries.
/// Within each sequence urls are unique and order is first-discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub images: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl PinResult {
    /// True when neither images nor videos were found.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }

    /// Videos first, then images. This is also the download numbering order.
    pub fn media(&self) -> impl Iterator<Item = &MediaItem> {
        self.videos.iter().chain(self.images.iter())
    }
}

pub const SUCCESS_STATUS: &str = "success";
pub const ERROR_STATUS: &str = "error";

/// Response body returned by the upstream provider, kept exactly as received
/// so it can be relayed unchanged. Fields are read leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderEnvelope(Value);

impl ProviderEnvelope {
    pub fn success(data: Value) -> Self {
        Self(json!({ "status": SUCCESS_STATUS, "data": data }))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self(json!({ "status": ERROR_STATUS, "message": message.into() }))
    }

    /// `status` when it is a string.
    pub fn status(&self) -> Option<&str> {
        self.0.str_at(&["status"])
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(SUCCESS_STATUS)
    }

    pub fn message(&self) -> Option<&str> {
        self.0.str_at(&["message"])
    }

    /// `data` unless it is absent or `null`.
    pub fn data(&self) -> Option<&Value> {
        self.0.at(&["data"]).filter(|d| !d.is_null())
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for ProviderEnvelope {
    fn from(body: Value) -> Self {
        Self(body)
    }
}
