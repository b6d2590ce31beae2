//! Typed records for the random gallery listing.

use crate::config::GalleryDefaults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Metadata for one image in the random gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Direct link to the full-size image (or album page for albums).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    /// MIME type, e.g. `image/jpeg`. Absent for albums.
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Upload time as Unix seconds.
    #[serde(default)]
    pub datetime: Option<i64>,
    #[serde(default)]
    pub is_album: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub nsfw: bool,
    #[serde(default)]
    pub mp4: Option<String>,
    #[serde(default)]
    pub gifv: Option<String>,
}

/// Thumbnail variants served by the image host, keyed by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSize {
    /// 90x90, cropped square
    SmallSquare,
    /// 160x160, cropped square
    BigSquare,
    /// 160x160, proportional
    Small,
    /// 320x320
    Medium,
    /// 640x640
    Large,
    /// 1024x1024
    Huge,
}

impl ThumbnailSize {
    pub fn suffix(&self) -> &'static str {
        match self {
            ThumbnailSize::SmallSquare => "s",
            ThumbnailSize::BigSquare => "b",
            ThumbnailSize::Small => "t",
            ThumbnailSize::Medium => "m",
            ThumbnailSize::Large => "l",
            ThumbnailSize::Huge => "h",
        }
    }
}

impl ImageMeta {
    /// URL of a static thumbnail for this image.
    pub fn thumbnail_url(&self, size: ThumbnailSize) -> String {
        format!(
            "{}/{}{}.jpg",
            GalleryDefaults::IMAGE_HOST,
            self.id,
            size.suffix()
        )
    }

    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.datetime
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// Best URL for displaying the full image; animated images prefer mp4.
    pub fn display_url(&self) -> &str {
        if self.animated {
            if let Some(mp4) = self.mp4.as_deref() {
                return mp4;
            }
        }
        &self.link
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// One fetched batch of images, in server order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImagePage {
    images: Vec<ImageMeta>,
}

impl ImagePage {
    pub fn new(images: Vec<ImageMeta>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageMeta> {
        self.images.iter()
    }

    pub fn images(&self) -> &[ImageMeta] {
        &self.images
    }

    /// Find an image by id.
    pub fn get(&self, id: &str) -> Option<&ImageMeta> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn into_images(self) -> Vec<ImageMeta> {
        self.images
    }
}

impl<'a> IntoIterator for &'a ImagePage {
    type Item = &'a ImageMeta;
    type IntoIter = std::slice::Iter<'a, ImageMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

/// Top-level response envelope of the gallery API.
#[derive(Debug, Deserialize)]
pub struct GalleryEnvelope {
    pub data: Vec<ImageMeta>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub status: Option<u16>,
}

fn default_success() -> bool {
    true
}

impl From<GalleryEnvelope> for ImagePage {
    fn from(envelope: GalleryEnvelope) -> Self {
        ImagePage::new(envelope.data)
    }
}

/// Error body returned alongside a non-success status.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub data: ErrorData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorData {
    pub error: serde_json::Value,
}

impl ErrorEnvelope {
    pub(crate) fn message(&self) -> String {
        match &self.data.error {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| self.data.error.to_string()),
            other => other.to_string(),
        }
    }
}

/// Page number in the random gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageCursor(u32);

impl PageCursor {
    pub const MAX_PAGE: u32 = GalleryDefaults::MAX_RANDOM_PAGES;

    pub fn new(page: u32) -> Self {
        Self(page)
    }

    /// The page requested by a refresh.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Whether the gallery serves this page.
    pub fn is_in_range(&self) -> bool {
        self.0 <= Self::MAX_PAGE
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
