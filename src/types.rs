//! Content records shared by the loader, the layout engine, and the renderer.
//!
//! Field names serialize in camelCase so `projects.json` written by hand (or
//! by the `enrich` command) reads naturally to content authors.

use crate::sheet::AssetLayout;
use serde::{Deserialize, Serialize};

/// Extensions treated as video when a project falls back to its cover.
const VIDEO_COVER_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".webm", ".m4v"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// One `<source>` of a video asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSource {
    #[serde(default)]
    pub src: String,
    /// MIME type, e.g. `video/mp4`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

/// One media item in a project gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// As authored. Untyped items render as images.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<VideoSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<String>,
    /// Width / height of the underlying media, filled in by `enrich`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    /// Sheet layout; authored directly or derived from the filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<AssetLayout>,
}

impl Asset {
    pub fn image(src: impl Into<String>) -> Self {
        Self {
            kind: Some(MediaKind::Image),
            src: Some(src.into()),
            ..Self::default()
        }
    }

    pub fn video(src: impl Into<String>) -> Self {
        Self {
            kind: Some(MediaKind::Video),
            sources: vec![VideoSource {
                src: src.into(),
                mime: Some("video/mp4".to_string()),
            }],
            ..Self::default()
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        self.kind.unwrap_or_default()
    }

    pub fn is_video(&self) -> bool {
        self.media_kind() == MediaKind::Video
    }

    /// First non-empty `sources[].src`.
    pub fn first_source(&self) -> Option<&str> {
        self.sources
            .iter()
            .map(|s| s.src.as_str())
            .find(|src| !src.is_empty())
    }
}

/// A `label: value` pair shown in the sheet's detail grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

/// A detail grid entry parsed from `*Label* value` markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSection {
    pub label: String,
    pub value: String,
}

/// A normalized project, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub slug: String,
    /// Display index such as `(03)`.
    pub label: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Grid thumbnail URL; may be empty.
    pub cover: String,
    pub alt: String,
    pub sheet_title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub facts: Vec<Fact>,
    /// Free-form entries carried through untouched.
    pub details: Vec<serde_json::Value>,
    pub detail_text: String,
    pub detail_sections: Vec<DetailSection>,
    pub gallery: Vec<Asset>,
    pub sheet_gallery: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl Project {
    /// Assets shown in the project sheet.
    ///
    /// `sheet_gallery` wins when non-empty, then `gallery`, then a single
    /// asset built from the cover. A project with none of these has an
    /// empty sheet.
    pub fn sheet_assets(&self) -> Vec<Asset> {
        if !self.sheet_gallery.is_empty() {
            return self.sheet_gallery.clone();
        }
        if !self.gallery.is_empty() {
            return self.gallery.clone();
        }
        self.cover_fallback().into_iter().collect()
    }

    /// Whether the cover URL points at a video file.
    pub fn cover_is_video(&self) -> bool {
        let lower = self.cover.to_lowercase();
        VIDEO_COVER_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
    }

    fn cover_fallback(&self) -> Option<Asset> {
        if self.cover.is_empty() {
            return None;
        }
        if self.cover_is_video() {
            return Some(Asset {
                autoplay: Some(true),
                looping: Some(true),
                muted: Some(true),
                ..Asset::video(self.cover.clone())
            });
        }
        Some(Asset {
            alt: Some(self.alt.clone()),
            ..Asset::image(self.cover.clone())
        })
    }

    /// Sheet assets with layouts attached, for feeding to
    /// [`build_sheet_rows`](crate::sheet::build_sheet_rows).
    pub fn decorated_sheet_assets(&self) -> Vec<Asset> {
        crate::sheet::decorate(&self.sheet_assets())
    }
}
