//! Per-asset layout descriptors.
//!
//! A layout can come from three places, resolved in this order:
//!
//! 1. Authored in `projects.json` as an explicit `layout` object. Such
//!    assets are never re-parsed.
//! 2. Derived from the asset's primary URL via the filename convention in
//!    [`crate::naming`].
//! 3. Caller-supplied overrides, merged field by field on top of whatever
//!    1 or 2 produced.

use super::DEFAULT_ROW_GAP;
use crate::naming::{self, SheetName};
use crate::types::Asset;
use serde::{Deserialize, Serialize};

/// Layout hints for one asset. Every field is independently optional.
///
/// Authored JSON is read leniently: a field holding the wrong kind of value
/// is treated as absent instead of failing the whole content file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetLayout {
    /// Shared by assets that render in the same row. Only contiguous runs group.
    #[serde(
        default,
        deserialize_with = "lenient::label",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_id: Option<String>,
    /// Requested share of the row, in percent.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<f64>,
    /// Raw order token the index was resolved from.
    #[serde(
        default,
        deserialize_with = "lenient::label",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_key: Option<String>,
    /// Zero-based position within the row.
    #[serde(
        default,
        deserialize_with = "lenient::whole",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_index: Option<u32>,
    /// Pack this many consecutive assets (by position) into one row.
    /// Takes precedence over `group_id`.
    #[serde(
        default,
        deserialize_with = "lenient::whole",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_size: Option<u32>,
    /// Column gap in pixels.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub gap: Option<f64>,
    /// Rendering hint only; packing ignores it.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub aspect_ratio: Option<f64>,
}

/// Field readers that map unusable values to `None`.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Any finite number.
    pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        Ok(Value::deserialize(de)?.as_f64().filter(|n| n.is_finite()))
    }

    /// A number in `0..=u32::MAX`, fraction truncated.
    pub fn whole<'de, D: Deserializer<'de>>(de: D) -> Result<Option<u32>, D::Error> {
        Ok(number(de)?
            .filter(|n| (0.0..=f64::from(u32::MAX)).contains(n))
            .map(|n| n as u32))
    }

    /// A string, or a number spelled as one.
    pub fn label<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

impl AssetLayout {
    pub fn is_empty(&self) -> bool {
        self.group_id.is_none()
            && self.width.is_none()
            && self.order_key.is_none()
            && self.order_index.is_none()
            && self.group_size.is_none()
            && self.gap.is_none()
            && self.aspect_ratio.is_none()
    }

    /// Merge `overrides` on top of `self`. Each field set in `overrides`
    /// wins; unset fields keep the value from `self`.
    pub fn merged_with(self, overrides: &AssetLayout) -> AssetLayout {
        AssetLayout {
            group_id: overrides.group_id.clone().or(self.group_id),
            width: overrides.width.or(self.width),
            order_key: overrides.order_key.clone().or(self.order_key),
            order_index: overrides.order_index.or(self.order_index),
            group_size: overrides.group_size.or(self.group_size),
            gap: overrides.gap.or(self.gap),
            aspect_ratio: overrides.aspect_ratio.or(self.aspect_ratio),
        }
    }
}

impl From<SheetName> for AssetLayout {
    fn from(name: SheetName) -> Self {
        Self {
            group_id: Some(name.sequence),
            width: Some(f64::from(name.width)),
            order_key: name.order_key,
            order_index: name.order_index,
            group_size: None,
            gap: Some(DEFAULT_ROW_GAP),
            aspect_ratio: None,
        }
    }
}

/// The URL whose filename carries the asset's layout.
///
/// `src` first, then the first video source, then the poster. Empty when
/// the asset has none of these.
pub fn primary_url(asset: &Asset) -> &str {
    asset
        .src
        .as_deref()
        .filter(|src| !src.is_empty())
        .or_else(|| asset.first_source())
        .or_else(|| asset.poster.as_deref().filter(|p| !p.is_empty()))
        .unwrap_or_default()
}

/// Derive a layout from a URL's filename, e.g. `/a/3_40_B.jpg`.
///
/// Returns `None` for plain filenames; nothing partial is produced.
pub fn parse_layout_from_url(url: &str) -> Option<AssetLayout> {
    let stem = naming::file_stem_from_url(url);
    if stem.is_empty() {
        return None;
    }
    naming::parse_sheet_name(stem).map(AssetLayout::from)
}

/// Attach a layout to an asset and hand it back.
///
/// An asset that already carries a layout is not re-parsed, so calling this
/// twice is the same as calling it once. Non-empty `overrides` are merged
/// on top either way; with no layout to merge onto, the overrides become
/// the layout.
pub fn attach_layout(mut asset: Asset, overrides: &AssetLayout) -> Asset {
    if asset.layout.is_none() {
        let url = primary_url(&asset);
        let parsed = parse_layout_from_url(url);
        if parsed.is_none() {
            tracing::debug!(url, "no layout in filename; asset gets its own row");
        }
        asset.layout = parsed;
    }
    if !overrides.is_empty() {
        let base = asset.layout.take().unwrap_or_default();
        asset.layout = Some(base.merged_with(overrides));
    }
    asset
}

/// Decorated copies of a whole gallery; the input is left untouched.
pub fn decorate(assets: &[Asset]) -> Vec<Asset> {
    let no_overrides = AssetLayout::default();
    assets
        .iter()
        .cloned()
        .map(|asset| attach_layout(asset, &no_overrides))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::{MediaKind, VideoSource};

    #[test]
    fn parse_url_letter_order() {
        let layout = parse_layout_from_url("/assets/p/12_25_C.png").unwrap();
        assert_eq!(layout.group_id.as_deref(), Some("12"));
        assert_eq!(layout.width, Some(25.0));
        assert_eq!(layout.order_key.as_deref(), Some("C"));
        assert_eq!(layout.order_index, Some(2));
        assert_eq!(layout.gap, Some(DEFAULT_ROW_GAP));
        assert_eq!(layout.group_size, None);
    }

    #[test]
    fn parse_url_double_letter_order() {
        let layout = parse_layout_from_url("5_07_aa.jpg").unwrap();
        assert_eq!(layout.group_id.as_deref(), Some("5"));
        assert_eq!(layout.width, Some(7.0));
        assert_eq!(layout.order_key.as_deref(), Some("AA"));
        assert_eq!(layout.order_index, Some(26));
    }

    #[test]
    fn parse_url_plain_filename() {
        assert_eq!(parse_layout_from_url("/assets/hero.jpg"), None);
        assert_eq!(parse_layout_from_url(""), None);
        assert_eq!(parse_layout_from_url("/assets/"), None);
    }

    #[test]
    fn parse_url_bad_width_is_all_or_nothing() {
        assert_eq!(parse_layout_from_url("/a/3_wide_B.jpg"), None);
    }

    #[test]
    fn primary_url_prefers_src() {
        let asset = Asset {
            poster: Some("/p.jpg".into()),
            ..Asset::image("/s.jpg")
        };
        assert_eq!(primary_url(&asset), "/s.jpg");
    }

    #[test]
    fn primary_url_falls_back_to_sources_then_poster() {
        let video = Asset {
            poster: Some("/poster.jpg".into()),
            ..Asset::video("/clip.mp4")
        };
        assert_eq!(primary_url(&video), "/clip.mp4");

        let poster_only = Asset {
            kind: Some(MediaKind::Video),
            sources: vec![VideoSource::default()],
            poster: Some("/poster.jpg".into()),
            ..Asset::default()
        };
        assert_eq!(primary_url(&poster_only), "/poster.jpg");
    }

    #[test]
    fn primary_url_skips_empty_src() {
        let asset = Asset {
            src: Some(String::new()),
            poster: Some("/poster.jpg".into()),
            ..Asset::default()
        };
        assert_eq!(primary_url(&asset), "/poster.jpg");
        assert_eq!(primary_url(&Asset::default()), "");
    }

    #[test]
    fn attach_derives_from_filename() {
        let asset = attach_layout(Asset::image("/a/3_40_B.jpg"), &AssetLayout::default());
        let layout = asset.layout.unwrap();
        assert_eq!(layout.group_id.as_deref(), Some("3"));
        assert_eq!(layout.width, Some(40.0));
        assert_eq!(layout.order_key.as_deref(), Some("B"));
        assert_eq!(layout.order_index, Some(1));
    }

    #[test]
    fn attach_derives_from_video_source() {
        let asset = attach_layout(Asset::video("/v/2_60_A.mp4"), &AssetLayout::default());
        assert_eq!(asset.layout.unwrap().group_id.as_deref(), Some("2"));
    }

    #[test]
    fn attach_plain_filename_leaves_layout_unset() {
        let asset = attach_layout(Asset::image("/a/hero.jpg"), &AssetLayout::default());
        assert_eq!(asset.layout, None);
    }

    #[test]
    fn attach_keeps_authored_layout() {
        let authored = AssetLayout {
            group_size: Some(2),
            ..AssetLayout::default()
        };
        let asset = Asset {
            layout: Some(authored.clone()),
            ..Asset::image("/a/3_40_B.jpg")
        };
        let asset = attach_layout(asset, &AssetLayout::default());
        assert_eq!(asset.layout, Some(authored));
    }

    #[test]
    fn attach_is_idempotent() {
        let once = attach_layout(Asset::image("/a/9_30_D.jpg"), &AssetLayout::default());
        let twice = attach_layout(once.clone(), &AssetLayout::default());
        assert_eq!(once.layout, twice.layout);
    }

    #[test]
    fn overrides_win_over_parsed_fields() {
        let overrides = AssetLayout {
            width: Some(70.0),
            gap: Some(24.0),
            ..AssetLayout::default()
        };
        let asset = attach_layout(Asset::image("/a/3_40_B.jpg"), &overrides);
        let layout = asset.layout.unwrap();
        assert_eq!(layout.width, Some(70.0));
        assert_eq!(layout.gap, Some(24.0));
        // Parsed fields fill the gaps
        assert_eq!(layout.group_id.as_deref(), Some("3"));
        assert_eq!(layout.order_index, Some(1));
    }

    #[test]
    fn overrides_apply_to_authored_layout() {
        let asset = Asset {
            layout: Some(layout_in_group("x", None, Some(0))),
            ..Asset::image("/a/hero.jpg")
        };
        let overrides = AssetLayout {
            group_id: Some("y".into()),
            ..AssetLayout::default()
        };
        let layout = attach_layout(asset, &overrides).layout.unwrap();
        assert_eq!(layout.group_id.as_deref(), Some("y"));
        assert_eq!(layout.order_index, Some(0));
    }

    #[test]
    fn overrides_become_layout_for_plain_filename() {
        let overrides = AssetLayout {
            group_size: Some(3),
            ..AssetLayout::default()
        };
        let asset = attach_layout(Asset::image("/a/hero.jpg"), &overrides);
        assert_eq!(asset.layout, Some(overrides));
    }

    #[test]
    fn decorate_leaves_input_untouched() {
        let gallery = vec![Asset::image("/a/1_50_A.jpg"), Asset::image("/a/hero.jpg")];
        let decorated = decorate(&gallery);
        assert!(gallery.iter().all(|a| a.layout.is_none()));
        assert!(decorated[0].layout.is_some());
        assert!(decorated[1].layout.is_none());
    }

    #[test]
    fn layout_json_uses_camel_case() {
        let layout: AssetLayout =
            serde_json::from_str(r#"{"groupId":"4","groupSize":2,"orderIndex":1,"width":55.5}"#)
                .unwrap();
        assert_eq!(layout.group_id.as_deref(), Some("4"));
        assert_eq!(layout.group_size, Some(2));
        assert_eq!(layout.order_index, Some(1));
        assert_eq!(layout.width, Some(55.5));
    }

    #[test]
    fn layout_json_out_of_range_counts_are_absent() {
        let layout: AssetLayout =
            serde_json::from_str(r#"{"groupSize":-1,"orderIndex":-3,"width":"wide","gap":null}"#)
                .unwrap();
        assert_eq!(layout.group_size, None);
        assert_eq!(layout.order_index, None);
        assert_eq!(layout.width, None);
        assert_eq!(layout.gap, None);
        assert!(layout.is_empty());
    }

    #[test]
    fn layout_json_fractions_truncate() {
        let layout: AssetLayout =
            serde_json::from_str(r#"{"groupSize":2.9,"orderIndex":1.5,"aspectRatio":1.5}"#)
                .unwrap();
        assert_eq!(layout.group_size, Some(2));
        assert_eq!(layout.order_index, Some(1));
        assert_eq!(layout.aspect_ratio, Some(1.5));
    }

    #[test]
    fn layout_json_numeric_group_id_is_text() {
        let layout: AssetLayout =
            serde_json::from_str(r#"{"groupId":3,"orderKey":["B"]}"#).unwrap();
        assert_eq!(layout.group_id.as_deref(), Some("3"));
        assert_eq!(layout.order_key, None);
    }

    #[test]
    fn odd_layout_values_do_not_fail_the_content_file() {
        let projects = crate::content::parse_projects(
            r#"{"projects": [{"title": "Odd", "sheetGallery": [
                {"type": "image", "src": "/p/a.jpg", "layout": {"groupSize": -1}},
                {"type": "image", "src": "/p/b.jpg", "layout": {"orderIndex": 1.5, "groupId": 7}}
            ]}]}"#,
        )
        .unwrap();
        let gallery = &projects[0].sheet_gallery;
        assert_eq!(gallery[0].layout.as_ref().unwrap().group_size, None);
        let second = gallery[1].layout.as_ref().unwrap();
        assert_eq!(second.order_index, Some(1));
        assert_eq!(second.group_id.as_deref(), Some("7"));
    }
}
