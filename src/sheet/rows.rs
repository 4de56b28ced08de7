//! Greedy row packing.
//!
//! A single cursor walks the decorated asset list. At each position the
//! asset's layout picks one of three outcomes:
//!
//! | Signal at cursor | Row formed |
//! |------------------|------------|
//! | `group_size > 1` | next `group_size` assets by position, whatever their group ids |
//! | non-empty `group_id` | the contiguous run sharing that id |
//! | neither | the asset alone, full width, no gap |
//!
//! Packed rows are sorted by `order_index`; assets without one sort by their
//! position inside the row. Rows borrow from the input slice.

use super::{DEFAULT_ROW_GAP, PERCENTAGE_MAX, compute_row_widths};
use crate::types::Asset;
use serde::Serialize;

/// Assets rendered side by side, with resolved widths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow<'a> {
    pub assets: Vec<&'a Asset>,
    pub columns: usize,
    /// Column gap in pixels.
    pub gap: f64,
    /// Percentages, parallel to `assets`.
    pub widths: Vec<f64>,
}

impl<'a> SheetRow<'a> {
    fn single(asset: &'a Asset) -> Self {
        Self {
            assets: vec![asset],
            columns: 1,
            gap: 0.0,
            widths: vec![PERCENTAGE_MAX],
        }
    }

    fn group(members: &'a [Asset], gap: f64) -> Self {
        // Missing order indices fall back to position within the group;
        // the stable sort keeps ties in input order.
        let mut keyed: Vec<(u64, &'a Asset)> = members
            .iter()
            .enumerate()
            .map(|(position, asset)| {
                let key = asset
                    .layout
                    .as_ref()
                    .and_then(|l| l.order_index)
                    .map_or(position as u64, u64::from);
                (key, asset)
            })
            .collect();
        keyed.sort_by_key(|(key, _)| *key);
        let assets: Vec<&'a Asset> = keyed.into_iter().map(|(_, asset)| asset).collect();

        let widths = compute_row_widths(&assets);
        Self {
            columns: assets.len(),
            assets,
            gap,
            widths,
        }
    }
}

/// Pack an ordered, decorated asset list into rows.
///
/// Every input asset lands in exactly one row, and rows appear in the order
/// of their first asset.
pub fn build_sheet_rows(assets: &[Asset]) -> Vec<SheetRow<'_>> {
    let mut rows = Vec::new();
    let mut cursor = 0;

    while let Some(anchor) = assets.get(cursor) {
        let Some(layout) = anchor.layout.as_ref() else {
            rows.push(SheetRow::single(anchor));
            cursor += 1;
            continue;
        };
        let gap = layout.gap.unwrap_or(DEFAULT_ROW_GAP);

        if let Some(size) = layout.group_size
            && size > 1
        {
            let take = (size as usize).min(assets.len() - cursor);
            if take <= 1 {
                rows.push(SheetRow::single(anchor));
                cursor += 1;
            } else {
                rows.push(SheetRow::group(&assets[cursor..cursor + take], gap));
                cursor += take;
            }
            continue;
        }

        if let Some(group_id) = layout.group_id.as_deref()
            && !group_id.is_empty()
        {
            let run = assets[cursor..]
                .iter()
                .take_while(|a| {
                    a.layout
                        .as_ref()
                        .and_then(|l| l.group_id.as_deref())
                        == Some(group_id)
                })
                .count();
            rows.push(SheetRow::group(&assets[cursor..cursor + run], gap));
            cursor += run;
            continue;
        }

        rows.push(SheetRow::single(anchor));
        cursor += 1;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{AssetLayout, decorate};
    use crate::test_helpers::*;

    fn srcs(row: &SheetRow<'_>) -> Vec<String> {
        row.assets
            .iter()
            .map(|a| a.src.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn empty_input_gives_no_rows() {
        assert!(build_sheet_rows(&[]).is_empty());
    }

    #[test]
    fn plain_assets_are_singletons() {
        let assets = vec![Asset::image("/a.jpg"), Asset::image("/b.jpg")];
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.columns, 1);
            assert_eq!(row.gap, 0.0);
            assert_eq!(row.widths, vec![100.0]);
        }
    }

    #[test]
    fn filename_group_packs_and_orders() {
        let assets = decorate(&[
            Asset::image("/p/1_50_B.jpg"),
            Asset::image("/p/1_25_A.jpg"),
            Asset::image("/p/1_25_C.jpg"),
            Asset::image("/p/cover.jpg"),
        ]);
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            srcs(&rows[0]),
            vec!["/p/1_25_A.jpg", "/p/1_50_B.jpg", "/p/1_25_C.jpg"]
        );
        assert_eq!(rows[0].columns, 3);
        assert_eq!(rows[0].gap, DEFAULT_ROW_GAP);
        assert_widths(&rows[0].widths, &[25.0, 50.0, 25.0]);
        assert_eq!(srcs(&rows[1]), vec!["/p/cover.jpg"]);
    }

    #[test]
    fn groups_are_never_assembled_across_gaps() {
        let assets = vec![
            asset_in_group("/a.jpg", "1"),
            asset_in_group("/b.jpg", "2"),
            asset_in_group("/c.jpg", "1"),
        ];
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 3);
        assert_eq!(srcs(&rows[0]), vec!["/a.jpg"]);
        assert_eq!(srcs(&rows[1]), vec!["/b.jpg"]);
        assert_eq!(srcs(&rows[2]), vec!["/c.jpg"]);
    }

    #[test]
    fn singleton_group_run_keeps_layout_gap() {
        let assets = vec![asset_in_group("/a.jpg", "7")];
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gap, DEFAULT_ROW_GAP);
        assert_eq!(rows[0].widths, vec![100.0]);
    }

    #[test]
    fn group_size_overrides_group_ids() {
        let mut assets = vec![
            asset_in_group("/a.jpg", "1"),
            asset_in_group("/b.jpg", "2"),
            Asset::image("/c.jpg"),
            asset_in_group("/d.jpg", "1"),
        ];
        assets[0].layout = Some(AssetLayout {
            group_size: Some(3),
            ..assets[0].layout.clone().unwrap_or_default()
        });
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 2);
        assert_eq!(srcs(&rows[0]), vec!["/a.jpg", "/b.jpg", "/c.jpg"]);
        assert_eq!(rows[0].columns, 3);
        assert_eq!(srcs(&rows[1]), vec!["/d.jpg"]);
    }

    #[test]
    fn group_size_clamped_to_remaining() {
        let mut assets = vec![Asset::image("/a.jpg"), Asset::image("/b.jpg")];
        assets[0].layout = Some(AssetLayout {
            group_size: Some(5),
            gap: Some(4.0),
            ..AssetLayout::default()
        });
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].columns, 2);
        assert_eq!(rows[0].gap, 4.0);
    }

    #[test]
    fn group_size_at_last_asset_is_singleton() {
        let mut assets = vec![Asset::image("/a.jpg"), Asset::image("/b.jpg")];
        assets[1].layout = Some(AssetLayout {
            group_size: Some(3),
            ..AssetLayout::default()
        });
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].gap, 0.0);
        assert_eq!(rows[1].widths, vec![100.0]);
    }

    #[test]
    fn group_size_of_one_is_ignored() {
        let mut assets = vec![asset_in_group("/a.jpg", "1"), asset_in_group("/b.jpg", "1")];
        assets[0].layout = Some(AssetLayout {
            group_size: Some(1),
            ..assets[0].layout.clone().unwrap_or_default()
        });
        let rows = build_sheet_rows(&assets);
        // Falls through to the group id
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].columns, 2);
    }

    #[test]
    fn missing_order_keeps_input_order() {
        let assets = vec![asset_in_group("/x.jpg", "g"), asset_in_group("/y.jpg", "g")];
        let rows = build_sheet_rows(&assets);
        assert_eq!(srcs(&rows[0]), vec!["/x.jpg", "/y.jpg"]);
    }

    #[test]
    fn mixed_order_uses_position_as_fallback() {
        let mut assets = vec![
            asset_in_group("/first.jpg", "g"),
            asset_in_group("/second.jpg", "g"),
            asset_in_group("/third.jpg", "g"),
        ];
        // Ties with the unordered first asset at position 0
        assets[2].layout = Some(layout_in_group("g", None, Some(0)));
        let rows = build_sheet_rows(&assets);
        assert_eq!(
            srcs(&rows[0]),
            vec!["/first.jpg", "/third.jpg", "/second.jpg"]
        );
    }

    #[test]
    fn empty_group_id_is_no_signal() {
        let assets = vec![asset_in_group("/a.jpg", ""), asset_in_group("/b.jpg", "")];
        let rows = build_sheet_rows(&assets);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.gap == 0.0));
    }

    #[test]
    fn packing_does_not_touch_layouts() {
        let assets = decorate(&[Asset::image("/p/2_30_B.jpg"), Asset::image("/p/2_30_A.jpg")]);
        let before = assets.clone();
        let _ = build_sheet_rows(&assets);
        assert_eq!(assets, before);
    }
}
