//! Width distribution for a single row.
//!
//! Explicit widths are honoured as far as possible; whatever budget is left
//! is split evenly among assets that did not ask for a width. When every
//! asset asked, the requests are rescaled so the row adds up to 100.

use super::{PERCENTAGE_MAX, PERCENTAGE_MIN};
use crate::types::Asset;

/// Clamp a width request into `[1, 100]`. Non-finite input counts as "no
/// request".
pub fn clamp_percentage(value: f64) -> Option<f64> {
    value
        .is_finite()
        .then(|| value.clamp(PERCENTAGE_MIN, PERCENTAGE_MAX))
}

/// Resolve per-asset width percentages for one row, in row order.
///
/// Overcommitted rows (explicit widths summing past 100 alongside
/// unspecified assets) are not rebalanced: explicit widths pass through
/// and each unspecified asset gets `100 / len`.
pub fn compute_row_widths(row: &[&Asset]) -> Vec<f64> {
    if row.is_empty() {
        return Vec::new();
    }
    let count = row.len() as f64;
    let requested: Vec<Option<f64>> = row
        .iter()
        .map(|asset| {
            asset
                .layout
                .as_ref()
                .and_then(|layout| layout.width)
                .and_then(clamp_percentage)
        })
        .collect();

    let specified_total: f64 = requested.iter().flatten().sum();
    let unspecified = requested.iter().filter(|w| w.is_none()).count();

    if unspecified > 0 {
        let remaining = (PERCENTAGE_MAX - specified_total).max(0.0);
        let share = if remaining > 0.0 {
            remaining / unspecified as f64
        } else {
            PERCENTAGE_MAX / count
        };
        return requested.iter().map(|w| w.unwrap_or(share)).collect();
    }

    if specified_total <= 0.0 {
        return vec![PERCENTAGE_MAX / count; row.len()];
    }

    requested
        .iter()
        .map(|w| w.unwrap_or_default() / specified_total * PERCENTAGE_MAX)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn row_of(widths: &[Option<f64>]) -> Vec<Asset> {
        widths.iter().map(|w| asset_with_width(*w)).collect()
    }

    fn widths_for(assets: &[Asset]) -> Vec<f64> {
        let refs: Vec<&Asset> = assets.iter().collect();
        compute_row_widths(&refs)
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_percentage(0.0), Some(1.0));
        assert_eq!(clamp_percentage(-20.0), Some(1.0));
        assert_eq!(clamp_percentage(250.0), Some(100.0));
        assert_eq!(clamp_percentage(42.5), Some(42.5));
        assert_eq!(clamp_percentage(f64::NAN), None);
        assert_eq!(clamp_percentage(f64::INFINITY), None);
    }

    #[test]
    fn empty_row_has_no_widths() {
        assert!(compute_row_widths(&[]).is_empty());
    }

    #[test]
    fn remaining_split_among_unspecified() {
        let assets = row_of(&[Some(60.0), None, None]);
        assert_widths(&widths_for(&assets), &[60.0, 20.0, 20.0]);
    }

    #[test]
    fn all_unspecified_split_evenly() {
        let assets = row_of(&[None, None, None, None]);
        assert_widths(&widths_for(&assets), &[25.0, 25.0, 25.0, 25.0]);
    }

    #[test]
    fn all_specified_rescaled_to_hundred() {
        let assets = row_of(&[Some(30.0), Some(30.0)]);
        assert_widths(&widths_for(&assets), &[50.0, 50.0]);

        let assets = row_of(&[Some(80.0), Some(80.0), Some(40.0)]);
        assert_widths(&widths_for(&assets), &[40.0, 40.0, 20.0]);
    }

    #[test]
    fn single_specified_asset_fills_row() {
        let assets = row_of(&[Some(25.0)]);
        assert_widths(&widths_for(&assets), &[100.0]);
    }

    #[test]
    fn out_of_range_widths_are_clamped_first() {
        // 0 clamps to 1, 500 clamps to 100
        let assets = row_of(&[Some(0.0), Some(500.0)]);
        let widths = widths_for(&assets);
        assert_widths(&widths, &[100.0 / 101.0, 10000.0 / 101.0]);
    }

    #[test]
    fn non_finite_width_counts_as_unspecified() {
        let assets = row_of(&[Some(f64::NAN), Some(50.0)]);
        assert_widths(&widths_for(&assets), &[50.0, 50.0]);
    }

    #[test]
    fn exactly_full_budget_falls_back_to_even_share() {
        let assets = row_of(&[Some(100.0), None]);
        assert_widths(&widths_for(&assets), &[100.0, 50.0]);
    }

    #[test]
    fn overcommitted_row_is_not_rebalanced() {
        let assets = row_of(&[Some(70.0), Some(70.0), None]);
        let widths = widths_for(&assets);
        assert_widths(&widths, &[70.0, 70.0, 100.0 / 3.0]);
        assert!(widths.iter().sum::<f64>() > 100.0);
    }

    #[test]
    fn assets_without_layout_are_unspecified() {
        let assets = vec![Asset::image("/a.jpg"), Asset::image("/b.jpg")];
        assert_widths(&widths_for(&assets), &[50.0, 50.0]);
    }
}
