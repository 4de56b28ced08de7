//! Sheet layout engine: filename metadata → rows with resolved widths.
//!
//! A project sheet renders its gallery as a stack of rows. Each row holds one
//! or more assets side by side, each taking a percentage of the row width.
//! The engine is a two-step pure pipeline:
//!
//! ```text
//! assets ──attach_layout──▶ assets + AssetLayout ──build_sheet_rows──▶ [SheetRow]
//!          (per asset)                              (one left-to-right pass)
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | [`AssetLayout`] and its derivation from filenames / overrides |
//! | [`rows`] | Greedy row packing over the decorated asset list |
//! | [`widths`] | Per-row width distribution (always sums to 100 when not overcommitted) |
//!
//! Nothing here fails. Malformed filenames, missing URLs, and junk widths
//! all degrade to a full-width single-asset row, because the renderer has
//! no error path to surface them on.
//!
//! Layouts are recomputed from the asset list on every call; there is no
//! cached state to invalidate.

pub mod layout;
pub mod rows;
pub mod widths;

pub use layout::{AssetLayout, attach_layout, decorate, parse_layout_from_url, primary_url};
pub use rows::{SheetRow, build_sheet_rows};
pub use widths::{clamp_percentage, compute_row_widths};

/// Pixel gap between columns of a packed row when the layout names none.
pub const DEFAULT_ROW_GAP: f64 = 10.0;
/// Smallest width percentage a single asset may claim.
pub const PERCENTAGE_MIN: f64 = 1.0;
/// Largest width percentage a single asset may claim.
pub const PERCENTAGE_MAX: f64 = 100.0;
