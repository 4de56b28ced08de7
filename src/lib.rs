//! # Sheetfolio
//!
//! A static site generator for design portfolios. Projects live in a single
//! `projects.json`; each project gets a "sheet" page whose gallery is laid
//! out in rows. Row membership, widths and order come from asset filenames.
//!
//! # Pipeline
//!
//! ```text
//! 1. Enrich    projects.json + public/  →  projects.json   (record aspect ratios)
//! 2. Load      content/                 →  Site            (normalized projects)
//! 3. Layout    Project                  →  Vec<SheetRow>   (per sheet)
//! 4. Generate  Site                     →  dist/           (final HTML site)
//! ```
//!
//! Enrich is optional and rewrites the content file in place; everything
//! else is a pure function of the content directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `{sequence}_{width}_{order}` filename parser, slugs and titles |
//! | [`sheet`] | Asset layouts, row grouping and width resolution |
//! | [`types`] | Project and asset records shared by every stage |
//! | [`content`] | Loads `projects.json`, `about.md` and config into a [`content::Site`] |
//! | [`probe`] | Reads image and MP4 dimensions to fill in aspect ratios |
//! | [`generate`] | Renders the HTML site with Maud |
//! | [`config`] | `config.toml` loading, validation, merging and CSS generation |
//! | [`output`] | CLI output formatting for each command |
//!
//! # Design Decisions
//!
//! ## Filenames Drive Layout
//!
//! A file named `3_60_A.jpg` belongs to row 3, takes 60% of the row and
//! sorts first. Authors arrange a sheet by renaming files; there is no
//! separate layout file to keep in sync. Explicit `layout` objects in
//! `projects.json` override anything the filename says.
//!
//! ## Rows Always Fill
//!
//! Width percentages are resolved per row so that they sum to 100 whenever
//! the authored numbers allow it. Missing widths share what is left; rows
//! with no widths split evenly. The stylesheet subtracts the row's gaps
//! before applying percentages, so a row never wraps.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed markup is a build error and all
//! interpolation is escaped.

pub mod config;
pub mod content;
pub mod generate;
pub mod naming;
pub mod output;
pub mod probe;
pub mod sheet;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
