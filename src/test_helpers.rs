//! Shared test utilities for the sheetfolio test suite.
//!
//! Asset builders for layout tests, plus fixture setup and lookups for
//! tests that load a whole content directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = load_site(tmp.path()).unwrap();
//!
//! let project = find_project_by_slug(&site, "harbour-lights");
//! assert_eq!(project.label, "(01)");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::Site;
use crate::sheet::AssetLayout;
use crate::types::{Asset, Project};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `projects.json` into `root`, creating the directory if needed.
pub fn write_projects(root: &Path, json: &str) {
    std::fs::create_dir_all(root).unwrap();
    std::fs::write(root.join("projects.json"), json).unwrap();
}

/// Write a small solid PNG of the given size under `root/public/{rel}`.
pub fn write_png(root: &Path, rel: &str, width: u32, height: u32) {
    let path = root.join("public").join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::from_pixel(width, height, image::Rgb([40, 40, 40]))
        .save(&path)
        .unwrap();
}

// =========================================================================
// Asset builders
// =========================================================================

/// Layout with a group id and optional width / order index.
pub fn layout_in_group(group: &str, width: Option<f64>, order_index: Option<u32>) -> AssetLayout {
    AssetLayout {
        group_id: Some(group.to_string()),
        width,
        order_index,
        ..AssetLayout::default()
    }
}

/// Image asset carrying an explicit group id and nothing else.
pub fn asset_in_group(src: &str, group: &str) -> Asset {
    Asset {
        layout: Some(layout_in_group(group, None, None)),
        ..Asset::image(src)
    }
}

/// Image asset with only a width request (or no layout at all for `None`).
pub fn asset_with_width(width: Option<f64>) -> Asset {
    Asset {
        layout: width.map(|w| AssetLayout {
            width: Some(w),
            ..AssetLayout::default()
        }),
        ..Asset::image("/w.jpg")
    }
}

// =========================================================================
// Lookups and assertions
// =========================================================================

/// Find a project by slug. Panics if not found.
pub fn find_project_by_slug<'a>(site: &'a Site, slug: &str) -> &'a Project {
    site.projects
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = site.projects.iter().map(|p| p.slug.as_str()).collect();
            panic!("project '{slug}' not found. Available: {slugs:?}")
        })
}

/// All project ids in load order.
pub fn project_ids(site: &Site) -> Vec<&str> {
    site.projects.iter().map(|p| p.id.as_str()).collect()
}

/// Assert widths match within 1e-6.
pub fn assert_widths(actual: &[f64], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "width count mismatch: {actual:?} vs {expected:?}"
    );
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "widths {actual:?} != {expected:?}");
    }
}
