//! Media probing: record each asset's aspect ratio in `projects.json`.
//!
//! Sheets reserve space for media before it loads using
//! `--sheet-asset-aspect`. Without a recorded ratio the renderer falls back
//! to the configured default, so running `enrich` after adding media keeps
//! the layout from jumping.
//!
//! ```text
//! projects.json ──▶ for each project ──▶ gallery + sheetGallery (rayon) ──▶ projects.json
//!                                           │
//!                                           ├── image: header read via `image`
//!                                           └── video: tkhd box via [`mp4`]
//! ```
//!
//! Asset URLs are site-absolute (`/projects/a/1.jpg`) and resolve under the
//! content directory's `public/` folder. Failures are logged and counted,
//! never fatal: one unreadable file must not block the rest.

pub mod mp4;

use crate::content::ContentFile;
use crate::types::{Asset, MediaKind};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid projects.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No video track with dimensions in {0}")]
    NoVideoTrack(PathBuf),
    #[error("Degenerate dimensions {0}x{1}")]
    Degenerate(f64, f64),
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v"];

/// Counts from one enrichment pass.
#[derive(Debug, Default, Serialize)]
pub struct EnrichReport {
    pub projects: usize,
    /// Assets whose aspect ratio was written.
    pub updated: usize,
    /// Assets with no probe-able URL or an unsupported extension.
    pub skipped: usize,
    /// `(url, error)` for every asset that could not be read.
    pub failures: Vec<(String, String)>,
}

enum Outcome {
    Updated,
    Skipped,
    Failed(String, ProbeError),
}

/// Width and height of an image file, read from its header.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), ProbeError> {
    let dims = image::ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(dims)
}

/// `width / height` rounded to six decimals. `None` for empty media.
pub fn aspect_ratio(width: f64, height: f64) -> Option<f64> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }
    let ratio = width / height;
    ratio
        .is_finite()
        .then(|| (ratio * 1_000_000.0).round() / 1_000_000.0)
}

/// Map a site-absolute URL to a file under `public_root`.
pub fn resolve_public_path(public_root: &Path, url: &str) -> PathBuf {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    public_root.join(path.trim_start_matches('/'))
}

fn extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// The URL `enrich` reads for an asset, if it has one of a supported type.
fn probe_url(asset: &Asset) -> Option<&str> {
    match asset.media_kind() {
        MediaKind::Image => {
            let src = asset.src.as_deref().filter(|s| !s.is_empty())?;
            IMAGE_EXTENSIONS
                .contains(&extension(src).as_str())
                .then_some(src)
        }
        MediaKind::Video => {
            let src = asset.first_source()?;
            VIDEO_EXTENSIONS
                .contains(&extension(src).as_str())
                .then_some(src)
        }
    }
}

fn measure(path: &Path, kind: MediaKind) -> Result<f64, ProbeError> {
    let (width, height) = match kind {
        MediaKind::Image => {
            let (w, h) = image_dimensions(path)?;
            (f64::from(w), f64::from(h))
        }
        MediaKind::Video => {
            let bytes = fs::read(path)?;
            mp4::video_dimensions(&bytes)
                .ok_or_else(|| ProbeError::NoVideoTrack(path.to_path_buf()))?
        }
    };
    aspect_ratio(width, height).ok_or(ProbeError::Degenerate(width, height))
}

fn enrich_asset(asset: &mut Asset, public_root: &Path) -> Outcome {
    let Some(url) = probe_url(asset).map(str::to_string) else {
        return Outcome::Skipped;
    };
    let path = resolve_public_path(public_root, &url);
    match measure(&path, asset.media_kind()) {
        Ok(ratio) => {
            asset.aspect_ratio = Some(ratio);
            Outcome::Updated
        }
        Err(err) => Outcome::Failed(url, err),
    }
}

/// Probe every gallery and sheet-gallery asset and record its aspect ratio.
///
/// Projects are handled one after another; the assets of a project are
/// probed in parallel on the global rayon pool.
pub fn enrich_projects(file: &mut ContentFile, public_root: &Path) -> EnrichReport {
    let mut report = EnrichReport {
        projects: file.projects.len(),
        ..EnrichReport::default()
    };

    for project in &mut file.projects {
        let outcomes: Vec<Outcome> = project
            .gallery
            .par_iter_mut()
            .chain(project.sheet_gallery.par_iter_mut())
            .map(|asset| enrich_asset(asset, public_root))
            .collect();

        for outcome in outcomes {
            match outcome {
                Outcome::Updated => report.updated += 1,
                Outcome::Skipped => report.skipped += 1,
                Outcome::Failed(url, err) => {
                    tracing::warn!(asset = %url, error = %err, "unable to read media dimensions");
                    report.failures.push((url, err.to_string()));
                }
            }
        }
    }

    report
}

/// Enrich a `projects.json` file in place.
///
/// The file is rewritten as pretty-printed JSON with a trailing newline.
/// Legacy `width`/`height` keys on assets are dropped.
pub fn enrich_file(projects_json: &Path, public_root: &Path) -> Result<EnrichReport, ProbeError> {
    let mut file: ContentFile = serde_json::from_str(&fs::read_to_string(projects_json)?)?;
    let report = enrich_projects(&mut file, public_root);
    let mut out = serde_json::to_string_pretty(&file)?;
    out.push('\n');
    fs::write(projects_json, out)?;
    Ok(report)
}
