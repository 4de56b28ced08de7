//! `config.toml`: optional site settings read from the content directory.
//!
//! The file sits next to `projects.json` and only needs the keys it changes.
//! Its table is laid over a table serialized from [`SiteConfig::default`],
//! the combined table is deserialized, and the result is checked by
//! [`SiteConfig::validate`]. Misspelled keys are errors, not silent no-ops.
//!
//! ```toml
//! [site]
//! title = "Portfolio"
//! description = "Selected projects"
//! base_url = "https://example.com"   # sitemap.xml and og:url
//! # og_image = "/og.png"
//! # favicon = "/favicon.svg"
//!
//! [palette]
//! page = "#f5f5f5"    # page background
//! card = "#ffffff"    # media placeholders, close button
//! rule = "#e2e8f0"    # hairlines
//! text = "#000000"
//! muted = "#000000"   # project numbers, detail labels
//!
//! [theme]
//! grid_gap = "1.5rem"
//! sheet_max_width = "1400px"
//! page_padding = "clamp(1rem, 4vw, 3rem)"
//!
//! [sheet]
//! fallback_aspect_ratio = [4, 3]
//!
//! [processing]
//! # max_processes = 4  # enrich workers; CPU cores when unset
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Name of the settings file inside a content directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("could not serialize default settings: {0}")]
    Defaults(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything `config.toml` can set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub palette: Palette,
    pub theme: ThemeConfig,
    pub sheet: SheetConfig,
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Validation(msg));

        let base = &self.site.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return invalid(format!(
                "site.base_url must start with http:// or https:// (got {base:?})"
            ));
        }
        if self.site.title.trim().is_empty() {
            return invalid("site.title must not be empty".into());
        }
        if self.sheet.fallback_aspect_ratio.contains(&0) {
            return invalid("sheet.fallback_aspect_ratio values must be non-zero".into());
        }
        if let Some((name, _)) = self.palette.tokens().find(|(_, v)| v.trim().is_empty()) {
            return invalid(format!("palette.{name} must not be empty"));
        }
        Ok(())
    }
}

/// Page metadata shared by every generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    /// Absolute URL the site is served from.
    pub base_url: String,
    pub og_image: Option<String>,
    pub favicon: Option<String>,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: "Selected projects".to_string(),
            base_url: "https://example.com".to_string(),
            og_image: None,
            favicon: None,
        }
    }
}

impl SiteMeta {
    /// `base_url` joined with an absolute path.
    pub fn absolute_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            return base.to_string();
        }
        format!("{base}/{}", path.trim_start_matches('/'))
    }
}

/// The portfolio's flat palette. There is no dark variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    /// Page background, also behind the sticky menu bar.
    pub page: String,
    /// Surface behind media that has not loaded yet.
    pub card: String,
    /// Hairline rules and borders.
    pub rule: String,
    pub text: String,
    /// Project numbers and detail labels.
    pub muted: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            page: "#f5f5f5".to_string(),
            card: "#ffffff".to_string(),
            rule: "#e2e8f0".to_string(),
            text: "#000000".to_string(),
            muted: "#000000".to_string(),
        }
    }
}

impl Palette {
    /// `(name, value)` pairs in stylesheet order.
    pub fn tokens(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("page", self.page.as_str()),
            ("card", self.card.as_str()),
            ("rule", self.rule.as_str()),
            ("text", self.text.as_str()),
            ("muted", self.muted.as_str()),
        ]
        .into_iter()
    }
}

/// Spacing of the index grid and project sheets, as CSS values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub grid_gap: String,
    pub sheet_max_width: String,
    pub page_padding: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            grid_gap: "1.5rem".to_string(),
            sheet_max_width: "1400px".to_string(),
            page_padding: "clamp(1rem, 4vw, 3rem)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// `[width, height]` for media with no recorded aspect ratio.
    pub fallback_aspect_ratio: [u32; 2],
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            fallback_aspect_ratio: [4, 3],
        }
    }
}

impl SheetConfig {
    pub fn fallback_aspect(&self) -> f64 {
        let [w, h] = self.fallback_aspect_ratio;
        f64::from(w) / f64::from(h)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Upper bound on `enrich` workers. Unset means one per core.
    pub max_processes: Option<usize>,
}

/// Worker count for `enrich`: the configured cap, never above the core count.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map_or(cores, |n| n.clamp(1, cores))
}

// =============================================================================
// Loading
// =============================================================================

/// [`SiteConfig::default`] as a TOML table.
pub fn defaults_table() -> Result<toml::Table, ConfigError> {
    match toml::Value::try_from(SiteConfig::default())? {
        toml::Value::Table(table) => Ok(table),
        other => Err(ConfigError::Validation(format!(
            "default settings serialized to a {}, not a table",
            other.type_str()
        ))),
    }
}

/// Lay `top` over `base`. Nested tables combine key by key; any other value
/// in `top` replaces what `base` had, arrays included.
pub fn overlay(base: &mut toml::Table, top: toml::Table) {
    for (key, value) in top {
        let combined = match (base.remove(&key), value) {
            (Some(toml::Value::Table(mut below)), toml::Value::Table(above)) => {
                overlay(&mut below, above);
                toml::Value::Table(below)
            }
            (_, value) => value,
        };
        base.insert(key, combined);
    }
}

/// The parsed `config.toml` of `root`, or `None` when there is none.
fn read_overrides(root: &Path) -> Result<Option<toml::Table>, ConfigError> {
    match fs::read_to_string(root.join(CONFIG_FILE)) {
        Ok(text) => Ok(Some(toml::from_str(&text)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Defaults with `overrides` laid on top, deserialized and validated.
pub fn config_with_overrides(overrides: Option<toml::Table>) -> Result<SiteConfig, ConfigError> {
    let mut table = defaults_table()?;
    if let Some(overrides) = overrides {
        overlay(&mut table, overrides);
    }
    let config: SiteConfig = toml::Value::Table(table).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Settings for the content directory at `root`.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let overrides = read_overrides(root)?;
    if overrides.is_none() {
        tracing::debug!(root = %root.display(), "no config.toml; using defaults");
    }
    config_with_overrides(overrides)
}

/// Annotated `config.toml` printed by `gen-config`. Every value is the default.
pub fn stock_config_toml() -> &'static str {
    r##"# sheetfolio settings
#
# Put this file next to projects.json. Every key is optional and the values
# below are the defaults, so delete whatever you do not change.
# Misspelled keys are reported as errors.

[site]
title = "Portfolio"
description = "Selected projects"
# Where the site is served from. sitemap.xml and og:url are built on it.
base_url = "https://example.com"
# Social card image, relative to the site root.
# og_image = "/og.png"
# favicon = "/favicon.svg"

# Flat palette written as --color-<name> custom properties.
[palette]
page = "#f5f5f5"
card = "#ffffff"
rule = "#e2e8f0"
text = "#000000"
muted = "#000000"

# Any CSS length or expression.
[theme]
grid_gap = "1.5rem"
sheet_max_width = "1400px"
page_padding = "clamp(1rem, 4vw, 3rem)"

[sheet]
# [width, height] for media without a recorded aspect ratio.
# `sheetfolio enrich` records the real ones in projects.json.
fallback_aspect_ratio = [4, 3]

[processing]
# Parallel workers for `enrich`. Unset means one per CPU core.
# max_processes = 4
"##
}

/// `:root` custom properties for the palette, one `--color-<name>` each.
pub fn palette_css(palette: &Palette) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in palette.tokens() {
        css.push_str(&format!("    --color-{name}: {value};\n"));
    }
    css.push('}');
    css
}

/// `:root` custom properties for spacing and the sheet fallback aspect.
pub fn layout_css(theme: &ThemeConfig, sheet: &SheetConfig) -> String {
    let [w, h] = sheet.fallback_aspect_ratio;
    format!(
        ":root {{\n    --grid-gap: {};\n    --page-padding: {};\n    --sheet-max-width: {};\n    --sheet-fallback-aspect: {w} / {h};\n}}",
        theme.grid_gap, theme.page_padding, theme.sheet_max_width,
    )
}
