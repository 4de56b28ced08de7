//! HTML site generation.
//!
//! Takes a loaded [`Site`] and writes the final static site.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): header, project grid, about section
//! - **Project pages** (`/project/{id}/index.html`): the project sheet, with
//!   gallery rows laid out by [`crate::sheet`]
//! - **Sitemap** (`/sitemap.xml`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── sitemap.xml
//! ├── project/
//! │   ├── harbour-lights/index.html
//! │   └── field-notes/index.html
//! └── projects/...          # copied verbatim from content/public/
//! ```
//!
//! ## Sheet Rows
//!
//! Each row is a flex container. The row carries its gap as
//! `--sheet-row-gap` and the total gap as `--sheet-row-gap-total`; each
//! figure carries its share as `--sheet-asset-width` (a bare percentage)
//! and its aspect ratio as `--sheet-asset-aspect`. The stylesheet turns
//! these into `calc((100% - gap-total) * width / 100)`, so widths summing
//! to 100 always fill the row exactly.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, SiteConfig, SiteMeta};
use crate::content::{AboutPage, Site};
use crate::sheet::{SheetRow, build_sheet_rows, clamp_percentage};
use crate::types::{Asset, MediaKind, Project};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What a build wrote.
#[derive(Debug, Default, Serialize)]
pub struct GenerateSummary {
    /// Output-relative paths of generated pages, in write order.
    pub pages: Vec<String>,
    /// Files copied from `public/`.
    pub copied_files: usize,
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Images preloaded on a project page.
const MAX_PRELOAD: usize = 6;

/// Card placement on the index grid, repeated every nine cards.
///
/// `(row_start, row_end, col_start, col_end)` on a 9-column grid.
const GRID_PATTERN: [(u32, u32, u32, u32); 9] = [
    (1, 2, 1, 4),
    (1, 2, 4, 7),
    (2, 4, 3, 6),
    (2, 3, 7, 9),
    (4, 5, 1, 3),
    (4, 5, 3, 6),
    (4, 5, 7, 9),
    (5, 6, 1, 4),
    (5, 7, 4, 7),
];
/// Grid rows one repetition of [`GRID_PATTERN`] occupies.
const GRID_ROW_INCREMENT: u32 = 6;
const MARGIN_VARIANTS: [&str; 5] = [
    "mt-variant-1",
    "mt-variant-2",
    "mt-variant-3",
    "mt-variant-4",
    "",
];

const CLOSE_ICON: &str = "M24 3.32784L15.3278 12L24 20.6722L20.6722 24L12 15.3278L3.32784 24L0 20.6722L8.67216 12L0 3.32784L3.32784 0L12 8.67216L20.6722 0L24 3.32784Z";

pub fn generate(
    site: &Site,
    source_root: &Path,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let mut summary = GenerateSummary::default();
    let css = build_css(&site.config);

    fs::create_dir_all(output_dir)?;

    let public_dir = source_root.join("public");
    if public_dir.is_dir() {
        summary.copied_files = copy_public(&public_dir, output_dir)?;
    }

    let index_html = render_index(site, &css);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;
    summary.pages.push("index.html".to_string());

    let mut seen = HashSet::new();
    for project in &site.projects {
        if !seen.insert(project.id.as_str()) {
            tracing::warn!(id = %project.id, "duplicate project id; later project overwrites page");
        }
        let page_dir = output_dir.join("project").join(&project.id);
        fs::create_dir_all(&page_dir)?;
        let page = render_project_page(project, &site.config, &css);
        fs::write(page_dir.join("index.html"), page.into_string())?;
        summary.pages.push(format!("project/{}/index.html", project.id));
    }

    fs::write(
        output_dir.join("sitemap.xml"),
        render_sitemap(&site.config.site, &site.projects),
    )?;
    summary.pages.push("sitemap.xml".to_string());

    Ok(summary)
}

fn build_css(config: &SiteConfig) -> String {
    let palette_css = config::palette_css(&config.palette);
    let layout_css = config::layout_css(&config.theme, &config.sheet);
    format!("{}\n\n{}\n\n{}", palette_css, layout_css, CSS_STATIC)
}

/// Copy `public/` into the output root, preserving structure. Returns the
/// number of files copied.
fn copy_public(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// Formatting helpers
// ============================================================================

/// Compact decimal for CSS: at most four places, no trailing zeros.
fn css_number(value: f64) -> String {
    let fixed = format!("{value:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Where a project card sits on the index grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPlacement {
    /// CSS `grid-area` value: `row-start / col-start / row-end / col-end`.
    pub grid_area: String,
    pub margin_class: &'static str,
}

pub fn card_placement(index: usize) -> CardPlacement {
    let (row_start, row_end, col_start, col_end) = GRID_PATTERN[index % GRID_PATTERN.len()];
    let block = (index / GRID_PATTERN.len()) as u32;
    let shift = block * GRID_ROW_INCREMENT;
    let margin_class = if index < 2 {
        MARGIN_VARIANTS[0]
    } else {
        MARGIN_VARIANTS[(index * 7) % MARGIN_VARIANTS.len()]
    };
    CardPlacement {
        grid_area: format!(
            "{} / {} / {} / {}",
            row_start + shift,
            col_start,
            row_end + shift,
            col_end
        ),
        margin_class,
    }
}

/// Split `text (https://url)` into its label and URL.
///
/// The URL must be the last thing in the value (trailing whitespace aside)
/// and the label must sit on a single line. An empty label falls back to
/// the URL itself.
pub fn split_trailing_link(value: &str) -> Option<(String, &str)> {
    let body = value.trim_end().strip_suffix(')')?;
    let open = body.rfind('(')?;
    let (text, url) = (&body[..open], &body[open + 1..]);
    let scheme_len = if url.starts_with("https:") {
        "https:".len()
    } else if url.starts_with("http:") {
        "http:".len()
    } else {
        return None;
    };
    if url.len() <= scheme_len || text.contains(['\n', '\r']) {
        return None;
    }
    let label = text.trim();
    let label = if label.is_empty() { url } else { label };
    Some((label.to_string(), url))
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// About body without the `# heading` already shown as the section label.
fn about_body(about: &AboutPage) -> String {
    let mut skipped = false;
    about
        .body
        .lines()
        .filter(|line| {
            if !skipped && line.starts_with("# ") {
                skipped = true;
                return false;
            }
            true
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// HTML Components
// ============================================================================

/// Per-page values for `<head>`.
struct PageMeta<'a> {
    title: &'a str,
    description: &'a str,
    /// Path of the page relative to the site root.
    path: &'a str,
}

/// Renders the base HTML document structure
fn base_document(
    page: &PageMeta,
    site: &SiteMeta,
    css: &str,
    head_extra: Markup,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    let url = site.absolute_url(page.path);
    let image = site.og_image.as_deref().map(|img| site.absolute_url(img));
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page.title) }
                meta name="description" content=(page.description);
                link rel="canonical" href=(url);
                @if let Some(icon) = &site.favicon {
                    link rel="icon" href=(icon);
                }
                meta property="og:type" content="website";
                meta property="og:site_name" content=(site.title);
                meta property="og:title" content=(page.title);
                meta property="og:description" content=(page.description);
                meta property="og:url" content=(url);
                @if let Some(image) = &image {
                    meta property="og:image" content=(image);
                }
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(page.title);
                meta name="twitter:description" content=(page.description);
                @if let Some(image) = &image {
                    meta name="twitter:image" content=(image);
                }
                (head_extra)
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the site header with title, tagline and section links
fn site_header(site: &SiteMeta, has_about: bool) -> Markup {
    html! {
        header.menu-bar {
            a.menu-bar__logo href="/" aria-label={ (site.title) " home" } { (site.title) }
            p.menu-bar__tagline { (site.description) }
            nav.menu-bar__links {
                a.text-link href="/#projects" {
                    span.text-link__label { "Work" }
                }
                @if has_about {
                    a.text-link href="/#about" {
                        span.text-link__label { "About" }
                    }
                }
            }
        }
    }
}

fn external_link(label: &str, url: &str) -> Markup {
    html! {
        a.text-link.text-link--arrow href=(url) target="_blank" rel="noopener noreferrer" {
            span.text-link__label { (label) }
            span.text-link__arrow { "↗" }
        }
    }
}

/// A detail value, with a trailing `(http…)` turned into a link.
fn render_detail_value(value: &str) -> Markup {
    match split_trailing_link(value) {
        Some((label, url)) => external_link(&label, url),
        None => html! { (value) },
    }
}

fn project_card(project: &Project, index: usize) -> Markup {
    let placement = card_placement(index);
    let class = format!("project-card {}", placement.margin_class);
    html! {
        a class=(class.trim_end()) href={ "/project/" (project.id) "/" }
            style={ "grid-area: " (placement.grid_area) ";" } {
            div.overview {
                @if project.cover.is_empty() {
                    div.overview__placeholder {}
                } @else if project.kind == MediaKind::Video || project.cover_is_video() {
                    video src=(project.cover) autoplay muted loop playsinline {}
                } @else {
                    img src=(project.cover) alt=(project.alt) loading="lazy";
                }
            }
            div.project-card__meta {
                span.project-card__number { (project.label) }
                p.project-card__title { (project.title) }
            }
        }
    }
}

fn about_section(about: &AboutPage) -> Markup {
    html! {
        section.about-grid id="about" {
            div.about-grid__column.about-grid__bio {
                p.about-grid__eyebrow { (about.title) }
                (PreEscaped(markdown_to_html(&about_body(about))))
            }
        }
    }
}

fn sheet_asset(asset: &Asset, width: f64, aspect: f64) -> Markup {
    let style = format!(
        "--sheet-asset-width: {}; --sheet-asset-aspect: {};",
        css_number(width),
        css_number(aspect)
    );
    html! {
        figure.project-sheet__figure style=(style) {
            @if asset.is_video() {
                (sheet_video(asset))
            } @else {
                img src=(asset.src.as_deref().unwrap_or_default())
                    alt=(asset.alt.as_deref().unwrap_or_default())
                    loading="lazy" decoding="async";
            }
        }
    }
}

fn sheet_video(asset: &Asset) -> Markup {
    let autoplay = asset.autoplay.unwrap_or(false);
    let looping = autoplay || asset.looping.unwrap_or(false);
    let muted = autoplay || asset.muted.unwrap_or(false);
    let controls = asset.controls.unwrap_or(!autoplay);
    let fallback_src = asset.src.as_deref().filter(|s| !s.is_empty());
    html! {
        video poster=[asset.poster.as_deref()]
            autoplay[autoplay] loop[looping] muted[muted] controls[controls]
            playsinline preload=(asset.preload.as_deref().unwrap_or("auto")) {
            @for source in asset.sources.iter().filter(|s| !s.src.is_empty()) {
                source src=(source.src) type=[source.mime.as_deref()];
            }
            @if asset.first_source().is_none() {
                @if let Some(src) = fallback_src {
                    source src=(src);
                }
            }
        }
    }
}

fn sheet_row(row: &SheetRow<'_>, fallback_aspect: f64) -> Markup {
    let columns = row.columns.max(row.assets.len()).max(1);
    let gap = if row.gap.is_finite() { row.gap } else { 0.0 };
    let gap_total = gap * (columns - 1) as f64;
    let style = format!(
        "--sheet-row-gap: {}px; --sheet-row-gap-total: {}px;",
        css_number(gap),
        css_number(gap_total)
    );
    let even = 100.0 / columns as f64;
    html! {
        div.project-sheet__row data-columns=(columns) style=(style) {
            @for (i, asset) in row.assets.iter().enumerate() {
                @let width = row.widths.get(i).copied().and_then(clamp_percentage).unwrap_or(even);
                @let aspect = asset
                    .aspect_ratio
                    .or_else(|| asset.layout.as_ref().and_then(|l| l.aspect_ratio))
                    .filter(|a| a.is_finite() && *a > 0.0)
                    .unwrap_or(fallback_aspect);
                (sheet_asset(asset, width, aspect))
            }
        }
    }
}

/// The sheet body: meta header, detail grid, gallery rows.
fn sheet_content(project: &Project, assets: &[Asset], fallback_aspect: f64) -> Markup {
    let rows = build_sheet_rows(assets);
    let heading = if project.description.is_empty() {
        project.sheet_title.as_str()
    } else {
        project.description.as_str()
    };
    html! {
        div.project-sheet__content {
            div.project-sheet__meta {
                div.project-sheet__header {
                    p.project-sheet__project-id { (project.label) }
                    h1.project-sheet__title { (heading) }
                }
                dl.project-sheet__detail-grid {
                    @for section in &project.detail_sections {
                        div.contents {
                            dt { (section.label) }
                            dd { (render_detail_value(&section.value)) }
                        }
                    }
                    @for fact in &project.facts {
                        div.contents {
                            dt { (fact.label) }
                            dd { (render_detail_value(&fact.value)) }
                        }
                    }
                }
            }
            div.project-sheet__gallery {
                @if rows.is_empty() {
                    p.project-sheet__empty { "More imagery coming soon." }
                }
                @for row in &rows {
                    (sheet_row(row, fallback_aspect))
                }
            }
        }
    }
}

/// First image URLs worth preloading.
fn preload_urls(assets: &[Asset]) -> Vec<&str> {
    assets
        .iter()
        .filter(|a| !a.is_video())
        .filter_map(|a| a.src.as_deref().filter(|s| !s.is_empty()))
        .take(MAX_PRELOAD)
        .collect()
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page with project grid and about section
fn render_index(site: &Site, css: &str) -> Markup {
    let meta = &site.config.site;
    let page = PageMeta {
        title: &meta.title,
        description: &meta.description,
        path: "/",
    };
    let content = html! {
        div id="top" {}
        (site_header(meta, site.about.is_some()))
        main.index-page {
            div.gallery-grid id="projects" {
                @for (index, project) in site.projects.iter().enumerate() {
                    (project_card(project, index))
                }
            }
            @if let Some(about) = &site.about {
                (about_section(about))
            }
        }
    };
    base_document(&page, meta, css, html! {}, None, content)
}

/// Renders a standalone project sheet page
fn render_project_page(project: &Project, config: &SiteConfig, css: &str) -> Markup {
    let assets = project.decorated_sheet_assets();
    let title = format!("{} - {}", project.label, config.site.title);
    let description = if project.description.is_empty() {
        project.sheet_title.as_str()
    } else {
        project.description.as_str()
    };
    let path = format!("/project/{}", project.id);
    let page = PageMeta {
        title: &title,
        description,
        path: &path,
    };

    let head_extra = html! {
        @for url in preload_urls(&assets) {
            link rel="preload" as="image" href=(url);
        }
    };

    let content = html! {
        div.project-sheet__panel.project-sheet__panel--standalone {
            a.project-sheet__close href="/" aria-label="Back to projects" {
                svg width="16" height="16" viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg" {
                    path d=(CLOSE_ICON) fill="currentColor" {}
                }
            }
            (sheet_content(project, &assets, config.sheet.fallback_aspect()))
        }
    };

    base_document(&page, &config.site, css, head_extra, Some("project-page"), content)
}

/// Renders `sitemap.xml`: the site root plus one entry per project.
pub fn render_sitemap(site: &SiteMeta, projects: &[Project]) -> String {
    let mut entries = vec![(site.absolute_url("/"), "1.0")];
    entries.extend(
        projects
            .iter()
            .map(|p| (site.absolute_url(&format!("/project/{}", p.id)), "0.8")),
    );

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for (loc, priority) in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&loc)));
        xml.push_str("    <changefreq>monthly</changefreq>\n");
        xml.push_str(&format!("    <priority>{priority}</priority>\n"));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

// ============================================================================
// Tests
// ============================================================================
