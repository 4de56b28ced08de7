//! Content loading and project normalization.
//!
//! A content directory looks like this:
//!
//! ```text
//! content/
//! ├── projects.json      # {"projects": [...]}  (required)
//! ├── about.md           # About section on the index page (optional)
//! ├── config.toml        # Site configuration (optional)
//! └── public/            # Media, copied verbatim into the output root
//!     └── projects/harbour/3_40_B.jpg
//! ```
//!
//! `projects.json` is hand-authored, so almost every field is optional.
//! [`normalize_project`] fills the gaps the same way for every caller:
//!
//! | Field | Fallback |
//! |-------|----------|
//! | `slug` | slugified `title`, else `project-{n}` |
//! | `title` | titleized slug |
//! | `label` | `(01)`, `(02)`, … |
//! | `cover` | `src` of the first item typed `image`, else first poster |
//! | `type` | `video` when the gallery holds a video |
//! | `alt` | `"{title} asset"` |
//! | `sheetTitle` | `title` |
//! | `id` | slug |
//!
//! Empty strings count as missing throughout.

use crate::config::{self, SiteConfig};
use crate::naming::{slugify, titleize};
use crate::types::{Asset, DetailSection, Fact, MediaKind, Project};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid projects.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("projects.json not found in {0}")]
    MissingProjects(std::path::PathBuf),
}

/// `projects.json` as authored.
///
/// Unknown keys are kept in `extra` so that tools which rewrite the file
/// (see [`crate::probe`]) leave them alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub projects: Vec<RawProject>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One project entry before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sheet_gallery: Vec<Asset>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Markdown shown in the index page's about section.
#[derive(Debug, Clone, Serialize)]
pub struct AboutPage {
    /// First `# heading`, or "About".
    pub title: String,
    pub body: String,
}

/// Everything the renderer needs, loaded from one content directory.
#[derive(Debug, Serialize)]
pub struct Site {
    pub projects: Vec<Project>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutPage>,
    pub config: SiteConfig,
}

pub fn load_site(root: &Path) -> Result<Site, ContentError> {
    let projects_path = root.join("projects.json");
    if !projects_path.is_file() {
        return Err(ContentError::MissingProjects(root.to_path_buf()));
    }
    let projects = parse_projects(&fs::read_to_string(&projects_path)?)?;
    let about = load_about(root)?;
    let config = config::load_config(root)?;

    tracing::debug!(count = projects.len(), root = %root.display(), "loaded projects");

    Ok(Site {
        projects,
        about,
        config,
    })
}

fn load_about(root: &Path) -> Result<Option<AboutPage>, ContentError> {
    let path = root.join("about.md");
    if !path.exists() {
        return Ok(None);
    }
    let body = fs::read_to_string(&path)?;
    let title = body
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| "About".to_string());
    Ok(Some(AboutPage { title, body }))
}

/// Parse and normalize the contents of `projects.json`.
pub fn parse_projects(json: &str) -> Result<Vec<Project>, ContentError> {
    let file: ContentFile = serde_json::from_str(json)?;
    Ok(file
        .projects
        .into_iter()
        .enumerate()
        .map(|(index, raw)| normalize_project(raw, index))
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Fill in every derived field of a project. `index` is its zero-based
/// position in `projects.json`.
pub fn normalize_project(raw: RawProject, index: usize) -> Project {
    let number = index + 1;
    let title_field = non_empty(raw.title);
    let fallback_slug = match &title_field {
        Some(title) => slugify(title),
        None => format!("project-{number}"),
    };
    let slug = non_empty(raw.slug)
        .map(|s| slugify(&s))
        .unwrap_or(fallback_slug);
    let title = title_field.unwrap_or_else(|| titleize(&slug));
    let label = non_empty(raw.label).unwrap_or_else(|| format!("({number:02})"));

    let cover = non_empty(raw.cover)
        .or_else(|| {
            raw.gallery
                .iter()
                .find(|a| a.kind == Some(MediaKind::Image))
                .and_then(|a| a.src.clone())
                .filter(|s| !s.is_empty())
        })
        .or_else(|| {
            raw.gallery
                .iter()
                .filter_map(|a| a.poster.clone())
                .find(|p| !p.is_empty())
        })
        .unwrap_or_default();

    let kind = raw.kind.unwrap_or_else(|| {
        if raw.gallery.iter().any(Asset::is_video) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    });

    let detail_text = raw.detail_text.unwrap_or_default();
    let detail_sections = parse_detail_sections(&detail_text);

    Project {
        id: non_empty(raw.id).unwrap_or_else(|| slug.clone()),
        alt: non_empty(raw.alt).unwrap_or_else(|| format!("{title} asset")),
        sheet_title: non_empty(raw.sheet_title).unwrap_or_else(|| title.clone()),
        description: raw.description.unwrap_or_default(),
        slug,
        label,
        title,
        kind,
        cover,
        tags: raw.tags,
        facts: raw.facts,
        details: raw.details,
        detail_text,
        detail_sections,
        gallery: raw.gallery,
        sheet_gallery: raw.sheet_gallery,
        span: raw.span,
    }
}

/// Split `*Label* value *Label* value` markup into sections.
///
/// Text before the first `*` is ignored, as are sections whose label is
/// blank.
pub fn parse_detail_sections(input: &str) -> Vec<DetailSection> {
    if !input.contains('*') {
        return Vec::new();
    }
    let tokens: Vec<&str> = input.split('*').collect();
    tokens
        .iter()
        .enumerate()
        .skip(1)
        .step_by(2)
        .filter_map(|(i, label)| {
            let label = label.trim();
            if label.is_empty() {
                return None;
            }
            let value = tokens.get(i + 1).map(|v| v.trim()).unwrap_or_default();
            Some(DetailSection {
                label: label.to_string(),
                value: format_detail_value(value),
            })
        })
        .collect()
}

/// Break comma-separated lists onto separate lines.
pub fn format_detail_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == ',' {
            while chars.next_if(|next| next.is_whitespace()).is_some() {}
            out.push('\n');
        }
    }
    out.trim().to_string()
}

pub fn find_project<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.id == id)
}
