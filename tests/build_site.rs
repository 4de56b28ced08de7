//! End-to-end: enrich a content directory, load it and build the site.

use sheetfolio::content::load_site;
use sheetfolio::generate::generate;
use sheetfolio::probe::enrich_file;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PROJECTS: &str = r#"{
  "projects": [
    {
      "title": "Paper Trail",
      "description": "Editorial series.",
      "detailText": "*Client* Paper Co *Role* Art direction, Layout",
      "cover": "/work/paper/cover.png",
      "sheetGallery": [
        { "type": "image", "src": "/work/paper/lead.png", "alt": "Lead" },
        { "type": "image", "src": "/work/paper/2_25_B.png" },
        { "type": "image", "src": "/work/paper/2_75_A.png" },
        { "type": "image", "src": "/work/paper/missing.png" }
      ]
    }
  ],
  "generatedBy": "hand"
}
"#;

fn write_png(public: &Path, rel: &str, width: u32, height: u32) {
    let path = public.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 200, 200]))
        .save(&path)
        .unwrap();
}

fn content_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("projects.json"), PROJECTS).unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[site]\ntitle = \"Paper Studio\"\nbase_url = \"https://paper.example\"\n",
    )
    .unwrap();
    let public = tmp.path().join("public");
    write_png(&public, "work/paper/cover.png", 8, 8);
    write_png(&public, "work/paper/lead.png", 20, 10);
    write_png(&public, "work/paper/2_25_B.png", 10, 10);
    write_png(&public, "work/paper/2_75_A.png", 30, 10);
    tmp
}

#[test]
fn enrich_records_aspect_ratios() {
    let tmp = content_dir();
    let projects_json = tmp.path().join("projects.json");

    let report = enrich_file(&projects_json, &tmp.path().join("public")).unwrap();
    assert_eq!(report.projects, 1);
    assert_eq!(report.updated, 3);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].0.ends_with("missing.png"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&projects_json).unwrap()).unwrap();
    let gallery = &written["projects"][0]["sheetGallery"];
    assert_eq!(gallery[0]["aspectRatio"], 2.0);
    assert_eq!(gallery[2]["aspectRatio"], 3.0);
    assert!(gallery[3].get("aspectRatio").is_none());
    // Keys the loader does not model survive the rewrite
    assert_eq!(written["generatedBy"], "hand");
}

#[test]
fn build_after_enrich_uses_measured_aspects() {
    let tmp = content_dir();
    enrich_file(&tmp.path().join("projects.json"), &tmp.path().join("public")).unwrap();

    let site = load_site(tmp.path()).unwrap();
    let out = TempDir::new().unwrap();
    let summary = generate(&site, tmp.path(), out.path()).unwrap();

    assert_eq!(summary.copied_files, 4);
    assert!(out.path().join("work/paper/lead.png").exists());

    let page = fs::read_to_string(out.path().join("project/paper-trail/index.html")).unwrap();
    assert!(page.contains("<title>(01) - Paper Studio</title>"));
    assert!(page.contains("--sheet-asset-width: 100; --sheet-asset-aspect: 2;"));
    assert!(page.contains("--sheet-asset-width: 75; --sheet-asset-aspect: 3;"));
    assert!(page.contains("--sheet-asset-width: 25; --sheet-asset-aspect: 1;"));
    // The unprobed asset falls back to the configured 4:3
    assert!(page.contains("--sheet-asset-aspect: 1.3333;"));
    assert!(page.contains("Art direction,\nLayout"));

    let sitemap = fs::read_to_string(out.path().join("sitemap.xml")).unwrap();
    assert!(sitemap.contains("<loc>https://paper.example/project/paper-trail</loc>"));
}

#[test]
fn build_without_projects_file_fails() {
    let tmp = TempDir::new().unwrap();
    assert!(load_site(tmp.path()).is_err());
}
