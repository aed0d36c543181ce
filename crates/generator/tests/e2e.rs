//! End-to-end tests: routes.toml + built index.html → route shells.

use std::fs;
use std::path::Path;

use route_kit_core::{CONFIG_FILE, INDEX_FILE, Project, parse_routes_toml};
use route_kit_generator::{MaterializeError, load_base_document, materialize_routes};
use tempfile::TempDir;

const ROUTES: &str = r##"
[site]
url = "https://whatsgoingonai.com"
name = "WhatsGoingOnAI"
default_image = "/og-image.png"
twitter_handle = "@whatsgoingonai"

[[route]]
path = "/about"
title = "About | WhatsGoingOnAI"
description = "Who we are and why we track AI news."

[[route]]
path = "/models"
title = "Model Leaderboard | WhatsGoingOnAI"
description = "Open model rankings, refreshed daily."
image = "/og/models.png"

[[route]]
path = "/mcp/registry"
title = "MCP Registry | WhatsGoingOnAI"
description = "Browse Model Context Protocol servers."
"##;

const INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>WhatsGoingOnAI - AI News</title>
    <meta name="description" content="Your daily AI news digest." />
    <meta property="og:type" content="website" />
    <meta property="og:url" content="https://whatsgoingonai.com/" />
    <meta property="og:title" content="WhatsGoingOnAI - AI News" />
    <meta property="og:description" content="Your daily AI news digest." />
    <meta property="og:image" content="https://whatsgoingonai.com/og-image.png" />
    <meta name="twitter:card" content="summary_large_image" />
    <meta name="twitter:title" content="WhatsGoingOnAI - AI News" />
    <link rel="canonical" href="https://whatsgoingonai.com/" />
    <script type="module" crossorigin src="/assets/index-4f2a.js"></script>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

fn setup() -> (TempDir, Project) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), ROUTES).unwrap();
    fs::create_dir_all(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist").join(INDEX_FILE), INDEX).unwrap();
    let project = parse_routes_toml(dir.path().join(CONFIG_FILE)).unwrap();
    (dir, project)
}

fn build(root: &Path, project: &Project) -> Vec<std::path::PathBuf> {
    let base = load_base_document(&root.join(&project.build.input)).unwrap();
    materialize_routes(
        &base,
        &project.routes,
        &root.join(&project.build.output),
        &project.site,
    )
    .unwrap()
}

#[test]
fn test_every_route_gets_its_own_title() {
    let (dir, project) = setup();
    build(dir.path(), &project);

    for route in &project.routes {
        let file = route.output_file(&dir.path().join("dist"));
        let html = fs::read_to_string(&file).unwrap();

        assert_eq!(html.matches("<title>").count(), 1, "{}", route.path);
        assert!(html.contains(&format!("<title>{}</title>", route.title)));
        assert!(!html.contains("WhatsGoingOnAI - AI News"));
        assert!(!html.contains("Your daily AI news digest."));
    }
}

#[test]
fn test_og_url_is_site_url_plus_path() {
    let (dir, project) = setup();
    build(dir.path(), &project);

    for route in &project.routes {
        let html = fs::read_to_string(route.output_file(&dir.path().join("dist"))).unwrap();
        let expected = format!(
            r#"<meta property="og:url" content="https://whatsgoingonai.com{}" />"#,
            route.path
        );
        assert!(html.contains(&expected), "{}", route.path);
        assert_eq!(html.matches(r#"property="og:url""#).count(), 1);
    }
}

#[test]
fn test_default_and_route_images() {
    let (dir, project) = setup();
    build(dir.path(), &project);

    let about = fs::read_to_string(dir.path().join("dist/about/index.html")).unwrap();
    assert!(about.contains(
        r#"<meta property="og:image" content="https://whatsgoingonai.com/og-image.png" />"#
    ));

    let models = fs::read_to_string(dir.path().join("dist/models/index.html")).unwrap();
    assert!(models.contains(
        r#"<meta property="og:image" content="https://whatsgoingonai.com/og/models.png" />"#
    ));
    assert!(models.contains(r#"<meta name="twitter:site" content="@whatsgoingonai" />"#));
}

#[test]
fn test_base_document_is_not_modified() {
    let (dir, project) = setup();
    build(dir.path(), &project);

    let index = fs::read_to_string(dir.path().join("dist").join(INDEX_FILE)).unwrap();
    assert_eq!(index, INDEX);
}

#[test]
fn test_materialize_is_idempotent() {
    let (dir, project) = setup();
    let first: Vec<String> = build(dir.path(), &project)
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    let second: Vec<String> = build(dir.path(), &project)
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_nested_route_directory() {
    let (dir, project) = setup();
    let written = build(dir.path(), &project);

    assert_eq!(
        written[2],
        dir.path()
            .join("dist")
            .join("mcp")
            .join("registry")
            .join("index.html")
    );
    assert!(written[2].is_file());
}

#[test]
fn test_missing_base_document() {
    let (dir, project) = setup();
    fs::remove_file(dir.path().join("dist").join(INDEX_FILE)).unwrap();

    let result = load_base_document(&dir.path().join(&project.build.input));
    assert!(matches!(
        result,
        Err(MaterializeError::MissingBaseDocument(_))
    ));
    assert!(!dir.path().join("dist").join("about").exists());
}
