use anyhow::{Context, Result};
use route_kit_generator::{MaterializeError, Materializer, load_base_document};
use std::path::{Path, PathBuf};

use super::load_project;

/// Write a route-specific index.html for every route in routes.toml
pub async fn run(path: PathBuf, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let project = load_project(&path)?;

    let input = input.unwrap_or_else(|| path.join(&project.build.input));
    let output = output.unwrap_or_else(|| path.join(&project.build.output));

    println!("🔨 Materializing routes...");
    println!("   Site:   {}", project.site.url);
    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    println!();

    let base_html = match load_base_document(&input) {
        Ok(html) => html,
        Err(MaterializeError::MissingBaseDocument(p)) => {
            anyhow::bail!(
                "Base document not found: {}\nBuild the site first so it exists",
                p.display()
            );
        }
        Err(e) => return Err(e).context("Failed to read base document"),
    };

    let materializer =
        Materializer::new(&base_html, &project.site).context("Failed to parse base document")?;

    let written = materializer.materialize_with(&project.routes, &output, |route, file| {
        println!("   ✓ {} → {}", route.path, display_relative(file, &output));
    })?;

    println!();
    println!(
        "✅ Generated {} route(s) in {}",
        written.len(),
        output.display()
    );

    Ok(())
}

fn display_relative(file: &Path, root: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_kit_core::{CONFIG_FILE, INDEX_FILE};
    use std::fs;
    use tempfile::TempDir;

    const ROUTES: &str = r##"
[site]
url = "https://example.com"
default_image = "/og.png"

[[route]]
path = "/about"
title = "About | Site"
description = "Learn about us."
"##;

    const INDEX: &str =
        "<html><head>\n<title>Site</title>\n</head><body><div id=\"root\"></div></body></html>";

    fn project_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), ROUTES).unwrap();
        fs::create_dir_all(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist").join(INDEX_FILE), INDEX).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_build_writes_routes() {
        let dir = project_dir();
        run(dir.path().to_path_buf(), None, None).await.unwrap();

        let html = fs::read_to_string(dir.path().join("dist/about/index.html")).unwrap();
        assert!(html.contains("<title>About | Site</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/about" />"#));
    }

    #[tokio::test]
    async fn test_build_with_overrides() {
        let dir = project_dir();
        let out = dir.path().join("public");
        run(
            dir.path().to_path_buf(),
            Some(dir.path().join("dist").join(INDEX_FILE)),
            Some(out.clone()),
        )
        .await
        .unwrap();

        assert!(out.join("about").join(INDEX_FILE).is_file());
        assert!(!dir.path().join("dist").join("about").exists());
    }

    #[tokio::test]
    async fn test_build_missing_base_document() {
        let dir = project_dir();
        fs::remove_file(dir.path().join("dist").join(INDEX_FILE)).unwrap();

        let err = run(dir.path().to_path_buf(), None, None)
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Base document not found"));
        assert!(!dir.path().join("dist").join("about").exists());
    }

    #[tokio::test]
    async fn test_build_without_config() {
        let dir = TempDir::new().unwrap();
        let err = run(dir.path().to_path_buf(), None, None)
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("routes.toml not found"));
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("dist");
        assert_eq!(
            display_relative(&root.join("about").join("index.html"), root),
            Path::new("about").join("index.html").display().to_string()
        );
    }
}
