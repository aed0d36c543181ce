use anyhow::{Context, Result};
use route_kit_core::CONFIG_FILE;
use std::fs;
use std::path::{Path, PathBuf};

/// Escape a string for safe inclusion in a TOML basic string
///
/// The starter file is a commented template, so it is formatted by hand
/// rather than serialized.
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Site name guessed from the project directory ("my-site" → "My Site")
fn site_name_from_dir(path: &Path) -> String {
    let dir_name = path
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let words: Vec<String> = dir_name
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "My Site".to_string()
    } else {
        words.join(" ")
    }
}

fn starter_config(site_name: &str) -> String {
    let name = toml_escape_string(site_name);
    format!(
        r##"# route-kit configuration
#
# `route-kit build` reads the built index.html and writes
# <output>/<path>/index.html for every [[route]] below, each with its own
# title, description, canonical link, Open Graph and Twitter Card tags.

[site]
# Absolute URL of the deployed site (no trailing slash needed)
url = "https://example.com"
name = "{name}"
# Preview image for routes without their own `image`
default_image = "/og-image.png"
# twitter_handle = "@example"

[build]
# Relative to this directory
input = "dist/index.html"
output = "dist"

[[route]]
path = "/about"
title = "About | {name}"
description = "What {name} is about."

# [[route]]
# path = "/blog"
# title = "Blog | {name}"
# description = "Latest posts."
# image = "/og/blog.png"
"##
    )
}

/// Create a starter routes.toml in `path`.
///
/// Refuses to overwrite an existing configuration.
pub async fn run(path: PathBuf) -> Result<()> {
    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create directory {}", path.display()))?;

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{} already exists in {}", CONFIG_FILE, path.display());
    }

    let site_name = site_name_from_dir(&path);
    fs::write(&config_path, starter_config(&site_name))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("✓ Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("   1. Set site.url and add your routes in {}", CONFIG_FILE);
    println!("   2. Build your site so dist/index.html exists");
    println!("   3. route-kit build {}", path.display());

    Ok(())
}
