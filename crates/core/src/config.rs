use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Raw TOML configuration structure
/// This matches the routes.toml file structure exactly
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    build: Option<RawBuild>,
    #[serde(default)]
    route: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSite {
    url: String,
    name: Option<String>,
    default_image: String,
    twitter_handle: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuild {
    input: Option<String>,  // Convert to PathBuf
    output: Option<String>, // Convert to PathBuf
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRoute {
    path: String,
    title: String,
    description: String,
    image: Option<String>,
}

/// Parse routes.toml from a file path
pub fn parse_routes_toml<P: AsRef<Path>>(path: P) -> Result<Project> {
    let content = fs::read_to_string(path)?;
    parse_routes_toml_str(&content)
}

/// Parse routes.toml from a string (useful for testing)
pub fn parse_routes_toml_str(content: &str) -> Result<Project> {
    let raw: RawConfig = toml::from_str(content)?;

    let site = convert_site(raw.site)?;
    let build = convert_build(raw.build)?;

    let mut seen = HashSet::new();
    let routes: Result<Vec<RouteMeta>> = raw
        .route
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let field = format!("route[{}]", i);
            validate_route_path(&r.path, &format!("{}.path", field))?;

            // "/about" and "/about/" land in the same directory
            if !seen.insert(r.path.trim_end_matches('/').to_string()) {
                return Err(Error::ConfigParse(format!(
                    "Duplicate route path in '{}.path': '{}'",
                    field, r.path
                )));
            }

            require_text(&r.title, &format!("{}.title", field))?;
            require_text(&r.description, &format!("{}.description", field))?;
            if let Some(image) = &r.image {
                require_text(image, &format!("{}.image", field))?;
            }

            Ok(RouteMeta {
                path: r.path,
                title: r.title,
                description: r.description,
                image: r.image,
            })
        })
        .collect();
    let routes = routes?;

    debug!(site = %site.url, routes = routes.len(), "parsed route table");

    Ok(Project {
        site,
        build,
        routes,
    })
}

fn convert_site(raw: RawSite) -> Result<SiteConfig> {
    let parsed = url::Url::parse(&raw.url)
        .map_err(|e| Error::ConfigParse(format!("Invalid site.url '{}': {}", raw.url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return Err(Error::ConfigParse(format!(
            "site.url must be an absolute http(s) URL: '{}'",
            raw.url
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::ConfigParse(format!(
            "site.url must not carry a query or fragment: '{}'",
            raw.url
        )));
    }

    require_text(&raw.default_image, "site.default_image")?;

    let mut site = SiteConfig::new(raw.url, raw.default_image);
    site.name = raw.name.filter(|n| !n.trim().is_empty());
    site.twitter_handle = raw.twitter_handle.filter(|h| !h.trim().is_empty());
    Ok(site)
}

fn convert_build(raw: Option<RawBuild>) -> Result<BuildConfig> {
    let mut build = BuildConfig::default();
    let Some(raw) = raw else {
        return Ok(build);
    };

    if let Some(input) = raw.input {
        build.input = validate_path(&input, "build.input")?;
    }
    if let Some(output) = raw.output {
        build.output = validate_path(&output, "build.output")?;
    }
    Ok(build)
}

fn require_text(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty value in '{}' field",
            field_name
        )));
    }
    Ok(())
}

/// Validate a route's URL path so it can double as a relative output directory.
///
/// Accepted paths start with `/` and consist of plain segments. Rejected:
/// - the bare root `/` (served by the base document itself)
/// - `.` and `..` segments and empty inner segments (`/a//b`)
/// - backslashes, whitespace, `?` and `#`
///
/// ```text
/// validate_route_path("/about", "route[0].path")          → Ok(())
/// validate_route_path("/models/leaderboard/", "...")      → Ok(())
/// validate_route_path("about", "...")                     → Err("must start with '/'")
/// validate_route_path("/../etc", "...")                   → Err("Parent directory references...")
/// ```
fn validate_route_path(path: &str, field_name: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    if !path.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "Route paths must start with '/' in '{}': '{}'",
            field_name, path
        )));
    }

    if let Some(c) = path
        .chars()
        .find(|c| matches!(c, '\\' | '?' | '#') || c.is_whitespace())
    {
        return Err(Error::ConfigParse(format!(
            "Invalid character {:?} in '{}': '{}'",
            c, field_name, path
        )));
    }

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(Error::ConfigParse(format!(
            "Root route '/' not allowed in '{}': the base document already serves it",
            field_name
        )));
    }

    for segment in trimmed.split('/') {
        match segment {
            "" => {
                return Err(Error::ConfigParse(format!(
                    "Empty path segment in '{}': '{}'",
                    field_name, path
                )));
            }
            ".." => {
                return Err(Error::ConfigParse(format!(
                    "Parent directory references (..) not allowed in '{}': '{}'",
                    field_name, path
                )));
            }
            "." => {
                return Err(Error::ConfigParse(format!(
                    "Current directory references (.) not allowed in '{}': '{}'",
                    field_name, path
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Validate and convert a build path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so the
/// project only reads and writes inside its own directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    Ok(path.to_path_buf())
}
