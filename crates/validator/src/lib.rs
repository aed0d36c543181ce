//! Pre-flight checks for a route-kit project.
//!
//! Nothing here touches the output beyond checking that referenced images
//! exist; the build itself never consults this report.

use std::collections::HashMap;
use std::path::Path;

use route_kit_core::{Project, RouteMeta, is_absolute_url};
use route_kit_generator::{BaseDocument, MaterializeError};
use tracing::debug;

/// Search engines truncate titles beyond this many characters
pub const MAX_TITLE_LEN: usize = 60;

/// Search engines truncate descriptions beyond this many characters
pub const MAX_DESCRIPTION_LEN: usize = 160;

/// Characters that would need escaping in HTML text or attribute values
const HTML_SPECIAL: &[char] = &['<', '>', '"', '&'];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    /// No errors, and in strict mode no warnings either
    pub fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// Check a project and its base document.
///
/// `base_html` is `None` when the base document could not be found.
/// Site-relative images are looked up under `output_root`.
pub fn validate_project(
    project: &Project,
    base_html: Option<&str>,
    output_root: &Path,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    report
        .info
        .push(format!("{} route(s) configured", project.routes.len()));
    if project.routes.is_empty() {
        report
            .warnings
            .push("No routes configured; build will write nothing".to_string());
    }

    check_base_document(base_html, &mut report);

    for route in &project.routes {
        check_route_text(route, &mut report);
        if let Some(image) = &route.image {
            check_image(image, &format!("route '{}' image", route.path), output_root, &mut report);
        }
    }
    check_image(
        &project.site.default_image,
        "site.default_image",
        output_root,
        &mut report,
    );
    check_duplicate_titles(&project.routes, &mut report);

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}

fn check_base_document(base_html: Option<&str>, report: &mut ValidationReport) {
    let Some(html) = base_html else {
        report
            .errors
            .push("Base document not found; run the site build first".to_string());
        return;
    };

    match BaseDocument::parse(html) {
        Ok(document) => report.info.push(format!(
            "{} stale tag(s) in base document will be replaced",
            document.stale_tags()
        )),
        Err(MaterializeError::MissingHead) => report
            .errors
            .push("Base document has no <head> element".to_string()),
        Err(e) => report.errors.push(format!("Base document: {}", e)),
    }
}

fn check_route_text(route: &RouteMeta, report: &mut ValidationReport) {
    let title_len = route.title.chars().count();
    if title_len > MAX_TITLE_LEN {
        report.warnings.push(format!(
            "Route '{}': title is {} characters (over {})",
            route.path, title_len, MAX_TITLE_LEN
        ));
    }

    let description_len = route.description.chars().count();
    if description_len > MAX_DESCRIPTION_LEN {
        report.warnings.push(format!(
            "Route '{}': description is {} characters (over {})",
            route.path, description_len, MAX_DESCRIPTION_LEN
        ));
    }

    for (field, value) in [("title", &route.title), ("description", &route.description)] {
        if value.contains(HTML_SPECIAL) {
            report.warnings.push(format!(
                "Route '{}': {} contains characters that are written unescaped ({})",
                route.path,
                field,
                HTML_SPECIAL.iter().collect::<String>()
            ));
        }
    }
}

fn check_image(image: &str, field: &str, output_root: &Path, report: &mut ValidationReport) {
    if is_absolute_url(image) {
        return;
    }

    // Cache-busting query strings and fragments are not part of the file name
    let file = image.split(['?', '#']).next().unwrap_or(image);
    let relative = file.trim_start_matches('/');
    if !output_root.join(relative).is_file() {
        report.warnings.push(format!(
            "{}: '{}' not found under {}",
            field,
            image,
            output_root.display()
        ));
    }
}

fn check_duplicate_titles(routes: &[RouteMeta], report: &mut ValidationReport) {
    let mut by_title: HashMap<&str, Vec<&str>> = HashMap::new();
    for route in routes {
        by_title
            .entry(route.title.as_str())
            .or_default()
            .push(route.path.as_str());
    }

    let mut duplicates: Vec<_> = by_title
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .collect();
    duplicates.sort();
    for (title, paths) in duplicates {
        report.warnings.push(format!(
            "Title '{}' shared by routes: {}",
            title,
            paths.join(", ")
        ));
    }
}
