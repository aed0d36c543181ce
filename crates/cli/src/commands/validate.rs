use anyhow::{Context, Result};
use route_kit_generator::{MaterializeError, load_base_document};
use route_kit_validator::validate_project;
use std::path::PathBuf;

use super::load_project;

pub async fn run(path: PathBuf, strict: bool) -> Result<()> {
    println!("Validating project at: {}", path.display());

    let project = load_project(&path)?;
    println!("✓ routes.toml valid");
    println!("  Site: {}", project.site.url);

    let input = path.join(&project.build.input);
    let base_html = match load_base_document(&input) {
        Ok(html) => Some(html),
        Err(MaterializeError::MissingBaseDocument(_)) => None,
        Err(e) => return Err(e).context("Failed to read base document"),
    };

    let report = validate_project(
        &project,
        base_html.as_deref(),
        &path.join(&project.build.output),
    );

    for line in &report.info {
        println!("  {}", line);
    }
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("✗ {}", error);
    }

    if !report.is_ok(strict) {
        anyhow::bail!(
            "Validation failed: {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
    }

    println!("\n✓ Ready to build");
    Ok(())
}
