pub mod build;
pub mod init;
pub mod validate;

use anyhow::{Context, Result};
use route_kit_core::{CONFIG_FILE, Project, parse_routes_toml};
use std::path::Path;

/// Load `<path>/routes.toml`, pointing at `init` when it is missing.
pub fn load_project(path: &Path) -> Result<Project> {
    if !path.exists() {
        anyhow::bail!("Project directory does not exist: {}", path.display());
    }

    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'route-kit init {}' first",
            CONFIG_FILE,
            path.display(),
            path.display()
        );
    }

    parse_routes_toml(&config_path).with_context(|| format!("Failed to parse {}", CONFIG_FILE))
}
