use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "routes.toml";

/// File written into every route directory
pub const INDEX_FILE: &str = "index.html";

/// Complete project configuration loaded from routes.toml
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub site: SiteConfig,
    pub build: BuildConfig,
    pub routes: Vec<RouteMeta>,
}

/// Site-wide settings shared by every route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Absolute site URL without a trailing slash (e.g. "https://example.com")
    pub url: String,
    /// Emitted as og:site_name when present
    pub name: Option<String>,
    /// Preview image used by routes that don't set their own
    pub default_image: String,
    /// Emitted as twitter:site when present
    pub twitter_handle: Option<String>,
}

impl SiteConfig {
    /// Minimal site configuration with only the required fields.
    pub fn new(url: impl Into<String>, default_image: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            name: None,
            default_image: default_image.into(),
            twitter_handle: None,
        }
    }

    /// Absolute URL of a page on this site
    pub fn page_url(&self, path: &str) -> String {
        join_url(&self.url, path)
    }

    /// Resolve a site-relative path or pass through an absolute URL
    pub fn absolute_url(&self, path_or_url: &str) -> String {
        if is_absolute_url(path_or_url) {
            path_or_url.to_string()
        } else {
            join_url(&self.url, path_or_url)
        }
    }

    /// Absolute preview image URL for a route, falling back to the default image
    pub fn image_url(&self, route: &RouteMeta) -> String {
        self.absolute_url(route.image.as_deref().unwrap_or(&self.default_image))
    }
}

/// Default input/output locations, relative to the project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("dist").join(INDEX_FILE),
            output: PathBuf::from("dist"),
        }
    }
}

/// Metadata for one route of the single-page application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    /// URL path, always starting with `/`
    pub path: String,
    pub title: String,
    pub description: String,
    /// Site-relative path or absolute URL; `None` uses the site default
    pub image: Option<String>,
}

impl RouteMeta {
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The route path without leading or trailing slashes
    pub fn relative_dir(&self) -> &str {
        self.path.trim_matches('/')
    }

    /// Directory that holds this route's index.html under `root`
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        self.relative_dir()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
    }

    /// Full path of this route's index.html under `root`
    pub fn output_file(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join(INDEX_FILE)
    }
}

/// Whether a string is an absolute http(s) URL
pub fn is_absolute_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Concatenate a base URL and a path without doubling or dropping the slash
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://example.com", "/about"),
            "https://example.com/about"
        );
        assert_eq!(
            join_url("https://example.com/", "/about"),
            "https://example.com/about"
        );
        assert_eq!(
            join_url("https://example.com", "og.png"),
            "https://example.com/og.png"
        );
    }

    #[test]
    fn test_image_url_falls_back_to_default() {
        let site = SiteConfig::new("https://example.com", "/og.png");
        let route = RouteMeta::new("/about", "About", "About us");
        assert_eq!(site.image_url(&route), "https://example.com/og.png");

        let route = route.with_image("/og/about.png");
        assert_eq!(site.image_url(&route), "https://example.com/og/about.png");
    }

    #[test]
    fn test_absolute_image_is_not_prefixed() {
        let site = SiteConfig::new("https://example.com", "/og.png");
        let route =
            RouteMeta::new("/about", "About", "About us").with_image("https://cdn.test/a.png");
        assert_eq!(site.image_url(&route), "https://cdn.test/a.png");
        assert!(is_absolute_url("HTTPS://cdn.test/a.png"));
        assert!(!is_absolute_url("/https/a.png"));
    }

    #[test]
    fn test_site_new_trims_trailing_slash() {
        let site = SiteConfig::new("https://example.com/", "/og.png");
        assert_eq!(site.url, "https://example.com");
        assert_eq!(site.page_url("/blog"), "https://example.com/blog");
    }

    #[test]
    fn test_output_paths() {
        let root = Path::new("dist");
        let route = RouteMeta::new("/models/leaderboard/", "Models", "Leaderboard");
        assert_eq!(route.relative_dir(), "models/leaderboard");
        assert_eq!(
            route.output_dir(root),
            Path::new("dist").join("models").join("leaderboard")
        );
        assert_eq!(
            route.output_file(root),
            Path::new("dist")
                .join("models")
                .join("leaderboard")
                .join("index.html")
        );
    }
}
