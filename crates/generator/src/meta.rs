//! Social-sharing markup for a single route.

use route_kit_core::{RouteMeta, SiteConfig};

/// Indentation of every generated tag inside `<head>`
const INDENT: &str = "    ";

/// Managed `<head>` tags for one route.
///
/// Values are written verbatim: titles and descriptions are expected to be
/// plain text that needs no escaping.
#[derive(Debug, Clone, Copy)]
pub struct MetaTags<'a> {
    site: &'a SiteConfig,
    route: &'a RouteMeta,
}

impl<'a> MetaTags<'a> {
    pub fn new(site: &'a SiteConfig, route: &'a RouteMeta) -> Self {
        Self { site, route }
    }

    /// One tag per entry, in output order.
    pub fn tags(&self) -> Vec<String> {
        let route = self.route;
        let url = self.site.page_url(&route.path);
        let image = self.site.image_url(route);

        let mut tags = vec![
            format!("<title>{}</title>", route.title),
            meta_name("description", &route.description),
            format!(r#"<link rel="canonical" href="{}" />"#, url),
            meta_property("og:type", "website"),
            meta_property("og:url", &url),
            meta_property("og:title", &route.title),
            meta_property("og:description", &route.description),
            meta_property("og:image", &image),
        ];
        if let Some(name) = &self.site.name {
            tags.push(meta_property("og:site_name", name));
        }

        tags.push(meta_name("twitter:card", "summary_large_image"));
        if let Some(handle) = &self.site.twitter_handle {
            tags.push(meta_name("twitter:site", handle));
        }
        tags.extend([
            meta_name("twitter:url", &url),
            meta_name("twitter:title", &route.title),
            meta_name("twitter:description", &route.description),
            meta_name("twitter:image", &image),
        ]);

        tags
    }

    /// The block inserted after `<head>`: every tag on its own indented line.
    pub fn render(&self) -> String {
        self.tags()
            .iter()
            .map(|tag| format!("\n{}{}", INDENT, tag))
            .collect()
    }
}

fn meta_name(name: &str, content: &str) -> String {
    format!(r#"<meta name="{}" content="{}" />"#, name, content)
}

fn meta_property(property: &str, content: &str) -> String {
    format!(r#"<meta property="{}" content="{}" />"#, property, content)
}

/// Meta markup for `route` given only the site URL and default image.
pub fn generate_meta_tags(route: &RouteMeta, site_url: &str, default_image: &str) -> String {
    let site = SiteConfig::new(site_url, default_image);
    MetaTags::new(&site, route).render()
}
