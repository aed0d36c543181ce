//! Writing one `index.html` per route.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use route_kit_core::{RouteMeta, SiteConfig};
use tracing::{debug, info};

use crate::document::BaseDocument;
use crate::error::{MaterializeError, Result};

/// Read the built root document.
///
/// A missing file is reported as [`MaterializeError::MissingBaseDocument`]
/// so callers can tell it apart from per-route failures.
pub fn load_base_document(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(html) => {
            debug!(path = %path.display(), bytes = html.len(), "loaded base document");
            Ok(html)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(MaterializeError::MissingBaseDocument(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Renders and writes route shells from a base document parsed once.
#[derive(Debug)]
pub struct Materializer<'a> {
    document: BaseDocument<'a>,
    site: &'a SiteConfig,
}

impl<'a> Materializer<'a> {
    /// Parse the base document. Fails before anything is written if it
    /// has no `<head>`.
    pub fn new(base_html: &'a str, site: &'a SiteConfig) -> Result<Self> {
        Ok(Self {
            document: BaseDocument::parse(base_html)?,
            site,
        })
    }

    pub fn document(&self) -> &BaseDocument<'a> {
        &self.document
    }

    /// The HTML for one route.
    pub fn render(&self, route: &RouteMeta) -> String {
        self.document.render_route(route, self.site)
    }

    /// Write `<output_root>/<route.path>/index.html`, overwriting it.
    pub fn write_route(&self, route: &RouteMeta, output_root: &Path) -> Result<PathBuf> {
        let dir = route.output_dir(output_root);
        let file = route.output_file(output_root);
        let write_error = |source| MaterializeError::RouteWrite {
            route: route.path.clone(),
            path: file.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(write_error)?;
        fs::write(&file, self.render(route)).map_err(write_error)?;

        info!(route = %route.path, path = %file.display(), "materialized route");
        Ok(file)
    }

    /// Write every route in order, calling `on_written` after each one.
    /// The first failure stops the batch.
    pub fn materialize_with<F>(
        &self,
        routes: &[RouteMeta],
        output_root: &Path,
        mut on_written: F,
    ) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&RouteMeta, &Path),
    {
        let mut written = Vec::with_capacity(routes.len());
        for route in routes {
            let file = self.write_route(route, output_root)?;
            on_written(route, &file);
            written.push(file);
        }
        Ok(written)
    }
}

/// Materialize `routes` under `output_root` from `base_html`.
pub fn materialize_routes(
    base_html: &str,
    routes: &[RouteMeta],
    output_root: &Path,
    site: &SiteConfig,
) -> Result<Vec<PathBuf>> {
    Materializer::new(base_html, site)?.materialize_with(routes, output_root, |_, _| {})
}
