use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning the base document into route shells.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The built root document does not exist.
    #[error("base document not found: {}", .0.display())]
    MissingBaseDocument(PathBuf),

    /// The base document has no `<head>` element to inject into.
    #[error("base document has no <head> element")]
    MissingHead,

    /// The HTML parser could not make sense of the base document.
    #[error("HTML parse error: {0}")]
    Parse(String),

    /// Creating a route directory or writing its index.html failed.
    #[error("failed to write route '{route}' to {}", .path.display())]
    RouteWrite {
        route: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for materialization.
pub type Result<T> = std::result::Result<T, MaterializeError>;
