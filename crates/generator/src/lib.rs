//! Route-specific HTML shells for a single-page application.
//!
//! The build produces one generic `index.html`. For every route in the
//! project's route table this crate writes `<output>/<route>/index.html`
//! with its own title, description, canonical link, Open Graph and
//! Twitter Card tags so crawlers that don't run JavaScript see the
//! right preview.

pub mod document;
pub mod error;
pub mod materialize;
pub mod meta;

pub use document::{BaseDocument, inject_meta_tags};
pub use error::{MaterializeError, Result};
pub use materialize::{Materializer, load_base_document, materialize_routes};
pub use meta::{MetaTags, generate_meta_tags};
