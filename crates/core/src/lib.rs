pub mod config;
pub mod error;
pub mod types;

pub use config::{parse_routes_toml, parse_routes_toml_str};
pub use error::{Error, Result};
pub use types::*;
