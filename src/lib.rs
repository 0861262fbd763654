pub mod error;
pub mod idgen;
pub mod utils;
pub mod models;
pub mod openapi;
pub mod auth;
pub mod params;
pub mod body;
pub mod parsers;
pub mod postprocess;
pub mod validate;
pub mod bru;
pub mod materialize;
pub mod importer;

// Re-export commonly used items
pub use error::{Error, Result};
pub use models::*;
pub use parsers::*;
pub use auth::{AuthScheme, SecurityConfig};
pub use postprocess::{hydrate_seq, migrate_fields, rekey};
pub use validate::validate_collection;
pub use bru::{environment_to_bru, request_to_bru};
pub use materialize::{build_directory, create_directory, BuildSummary};
pub use importer::*;
