// Conversion pipeline for openapi-bruno
// Fetch, transform, post-process, validate and write, in that order

use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::materialize::{build_directory, BuildSummary};
use crate::models::Collection;
use crate::openapi::load_document;
use crate::parsers::openapi::{ImportHooks, NoHooks, OpenApiParser};
use crate::postprocess::{hydrate_seq, migrate_fields, rekey};
use crate::validate::validate_collection;

/// Options for one conversion run
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Extra HTTP headers sent when the document is fetched over the network
    pub headers: Vec<(String, String)>,
    /// Run [`validate_collection`] before anything is written
    pub validate: bool,
    /// Add one environment per declared server
    pub environments_from_servers: bool,
}

/// Transform an already dereferenced document and run the post-processors.
pub fn parse_collection(document: Value) -> Result<Collection> {
    parse_collection_with(document, &ImportOptions::default(), NoHooks)
}

pub fn parse_collection_with<H: ImportHooks>(
    document: Value,
    options: &ImportOptions,
    hooks: H,
) -> Result<Collection> {
    let collection = OpenApiParser::with_hooks(hooks)
        .server_environments(options.environments_from_servers)
        .parse(document)?;
    let collection = hydrate_seq(migrate_fields(collection));
    if options.validate {
        validate_collection(&collection)?;
        log::info!("collection {:?} passed validation", collection.name);
    }
    Ok(collection)
}

/// Load `source` (path or URL) and build the collection from it.
pub async fn import_collection(source: &str, options: &ImportOptions) -> Result<Collection> {
    let document = load_document(source, &options.headers).await?;
    parse_collection_with(document, options, NoHooks)
}

/// Import `source` and write the result under `dest`.
///
/// Nothing is written when loading, parsing or validation fails.
pub async fn convert(source: &str, dest: &Path, options: &ImportOptions) -> Result<BuildSummary> {
    let collection = import_collection(source, options).await?;
    build_directory(&collection, dest)
}

/// A copy of `collection` that can live next to the original.
pub fn duplicate_collection(collection: &Collection) -> Collection {
    rekey(collection)
}
