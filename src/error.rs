// Error types for openapi-bruno
// One variant per failure phase: fetch, transform, validate, write

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for a conversion run
#[derive(Debug, Error)]
pub enum Error {
    /// The document could not be fetched, read, parsed or dereferenced
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Only OpenAPI v3 is supported currently (found version {0})")]
    UnsupportedVersion(String),

    /// Any other failure while turning the document into a collection
    #[error("An error occurred while parsing the OpenAPI collection: {0}")]
    CollectionParse(String),

    #[error("Collection failed validation: {0}")]
    Validation(String),

    #[error("Failed to write {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_version_message_names_version() {
        let err = Error::UnsupportedVersion("2.0".to_string());
        assert!(err.to_string().contains("2.0"));
        assert!(err.to_string().contains("OpenAPI v3"));
    }

    #[test]
    fn parse_error_wraps_cause() {
        let err = Error::CollectionParse("missing field `title`".to_string());
        assert!(err.to_string().ends_with("missing field `title`"));
    }

    #[test]
    fn filesystem_error_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::filesystem("/tmp/out/bruno.json", io);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out/bruno.json"));
        assert!(msg.contains("denied"));
    }
}
