//! Artifact loading errors

/// Failure while reading or validating one of the serialized artifacts.
///
/// Every variant carries the path of the offending file so the startup log
/// points straight at it.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {path}: {message}")]
    Invalid { path: String, message: String },
}
