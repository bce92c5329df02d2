use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file not found: {0}")]
    MissingFile(PathBuf),

    #[error("could not parse {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("configuration is parsed, but does not conform to the schema")]
    SchemaViolation { violations: Vec<String> },

    /// A `ref` attribute with no matching `id` definition of the same tag.
    #[error("<{tag} ref=\"{reference}\"> does not match any <{tag}> defined with that id")]
    DanglingRef {
        tag: &'static str,
        reference: String,
    },

    #[error("XPath evaluation failed: {0}")]
    XPath(String),
}
