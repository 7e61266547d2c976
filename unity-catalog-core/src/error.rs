//! Error types for Unity asset cataloging

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for parsing and cataloging operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO errors when reading/writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// None of the supported text encodings could decode the file
    #[error("Encoding error: {} could not be decoded with any of {tried}", path.display())]
    Encoding { path: PathBuf, tried: String },

    /// A line whose indentation matches no known structural pattern
    #[error("Structure error at line {line}: {message} ({content:?})")]
    Structure {
        line: usize,
        content: String,
        message: String,
    },

    /// A group-repeated node cannot be flattened into a map of scalars
    #[error("Node '{name}' holds repeated sibling groups and cannot be flattened")]
    GroupedNode { name: String },

    /// Two siblings share a name, flattening would drop one of them
    #[error("Duplicate key '{key}' cannot be flattened")]
    DuplicateKey { key: String },

    /// A MODEL or SCENE document matches none of the known shapes
    #[error("Unknown {kind} document shape in {}: {message}", path.display())]
    UnknownShape {
        kind: String,
        path: PathBuf,
        message: String,
    },

    /// A field required to interpret a document is missing
    #[error("Missing field '{field}' in {}", path.display())]
    MissingField { field: String, path: PathBuf },

    /// Configuration document errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Catalog cache errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Directory traversal errors
    #[error("Directory walk error: {message}")]
    Walk { message: String },
}

impl CatalogError {
    /// Create a structure error
    pub fn structure<S: Into<String>, C: Into<String>>(line: usize, content: C, message: S) -> Self {
        Self::Structure {
            line,
            content: content.into(),
            message: message.into(),
        }
    }

    /// Create an unknown document shape error
    pub fn unknown_shape<K: Into<String>, P: Into<PathBuf>, M: Into<String>>(
        kind: K,
        path: P,
        message: M,
    ) -> Self {
        Self::UnknownShape {
            kind: kind.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field<S: Into<String>, P: Into<PathBuf>>(field: S, path: P) -> Self {
        Self::MissingField {
            field: field.into(),
            path: path.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a directory walk error
    pub fn walk<S: Into<String>>(message: S) -> Self {
        Self::Walk {
            message: message.into(),
        }
    }
}
