//! Unity Catalog YAML Reader
//!
//! Structural reader for Unity's serialized YAML files (`.mat`, `.prefab`,
//! `.unity`, `.meta`). Nesting is recovered from indentation alone and list
//! positions keep every record separate, including repeated same-named
//! records that a general YAML mapping model would merge.
//!
//! # Examples
//!
//! ```rust
//! use unity_catalog_yaml::YamlDocument;
//!
//! let yaml = "
//! MeshRenderer:
//!   m_Materials:
//!   - {fileID: 2100000, guid: 4f1a, type: 2}
//!   - {fileID: 2100000, guid: 77c0, type: 2}
//! ";
//!
//! let doc = YamlDocument::parse(yaml)?;
//! let materials = doc.root().find_path("MeshRenderer/m_Materials").unwrap();
//! assert_eq!(materials.groups().len(), 2);
//! # Ok::<(), unity_catalog_core::CatalogError>(())
//! ```

// Re-export core types
pub use unity_catalog_core::{
    CatalogError, Children, Group, Node, NodeValue, Result, UnityValue, constants::*,
};

pub mod encoding;
pub mod parser;
pub mod reader;
pub mod yaml_document;

// Re-export main types
pub use encoding::{DEFAULT_ENCODINGS, TextEncoding};
pub use parser::{ParseMode, ParseOptions, StructureParser, parse_str};
pub use reader::{Line, read_lines};
pub use yaml_document::YamlDocument;
