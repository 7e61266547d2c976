//! Loaded Unity YAML document
//!
//! Wraps the parsed root [`Node`] together with where it came from and which
//! text encoding decoded it. Top-level children of the root are the
//! document's objects (`Material`, `MeshRenderer`, `PrefabInstance`, ...).

use crate::encoding::{self, DEFAULT_ENCODINGS, TextEncoding};
use crate::parser::{ParseOptions, StructureParser};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use unity_catalog_core::{CatalogError, Node, Result};

/// A Unity YAML document containing one or more Unity objects
#[derive(Debug, Clone)]
pub struct YamlDocument {
    root: Node,
    file_path: Option<PathBuf>,
    encoding: Option<TextEncoding>,
}

impl YamlDocument {
    /// Load a Unity YAML file with lenient parsing
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use unity_catalog_yaml::YamlDocument;
    ///
    /// let doc = YamlDocument::load_yaml("Assets/Materials/Rock_01.mat")?;
    /// let material = doc.entry("Material");
    /// # Ok::<(), unity_catalog_core::CatalogError>(())
    /// ```
    pub fn load_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_yaml_with_options(path, ParseOptions::default())
    }

    /// Load a Unity YAML file, trying each supported text encoding in turn
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_yaml_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let (text, encoding) =
            encoding::decode_with(&bytes, &DEFAULT_ENCODINGS).ok_or_else(|| {
                CatalogError::Encoding {
                    path: path.to_path_buf(),
                    tried: encoding::describe(&DEFAULT_ENCODINGS),
                }
            })?;
        debug!(encoding = %encoding, "decoded document");

        let root = StructureParser::with_options(options).parse_str(&text)?;
        Ok(Self {
            root,
            file_path: Some(path.to_path_buf()),
            encoding: Some(encoding),
        })
    }

    /// Parse document text with lenient parsing
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_options(text, ParseOptions::default())
    }

    pub fn parse_with_options(text: &str, options: ParseOptions) -> Result<Self> {
        Ok(Self {
            root: StructureParser::with_options(options).parse_str(text)?,
            file_path: None,
            encoding: None,
        })
    }

    /// The depth-0 root node
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Encoding that decoded the file, `None` for documents parsed from text
    pub fn encoding(&self) -> Option<TextEncoding> {
        self.encoding
    }

    /// All top-level objects in document order
    pub fn entries(&self) -> &[Node] {
        self.root.children()
    }

    /// First top-level object of the given class
    pub fn entry(&self, class_name: &str) -> Option<&Node> {
        self.root.child(class_name)
    }

    /// Every top-level object of the given class
    pub fn filter_by_class(&self, class_name: &str) -> Vec<&Node> {
        self.root.children_named(class_name).collect()
    }

    /// Filter objects by class names and required direct properties.
    /// An empty or absent list matches everything.
    pub fn filter(&self, class_names: Option<&[&str]>, attributes: Option<&[&str]>) -> Vec<&Node> {
        self.entries()
            .iter()
            .filter(|entry| {
                if let Some(names) = class_names
                    && !names.is_empty()
                    && !names.contains(&entry.name())
                {
                    return false;
                }
                attributes
                    .unwrap_or_default()
                    .iter()
                    .all(|attr| entry.child(attr).is_some())
            })
            .collect()
    }
}
