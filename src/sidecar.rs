//! Sidecar identifier files
//!
//! Unity writes `<file>.meta` next to every asset; its top-level `guid`
//! field is the asset's stable identifier.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use unity_catalog_core::{GUID_FIELD, META_SUFFIX, Node};
use unity_catalog_yaml::{ParseOptions, YamlDocument};

/// Path of the sidecar belonging to `source_file`
pub fn sidecar_path(source_file: &Path) -> PathBuf {
    let mut name = source_file.as_os_str().to_os_string();
    name.push(META_SUFFIX);
    PathBuf::from(name)
}

/// GUID of `source_file`, or an empty string when the sidecar is missing or
/// carries no readable GUID
pub fn read_guid(source_file: &Path, options: ParseOptions) -> String {
    let meta = sidecar_path(source_file);
    if !meta.exists() {
        debug!("No sidecar for {}", source_file.display());
        return String::new();
    }

    match YamlDocument::load_yaml_with_options(&meta, options) {
        Ok(doc) => match doc.root().child(GUID_FIELD).and_then(Node::scalar) {
            Some(guid) => guid.to_string(),
            None => {
                warn!("Sidecar {} has no {} field", meta.display(), GUID_FIELD);
                String::new()
            }
        },
        Err(e) => {
            warn!("Unreadable sidecar {}: {}", meta.display(), e);
            String::new()
        }
    }
}
