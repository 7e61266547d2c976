//! Catalogued asset records

use crate::asset_type::AssetType;
use crate::payload::AssetPayload;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use unity_catalog_core::Result;

/// One catalogued asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    asset_type: AssetType,
    /// Logical catalog path, unique within the type
    asset_path: String,
    /// Absolute, forward-slash source file path
    source_file: String,
    /// Empty when the asset has no readable sidecar
    #[serde(default)]
    guid: String,
    /// Source modification time when the record was made, epoch seconds
    mtime: f64,
    #[serde(default)]
    payload: AssetPayload,
}

impl AssetMetadata {
    pub fn new<P, G>(asset_type: AssetType, asset_path: P, source_file: &Path, guid: G, mtime: f64) -> Self
    where
        P: Into<String>,
        G: Into<String>,
    {
        Self {
            asset_type,
            asset_path: asset_path.into(),
            source_file: normalize_source_path(source_file),
            guid: guid.into(),
            mtime,
            payload: AssetPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: AssetPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    /// Last segment of the logical path
    pub fn asset_name(&self) -> &str {
        self.asset_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.asset_path)
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.source_file)
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn mtime(&self) -> f64 {
        self.mtime
    }

    pub fn payload(&self) -> &AssetPayload {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: AssetPayload) {
        self.payload = payload;
    }

    /// Whether the source file is still on disk
    pub fn exists(&self) -> bool {
        self.source_path().exists()
    }

    /// The source file exists and has not been modified since the record
    /// was made
    pub fn is_fresh(&self) -> bool {
        modified_time(&self.source_path()).is_some_and(|mtime| mtime <= self.mtime)
    }
}

/// Modification time of a file in epoch seconds
pub fn file_mtime(path: &Path) -> Result<f64> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default())
}

/// Like [`file_mtime`], `None` when the file is missing or unreadable
pub fn modified_time(path: &Path) -> Option<f64> {
    file_mtime(path).ok()
}

/// Absolute path with forward slashes on every platform
pub fn normalize_source_path(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute.to_string_lossy().replace('\\', "/")
}
