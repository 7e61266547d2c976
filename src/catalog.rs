//! Asset catalog store
//!
//! Records are partitioned by type and keyed by logical path, with a second
//! per-type index from GUID to path. The store persists to a JSON cache file
//! grouped by type then path; on load every record is checked against its
//! source file and only unchanged ones are kept.

use crate::asset_type::AssetType;
use crate::metadata::AssetMetadata;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use unity_catalog_core::{CatalogError, Result};

/// Default file name of the cache document
pub const CACHE_FILE_NAME: &str = "asset_catalog.json";

type Records = BTreeMap<AssetType, BTreeMap<String, AssetMetadata>>;

/// How a record is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKey<'a> {
    Path(&'a str),
    Guid(&'a str),
}

/// In-memory catalog bound to a cache file
#[derive(Debug)]
pub struct AssetCatalog {
    cache_file: PathBuf,
    records: Records,
    guid_index: HashMap<AssetType, HashMap<String, String>>,
}

impl AssetCatalog {
    pub fn new<P: Into<PathBuf>>(cache_file: P) -> Self {
        Self {
            cache_file: cache_file.into(),
            records: BTreeMap::new(),
            guid_index: HashMap::new(),
        }
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Insert or replace the record at `(type, path)`. Returns the replaced
    /// record, if any.
    pub fn register(&mut self, metadata: AssetMetadata) -> Option<AssetMetadata> {
        let asset_type = metadata.asset_type();
        let path = metadata.asset_path().to_string();
        let guid = metadata.guid().to_string();

        let previous = self
            .records
            .entry(asset_type)
            .or_default()
            .insert(path.clone(), metadata);

        let index = self.guid_index.entry(asset_type).or_default();
        if let Some(old) = &previous
            && !old.guid().is_empty()
            && index.get(old.guid()) == Some(&path)
        {
            index.remove(old.guid());
        }
        if !guid.is_empty() {
            if let Some(other) = index.get(&guid)
                && *other != path
            {
                warn!(
                    asset_type = %asset_type,
                    guid = %guid,
                    "GUID already registered for {}, now resolves to {}",
                    other,
                    path
                );
            }
            index.insert(guid, path);
        }
        previous
    }

    /// Record by logical path
    pub fn get(&self, asset_type: AssetType, path: &str) -> Option<&AssetMetadata> {
        self.records.get(&asset_type)?.get(path)
    }

    pub fn get_mut(&mut self, asset_type: AssetType, path: &str) -> Option<&mut AssetMetadata> {
        self.records.get_mut(&asset_type)?.get_mut(path)
    }

    /// Record by GUID. The empty GUID never matches.
    pub fn get_by_guid(&self, asset_type: AssetType, guid: &str) -> Option<&AssetMetadata> {
        if guid.is_empty() {
            return None;
        }
        let path = self.guid_index.get(&asset_type)?.get(guid)?;
        self.get(asset_type, path)
    }

    pub fn lookup(&self, asset_type: AssetType, key: AssetKey<'_>) -> Option<&AssetMetadata> {
        match key {
            AssetKey::Path(path) => self.get(asset_type, path),
            AssetKey::Guid(guid) => self.get_by_guid(asset_type, guid),
        }
    }

    pub fn contains(&self, asset_type: AssetType, path: &str) -> bool {
        self.get(asset_type, path).is_some()
    }

    /// Records of one type ordered by logical path
    pub fn list(&self, asset_type: AssetType) -> Vec<&AssetMetadata> {
        self.records
            .get(&asset_type)
            .map(|records| records.values().collect())
            .unwrap_or_default()
    }

    /// Every record, by type then logical path
    pub fn iter(&self) -> impl Iterator<Item = &AssetMetadata> {
        self.records.values().flat_map(|records| records.values())
    }

    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.guid_index.clear();
    }

    /// Replace the in-memory records with the fresh records of the cache
    /// file. A missing cache file loads nothing. Returns how many records
    /// were kept.
    pub fn load(&mut self) -> Result<usize> {
        self.clear();
        if !self.cache_file.exists() {
            debug!("No catalog cache at {}", self.cache_file.display());
            return Ok(0);
        }

        let text = fs::read_to_string(&self.cache_file)?;
        let cached: Records = serde_json::from_str(&text).map_err(|e| {
            CatalogError::cache(format!("Failed to parse {}: {}", self.cache_file.display(), e))
        })?;

        let mut dropped = 0;
        for metadata in cached.into_values().flat_map(BTreeMap::into_values) {
            if metadata.is_fresh() {
                self.register(metadata);
            } else {
                debug!(
                    asset_type = %metadata.asset_type(),
                    "Dropping stale record {}",
                    metadata.asset_path()
                );
                dropped += 1;
            }
        }

        let kept = self.len();
        info!("Loaded {} cached records, dropped {} stale", kept, dropped);
        Ok(kept)
    }

    /// Write every record to the cache file, replacing it atomically
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)
            .map_err(|e| CatalogError::cache(format!("Failed to serialize catalog: {}", e)))?;

        if let Some(parent) = self.cache_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut temp_name = self.cache_file.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_file = PathBuf::from(temp_name);
        fs::write(&temp_file, json)?;
        fs::rename(&temp_file, &self.cache_file)?;

        debug!("Saved {} records to {}", self.len(), self.cache_file.display());
        Ok(())
    }

    /// Save and release the catalog
    pub fn close(self) -> Result<()> {
        self.save()
    }
}
