//! Configuration document
//!
//! `asset_descriptor.json` at the project root says, per asset type, which
//! directories to scan, which file suffixes belong to the type and which
//! catalog prefix the logical paths get. The MATERIAL entry also declares
//! shaders by GUID together with the parameter slots worth extracting.

use crate::asset_type::AssetType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;
use unity_catalog_core::{CatalogError, Result};

/// Default file name of the configuration document
pub const CONFIG_FILE_NAME: &str = "asset_descriptor.json";

/// The whole configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogConfig {
    types: BTreeMap<AssetType, AssetTypeConfig>,
}

/// Scan settings for one asset type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetTypeConfig {
    pub asset_path_infos: Vec<AssetPathInfo>,
    /// Matched against the end of the file name, `.png`
    pub suffixes: Vec<String>,
    /// Shader GUID to declared material, MATERIAL only
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub material_create_infos: IndexMap<String, MaterialCreateInfo>,
}

/// One scan root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPathInfo {
    /// Directory relative to the project root
    #[serde(alias = "asset_path_name")]
    pub import_path: String,
    /// Prefix of every logical path found under this root
    pub asset_catalog_name: String,
}

/// A shader declared by configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialCreateInfo {
    /// Logical path of the synthesized MATERIAL
    pub asset_path: String,
    #[serde(rename = "m_TexEnvs")]
    pub tex_envs: Vec<String>,
    #[serde(rename = "m_Colors")]
    pub colors: Vec<String>,
    #[serde(rename = "m_Floats")]
    pub floats: Vec<String>,
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            CatalogError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
            .map_err(|e| CatalogError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| CatalogError::config(format!("Invalid configuration document: {}", e)))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::config(format!("Failed to serialize configuration: {}", e)))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// The document written when a project has no configuration yet: one
    /// conventional Unity folder per scanned type, no declared shaders
    pub fn default_template(project_name: &str) -> Self {
        let scan = |folder: &str, suffixes: &[&str]| AssetTypeConfig {
            asset_path_infos: vec![AssetPathInfo {
                import_path: folder.to_string(),
                asset_catalog_name: project_name.to_string(),
            }],
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            material_create_infos: IndexMap::new(),
        };

        let mut config = Self::new();
        config.set(AssetType::Material, AssetTypeConfig::default());
        config.set(AssetType::MaterialInstance, scan("Materials", &[".mat"]));
        config.set(AssetType::Mesh, scan("Models", &[".fbx"]));
        config.set(AssetType::Model, scan("Prefabs", &[".prefab"]));
        config.set(AssetType::Scene, scan("Scenes", &[".unity"]));
        config.set(
            AssetType::Texture,
            scan("Textures", &[".png", ".tga", ".jpeg", ".jpg"]),
        );
        config
    }

    /// Write the default template unless a file already exists.
    /// Returns whether a file was written.
    pub fn create_default<P: AsRef<Path>>(path: P, project_name: &str) -> Result<bool> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(false);
        }
        Self::default_template(project_name).save(path)?;
        info!("Created default configuration at {}", path.display());
        Ok(true)
    }

    pub fn asset_type(&self, asset_type: AssetType) -> Option<&AssetTypeConfig> {
        self.types.get(&asset_type)
    }

    pub fn set(&mut self, asset_type: AssetType, config: AssetTypeConfig) {
        self.types.insert(asset_type, config);
    }

    /// Declared shaders, keyed by shader GUID
    pub fn material_create_infos(&self) -> impl Iterator<Item = (&str, &MaterialCreateInfo)> {
        self.asset_type(AssetType::Material)
            .into_iter()
            .flat_map(|material| material.material_create_infos.iter())
            .map(|(guid, info)| (guid.as_str(), info))
    }

    pub fn material_create_info(&self, shader_guid: &str) -> Option<&MaterialCreateInfo> {
        self.asset_type(AssetType::Material)
            .and_then(|material| material.material_create_infos.get(shader_guid))
    }
}
