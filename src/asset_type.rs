//! Asset type enumeration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unity_catalog_core::CatalogError;

/// Kind of a catalogued asset
///
/// Serialized as `MATERIAL`, `MATERIAL_INSTANCE`, ... in both the
/// configuration document and the cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    /// Shader definition, declared in configuration rather than scanned
    Material,
    /// `.mat` file: a shader plus concrete parameter values
    MaterialInstance,
    Mesh,
    /// Prefab: a mesh rendered with material instances
    Model,
    /// Scene: placed model instances
    Scene,
    Texture,
}

impl AssetType {
    pub const ALL: [AssetType; 6] = [
        AssetType::Material,
        AssetType::MaterialInstance,
        AssetType::Mesh,
        AssetType::Model,
        AssetType::Scene,
        AssetType::Texture,
    ];

    /// Types are registered in this order so that every reference target
    /// is in the catalog before any payload is extracted
    pub const REGISTRATION_ORDER: [AssetType; 6] = [
        AssetType::Texture,
        AssetType::Material,
        AssetType::MaterialInstance,
        AssetType::Mesh,
        AssetType::Model,
        AssetType::Scene,
    ];

    /// Types that carry cross-references, dependencies first
    pub const EXTRACTION_ORDER: [AssetType; 3] = [
        AssetType::MaterialInstance,
        AssetType::Model,
        AssetType::Scene,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Material => "MATERIAL",
            AssetType::MaterialInstance => "MATERIAL_INSTANCE",
            AssetType::Mesh => "MESH",
            AssetType::Model => "MODEL",
            AssetType::Scene => "SCENE",
            AssetType::Texture => "TEXTURE",
        }
    }

    /// Whether documents of this type are parsed for a payload
    pub fn carries_references(self) -> bool {
        Self::EXTRACTION_ORDER.contains(&self)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|asset_type| asset_type.as_str() == s)
            .ok_or_else(|| CatalogError::config(format!("Unknown asset type: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_names() {
        for asset_type in AssetType::ALL {
            assert_eq!(asset_type.as_str().parse::<AssetType>().unwrap(), asset_type);
            let json = serde_json::to_string(&asset_type).unwrap();
            assert_eq!(json, format!("\"{}\"", asset_type));
        }
        assert!("ANIMATION_LAYER".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_dependency_order() {
        let position = |t: AssetType| {
            AssetType::REGISTRATION_ORDER
                .iter()
                .position(|r| *r == t)
                .unwrap()
        };
        assert!(position(AssetType::Texture) < position(AssetType::MaterialInstance));
        assert!(position(AssetType::Material) < position(AssetType::MaterialInstance));
        assert!(position(AssetType::Mesh) < position(AssetType::Model));
        assert!(position(AssetType::Model) < position(AssetType::Scene));
        assert!(AssetType::Scene.carries_references());
        assert!(!AssetType::Texture.carries_references());
    }
}
