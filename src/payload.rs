//! Typed asset payloads
//!
//! The semantic data extracted from a document, one variant per asset type
//! that carries references. Every reference is already resolved to a
//! logical catalog path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Data attached to a catalogued asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetPayload {
    /// Nothing extracted: plain files and assets not yet processed
    #[default]
    None,
    MaterialInstance(MaterialInstancePayload),
    Model(ModelPayload),
    Scene(ScenePayload),
}

impl AssetPayload {
    pub fn is_none(&self) -> bool {
        matches!(self, AssetPayload::None)
    }

    pub fn as_material_instance(&self) -> Option<&MaterialInstancePayload> {
        match self {
            AssetPayload::MaterialInstance(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelPayload> {
        match self {
            AssetPayload::Model(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_scene(&self) -> Option<&ScenePayload> {
        match self {
            AssetPayload::Scene(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Shader parameters of a material instance, restricted to the slots the
/// shader declares in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialInstancePayload {
    /// Logical path of the MATERIAL the shader GUID resolved to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Texture slot name to TEXTURE logical path
    pub textures: IndexMap<String, String>,
    /// Color slot name to `[r, g, b, a]`
    pub colors: IndexMap<String, Vec<f64>>,
    pub floats: IndexMap<String, f64>,
}

/// References of a model prefab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPayload {
    /// MESH logical path; absent when the mesh GUID did not resolve
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<String>,
    /// MATERIAL_INSTANCE logical paths in document order, one slot list per
    /// MeshRenderer, or one per material override of a prefab instance.
    /// Unresolved slots are left out of their list.
    pub material_instances: Vec<Vec<String>>,
}

impl ModelPayload {
    /// Every material instance path across all renderers
    pub fn material_paths(&self) -> impl Iterator<Item = &str> {
        self.material_instances.iter().flatten().map(String::as_str)
    }
}

/// Model placements of a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenePayload {
    pub models: Vec<ModelPlacement>,
}

/// One placed model instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPlacement {
    /// MODEL logical path
    pub asset_path: String,
    #[serde(default)]
    pub transform: TransformOverrides,
}

/// Transform components that differ from their defaults, in target axes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOverrides {
    #[serde(skip_serializing_if = "Vec3Override::is_empty")]
    pub position: Vec3Override,
    #[serde(skip_serializing_if = "Vec3Override::is_empty")]
    pub rotation: Vec3Override,
    #[serde(skip_serializing_if = "Vec3Override::is_empty")]
    pub scale: Vec3Override,
}

impl TransformOverrides {
    pub fn is_empty(&self) -> bool {
        self.position.is_empty() && self.rotation.is_empty() && self.scale.is_empty()
    }
}

/// A sparse 3-vector: only overridden components are present
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3Override {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Vec3Override {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }

    /// Set a component given in the authoring tool's Y-up axes. Y and Z swap
    /// on the way into the Z-up target. Returns `false` for an unknown axis.
    pub fn set_from_y_up(&mut self, axis: &str, value: f64) -> bool {
        match axis {
            "x" => self.x = Some(value),
            "y" => self.z = Some(value),
            "z" => self.y = Some(value),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_swap() {
        let mut position = Vec3Override::default();
        assert!(position.set_from_y_up("y", 5.0));
        assert_eq!(position, Vec3Override { x: None, y: None, z: Some(5.0) });
        assert!(position.set_from_y_up("z", -2.0));
        assert_eq!(position.y, Some(-2.0));
        assert!(!position.set_from_y_up("w", 1.0));
    }

    #[test]
    fn test_sparse_serialization() {
        let mut transform = TransformOverrides::default();
        transform.position.set_from_y_up("y", 5.0);
        let json = serde_json::to_value(&transform).unwrap();
        assert_eq!(json, serde_json::json!({"position": {"z": 5.0}}));

        let back: TransformOverrides = serde_json::from_value(json).unwrap();
        assert_eq!(back, transform);
        assert!(TransformOverrides::default().is_empty());
    }

    #[test]
    fn test_payload_tagging() {
        let payload = AssetPayload::Model(ModelPayload {
            mesh: Some("Project/Rock".to_string()),
            material_instances: vec![vec!["Project/Rock_01".to_string()]],
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "MODEL");
        assert_eq!(json["data"]["mesh"], "Project/Rock");

        let back: AssetPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back.as_model().and_then(|m| m.mesh.as_deref()), Some("Project/Rock"));

        let none = serde_json::to_value(AssetPayload::None).unwrap();
        assert_eq!(none, serde_json::json!({"kind": "NONE"}));
        assert!(serde_json::from_value::<AssetPayload>(none).unwrap().is_none());
    }
}
