//! Constants for Unity YAML documents
//!
//! Class and property names that the catalog reads out of Unity's
//! serialized files, plus the sidecar conventions used to locate GUIDs.

/// Suffix appended to an asset file name to get its identifier sidecar
pub const META_SUFFIX: &str = ".meta";

/// Field of a sidecar document that carries the asset GUID
pub const GUID_FIELD: &str = "guid";

/// Common Unity class names (top-level document keys)
pub mod class_names {
    pub const GAME_OBJECT: &str = "GameObject";
    pub const TRANSFORM: &str = "Transform";
    pub const MATERIAL: &str = "Material";
    pub const MESH_RENDERER: &str = "MeshRenderer";
    pub const MESH_FILTER: &str = "MeshFilter";
    pub const PREFAB_INSTANCE: &str = "PrefabInstance";
}

/// Serialized property names
pub mod property_names {
    pub const SHADER: &str = "m_Shader";
    pub const SAVED_PROPERTIES: &str = "m_SavedProperties";
    pub const TEX_ENVS: &str = "m_TexEnvs";
    pub const TEXTURE: &str = "m_Texture";
    pub const COLORS: &str = "m_Colors";
    pub const FLOATS: &str = "m_Floats";
    pub const MATERIALS: &str = "m_Materials";
    pub const MESH: &str = "m_Mesh";
    pub const MODIFICATION: &str = "m_Modification";
    pub const MODIFICATIONS: &str = "m_Modifications";
    pub const SOURCE_PREFAB: &str = "m_SourcePrefab";
    pub const TARGET: &str = "target";
    pub const PROPERTY_PATH: &str = "propertyPath";
    pub const VALUE: &str = "value";
    pub const OBJECT_REFERENCE: &str = "objectReference";
    pub const LOCAL_POSITION: &str = "m_LocalPosition";
    pub const LOCAL_EULER_ANGLES_HINT: &str = "m_LocalEulerAnglesHint";
    pub const LOCAL_SCALE: &str = "m_LocalScale";
}
