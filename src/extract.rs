//! Payload extraction
//!
//! Reads the typed payload out of a parsed MATERIAL_INSTANCE, MODEL or
//! SCENE document and resolves every GUID it finds against the catalog.
//! GUIDs that do not resolve are logged, recorded in the
//! [`UnresolvedReference`] list and left out of the payload.

use crate::asset_type::AssetType;
use crate::catalog::AssetCatalog;
use crate::config::CatalogConfig;
use crate::payload::{
    AssetPayload, MaterialInstancePayload, ModelPayload, ModelPlacement, ScenePayload,
    TransformOverrides,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};
use unity_catalog_core::{
    CatalogError, GUID_FIELD, Group, Node, Result, class_names, property_names,
};
use unity_catalog_yaml::YamlDocument;

/// A GUID found in a document that matched nothing in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    /// Type of the referencing asset
    pub asset_type: AssetType,
    /// Logical path of the referencing asset
    pub asset_path: String,
    /// Type the GUID was looked up as
    pub target_type: AssetType,
    pub guid: String,
}

/// Extraction state for one document
pub(crate) struct Extractor<'a> {
    catalog: &'a AssetCatalog,
    config: &'a CatalogConfig,
    asset_type: AssetType,
    asset_path: &'a str,
    source_file: &'a Path,
    unresolved: Vec<UnresolvedReference>,
}

impl<'a> Extractor<'a> {
    pub(crate) fn new(
        catalog: &'a AssetCatalog,
        config: &'a CatalogConfig,
        asset_type: AssetType,
        asset_path: &'a str,
        source_file: &'a Path,
    ) -> Self {
        Self {
            catalog,
            config,
            asset_type,
            asset_path,
            source_file,
            unresolved: Vec::new(),
        }
    }

    /// Extract the payload for the extractor's asset type
    pub(crate) fn extract(&mut self, doc: &YamlDocument) -> Result<AssetPayload> {
        match self.asset_type {
            AssetType::MaterialInstance => {
                self.material_instance(doc).map(AssetPayload::MaterialInstance)
            }
            AssetType::Model => self.model(doc).map(AssetPayload::Model),
            AssetType::Scene => self.scene(doc).map(AssetPayload::Scene),
            _ => Ok(AssetPayload::None),
        }
    }

    pub(crate) fn into_unresolved(self) -> Vec<UnresolvedReference> {
        self.unresolved
    }

    /// Resolve a GUID to a logical path, recording a miss
    fn resolve(&mut self, target_type: AssetType, guid: &str) -> Option<String> {
        if let Some(metadata) = self.catalog.get_by_guid(target_type, guid) {
            return Some(metadata.asset_path().to_string());
        }
        warn!(
            asset_type = %self.asset_type,
            asset_path = %self.asset_path,
            "Unresolved {} reference {}",
            target_type,
            guid
        );
        self.unresolved.push(UnresolvedReference {
            asset_type: self.asset_type,
            asset_path: self.asset_path.to_string(),
            target_type,
            guid: guid.to_string(),
        });
        None
    }

    fn material_instance(&mut self, doc: &YamlDocument) -> Result<MaterialInstancePayload> {
        let material = doc
            .entry(class_names::MATERIAL)
            .ok_or_else(|| CatalogError::missing_field(class_names::MATERIAL, self.source_file))?;
        let mut payload = MaterialInstancePayload::default();

        let Some(shader_guid) = material
            .child(property_names::SHADER)
            .and_then(|shader| reference_guid(shader))
        else {
            warn!("{} has no shader reference", self.asset_path);
            return Ok(payload);
        };
        let config = self.config;
        let Some(schema) = config.material_create_info(shader_guid) else {
            warn!(
                "{} uses shader {} which is not declared in configuration",
                self.asset_path, shader_guid
            );
            return Ok(payload);
        };
        payload.material = self.resolve(AssetType::Material, shader_guid);

        let saved = material.child(property_names::SAVED_PROPERTIES);

        for slot in slots(saved, property_names::TEX_ENVS) {
            if !schema.tex_envs.iter().any(|name| name == slot.name()) {
                continue;
            }
            let Some(guid) = slot
                .child(property_names::TEXTURE)
                .and_then(|texture| reference_guid(texture))
            else {
                debug!("{}: texture slot {} is empty", self.asset_path, slot.name());
                continue;
            };
            if let Some(path) = self.resolve(AssetType::Texture, guid) {
                payload.textures.insert(slot.name().to_string(), path);
            }
        }

        for slot in slots(saved, property_names::COLORS) {
            if !schema.colors.iter().any(|name| name == slot.name()) {
                continue;
            }
            match parse_color(slot) {
                Some(components) => {
                    payload.colors.insert(slot.name().to_string(), components);
                }
                None => warn!("{}: color {} is not numeric", self.asset_path, slot.name()),
            }
        }

        for slot in slots(saved, property_names::FLOATS) {
            if !schema.floats.iter().any(|name| name == slot.name()) {
                continue;
            }
            match slot.scalar().and_then(parse_number) {
                Some(value) => {
                    payload.floats.insert(slot.name().to_string(), value);
                }
                None => warn!("{}: float {} is not numeric", self.asset_path, slot.name()),
            }
        }

        Ok(payload)
    }

    fn model(&mut self, doc: &YamlDocument) -> Result<ModelPayload> {
        let (mesh_guid, material_groups) = match ModelShape::detect(doc, self.source_file)? {
            ModelShape::DirectRenderer { renderers, filter } => {
                // One slot list per renderer
                let groups = renderers
                    .iter()
                    .map(|renderer| {
                        renderer
                            .child(property_names::MATERIALS)
                            .map(Node::groups)
                            .unwrap_or_default()
                            .iter()
                            .filter_map(|group| group.first_node().and_then(reference_guid))
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>();
                let mesh = filter
                    .child(property_names::MESH)
                    .and_then(reference_guid);
                (mesh, groups)
            }
            ModelShape::PrefabInstance { instances } => {
                // Every material override replaces one slot
                let groups = instances
                    .iter()
                    .flat_map(|instance| modifications(instance))
                    .filter(|group| {
                        group
                            .find_node(property_names::PROPERTY_PATH)
                            .and_then(Node::scalar)
                            .is_some_and(|path| path.starts_with(property_names::MATERIALS))
                    })
                    .map(|group| {
                        group
                            .find_node(property_names::OBJECT_REFERENCE)
                            .and_then(reference_guid)
                            .into_iter()
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>();
                let mesh = instances.first().and_then(|instance| source_prefab_guid(instance));
                (mesh, groups)
            }
        };

        let mut payload = ModelPayload::default();
        match mesh_guid {
            Some(guid) => payload.mesh = self.resolve(AssetType::Mesh, guid),
            None => warn!("{} has no mesh reference", self.asset_path),
        }
        for guids in material_groups {
            let paths = guids
                .into_iter()
                .filter_map(|guid| self.resolve(AssetType::MaterialInstance, guid))
                .collect();
            payload.material_instances.push(paths);
        }
        Ok(payload)
    }

    fn scene(&mut self, doc: &YamlDocument) -> Result<ScenePayload> {
        if doc.entries().is_empty() {
            return Err(CatalogError::unknown_shape(
                self.asset_type.as_str(),
                self.source_file,
                "document has no objects",
            ));
        }

        let catalog = self.catalog;
        let mut payload = ScenePayload::default();
        for instance in doc.filter_by_class(class_names::PREFAB_INSTANCE) {
            let Some(model_guid) = source_prefab_guid(instance) else {
                warn!("{}: prefab instance without a source prefab", self.asset_path);
                continue;
            };
            let Some(metadata) = catalog.get_by_guid(AssetType::Model, model_guid) else {
                // Scenes commonly place prefabs outside the scanned folders
                debug!("{}: skipping placement of unknown model {}", self.asset_path, model_guid);
                self.unresolved.push(UnresolvedReference {
                    asset_type: self.asset_type,
                    asset_path: self.asset_path.to_string(),
                    target_type: AssetType::Model,
                    guid: model_guid.to_string(),
                });
                continue;
            };

            payload.models.push(ModelPlacement {
                asset_path: metadata.asset_path().to_string(),
                transform: self.transform_overrides(instance),
            });
        }
        Ok(payload)
    }

    fn transform_overrides(&self, instance: &Node) -> TransformOverrides {
        let mut transform = TransformOverrides::default();
        for group in modifications(instance) {
            let Some(property_path) = group
                .find_node(property_names::PROPERTY_PATH)
                .and_then(Node::scalar)
            else {
                continue;
            };
            let Some((component, axis)) = property_path.split_once('.') else {
                continue;
            };
            if axis.contains('.') {
                continue;
            }
            let (target, default) = match component {
                property_names::LOCAL_POSITION => (&mut transform.position, 0.0),
                property_names::LOCAL_EULER_ANGLES_HINT => (&mut transform.rotation, 0.0),
                property_names::LOCAL_SCALE => (&mut transform.scale, 1.0),
                _ => continue,
            };

            let raw = group
                .find_node(property_names::VALUE)
                .and_then(Node::scalar)
                .unwrap_or_default();
            let Some(value) = parse_number(raw) else {
                warn!("{}: {} = {:?} is not numeric", self.asset_path, property_path, raw);
                continue;
            };
            // Defaults are inherited from the model, only overrides are kept
            if value == default {
                continue;
            }
            if !target.set_from_y_up(axis, value) {
                debug!("{}: ignoring axis {}", self.asset_path, property_path);
            }
        }
        transform
    }
}

/// The two layouts a model prefab can have
enum ModelShape<'a> {
    /// The prefab renders its own mesh
    DirectRenderer {
        renderers: Vec<&'a Node>,
        filter: &'a Node,
    },
    /// The prefab instantiates another prefab and overrides its materials
    PrefabInstance { instances: Vec<&'a Node> },
}

impl<'a> ModelShape<'a> {
    fn detect(doc: &'a YamlDocument, source_file: &Path) -> Result<Self> {
        let renderers = doc.filter_by_class(class_names::MESH_RENDERER);
        if !renderers.is_empty() {
            let filter = doc.entry(class_names::MESH_FILTER).ok_or_else(|| {
                CatalogError::missing_field(class_names::MESH_FILTER, source_file)
            })?;
            return Ok(ModelShape::DirectRenderer { renderers, filter });
        }

        let instances = doc.filter_by_class(class_names::PREFAB_INSTANCE);
        if !instances.is_empty() {
            return Ok(ModelShape::PrefabInstance { instances });
        }

        Err(CatalogError::unknown_shape(
            AssetType::Model.as_str(),
            source_file,
            "neither a MeshRenderer nor a PrefabInstance",
        ))
    }
}

/// GUID of a `{fileID: ..., guid: ..., type: ...}` reference. Null
/// references (`{fileID: 0}`) have none.
fn reference_guid(node: &Node) -> Option<&str> {
    node.get(GUID_FIELD).filter(|guid| !guid.is_empty())
}

fn source_prefab_guid(instance: &Node) -> Option<&str> {
    instance
        .child(property_names::SOURCE_PREFAB)
        .and_then(reference_guid)
}

/// Leading node of every record in a `m_SavedProperties` block
fn slots<'n>(saved: Option<&'n Node>, block: &str) -> Vec<&'n Node> {
    saved
        .and_then(|saved| saved.child(block))
        .map(|block| block.groups().iter().filter_map(Group::first_node).collect())
        .unwrap_or_default()
}

/// Modification records of a prefab instance
fn modifications(instance: &Node) -> &[Group] {
    instance
        .find_path(&format!(
            "{}/{}",
            property_names::MODIFICATION,
            property_names::MODIFICATIONS
        ))
        .map(Node::groups)
        .unwrap_or_default()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Components of an inline `{r: 1, g: 0.5, b: 0.2, a: 1}` in document order
fn parse_color(slot: &Node) -> Option<Vec<f64>> {
    let components = slot.value().as_map()?;
    components.values().map(|raw| parse_number(raw)).collect()
}
