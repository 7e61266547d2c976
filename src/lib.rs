//! Unity Asset Catalog
//!
//! Builds a searchable catalog of the assets in a Unity project: textures,
//! meshes, materials, material instances, prefab models and scenes. Each
//! asset gets a logical path, its GUID from the `.meta` sidecar, the file
//! modification time, and for reference-carrying types a payload with the
//! resolved references to other catalog entries.
//!
//! The catalog persists to a JSON cache; unchanged files are never parsed
//! twice.
//!
//! # Examples
//!
//! ```rust,no_run
//! use unity_asset_catalog::{AssetKey, AssetResolver, AssetType};
//!
//! let mut resolver = AssetResolver::new("MyProject");
//! if !resolver.is_valid_config() {
//!     resolver.create_default_config()?;
//! }
//! let report = resolver.process()?;
//! println!("registered {} assets", report.total_registered());
//!
//! if let Some(model) = resolver.get_asset_metadata(AssetType::Model, AssetKey::Path("MyProject/Rock")) {
//!     println!("mesh: {:?}", model.payload().as_model().and_then(|m| m.mesh.as_deref()));
//! }
//! resolver.close()?;
//!
//! # Ok::<(), unity_asset_catalog::CatalogError>(())
//! ```

pub mod asset_type;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod metadata;
pub mod payload;
pub mod resolver;
pub mod sidecar;

// Re-export from core and YAML crates
pub use unity_catalog_core::{
    CatalogError, Children, Group, Node, NodeValue, Result, UnityValue, constants::*,
};
pub use unity_catalog_yaml::{ParseMode, ParseOptions, TextEncoding, YamlDocument};

pub use asset_type::AssetType;
pub use catalog::{AssetCatalog, AssetKey, CACHE_FILE_NAME};
pub use config::{
    AssetPathInfo, AssetTypeConfig, CONFIG_FILE_NAME, CatalogConfig, MaterialCreateInfo,
};
pub use extract::UnresolvedReference;
pub use metadata::AssetMetadata;
pub use payload::{
    AssetPayload, MaterialInstancePayload, ModelPayload, ModelPlacement, ScenePayload,
    TransformOverrides, Vec3Override,
};
pub use resolver::{AssetResolver, ProcessReport, ResolverOptions};
