//! Structure tests against real-shaped Unity asset files
//!
//! Each fixture mirrors what the editor writes for the asset kind, so these
//! tests exercise list records, flow maps and multi-document files together.

use std::path::PathBuf;
use unity_catalog_yaml::{Node, NodeValue, ParseOptions, TextEncoding, YamlDocument};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Test that texture property records keep their nested properties
#[test]
fn test_material_texture_records() {
    let doc = YamlDocument::load_yaml_with_options(fixture("Rock_01.mat"), ParseOptions::strict())
        .unwrap();
    assert_eq!(doc.encoding(), Some(TextEncoding::Utf8));

    let tex_envs = doc
        .root()
        .find_path("Material/m_SavedProperties/m_TexEnvs")
        .unwrap();
    let names: Vec<_> = tex_envs
        .groups()
        .iter()
        .filter_map(|group| group.node(0).map(Node::name))
        .collect();
    assert_eq!(names, vec!["_BaseMap", "_BumpMap", "_EmissionMap"]);

    let bump = tex_envs.groups()[1].node(0).unwrap();
    assert_eq!(
        bump.child("m_Texture").and_then(|t| t.get("guid")),
        Some("6d0e4c3b2f1a5b8c9d7e6f5a4b3c2d1e")
    );
    let emission = tex_envs.groups()[2].node(0).unwrap();
    assert_eq!(emission.child("m_Texture").and_then(|t| t.get("fileID")), Some("0"));
    assert!(emission.child("m_Texture").and_then(|t| t.get("guid")).is_none());

    println!("✓ {} texture records", tex_envs.groups().len());
}

/// Test that color and float records are ordered and individually addressable
#[test]
fn test_material_colors_and_floats() {
    let doc = YamlDocument::load_yaml(fixture("Rock_01.mat")).unwrap();
    let saved = doc.root().find_path("Material/m_SavedProperties").unwrap();

    let colors = saved.child("m_Colors").unwrap();
    let base = colors.groups()[0].node(0).unwrap();
    assert_eq!(base.name(), "_BaseColor");
    let components: Vec<_> = base
        .value()
        .as_map()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        components,
        vec![("r", "1"), ("g", "0.5"), ("b", "0.2"), ("a", "1")]
    );

    let floats = saved.child("m_Floats").unwrap();
    assert_eq!(floats.groups().len(), 3);
    assert_eq!(
        floats.groups()[2].find_node("_Smoothness").and_then(Node::scalar),
        Some("0.35")
    );

    let keywords = doc.root().find_path("Material/m_ValidKeywords").unwrap();
    assert_eq!(
        keywords.value(),
        &NodeValue::Sequence(vec!["_NORMALMAP".to_string()])
    );
}

/// Test a prefab that renders its own mesh
#[test]
fn test_direct_renderer_prefab() {
    let doc = YamlDocument::load_yaml(fixture("Rock.prefab")).unwrap();
    assert_eq!(doc.entries().len(), 4);

    let renderer = doc.entry("MeshRenderer").unwrap();
    let guids: Vec<_> = renderer
        .child("m_Materials")
        .unwrap()
        .groups()
        .iter()
        .filter_map(|group| group.node(0).and_then(|n| n.get("guid")))
        .collect();
    assert_eq!(
        guids,
        vec![
            "1f2e3d4c5b6a79880f1e2d3c4b5a6978",
            "2a3b4c5d6e7f80910a1b2c3d4e5f6071"
        ]
    );

    let mesh = doc
        .entry("MeshFilter")
        .and_then(|f| f.child("m_Mesh"))
        .and_then(|m| m.get("guid"));
    assert_eq!(mesh, Some("8a7b6c5d4e3f2a1b0c9d8e7f6a5b4c3d"));

    let components = doc.root().find_path("GameObject/m_Component").unwrap();
    assert_eq!(components.groups().len(), 3);
}

/// Test a prefab that overrides another prefab through modifications
#[test]
fn test_prefab_instance_modifications() {
    let doc = YamlDocument::load_yaml(fixture("RockVariant.prefab")).unwrap();
    let mods = doc
        .root()
        .find_path("PrefabInstance/m_Modification/m_Modifications")
        .unwrap();
    assert_eq!(mods.groups().len(), 3);

    let material_override = &mods.groups()[1];
    assert_eq!(
        material_override
            .find_node("propertyPath")
            .and_then(Node::scalar),
        Some("m_Materials.Array.data[0]")
    );
    assert!(
        material_override
            .find_node("value")
            .is_some_and(|v| v.value().is_absent())
    );
    assert_eq!(
        material_override
            .find_node("objectReference")
            .and_then(|r| r.get("guid")),
        Some("9e8d7c6b5a4f3e2d1c0b9a8f7e6d5c4b")
    );
}

/// Test that scene documents keep every modification record in order
#[test]
fn test_scene_modifications() {
    let doc = YamlDocument::load_yaml(fixture("Level.unity")).unwrap();
    assert_eq!(doc.filter_by_class("PrefabInstance").len(), 1);
    assert!(doc.entry("OcclusionCullingSettings").is_some());

    let mods = doc
        .root()
        .find_path("PrefabInstance/m_Modification/m_Modifications")
        .unwrap();
    let overrides: Vec<_> = mods
        .groups()
        .iter()
        .map(|group| {
            (
                group.find_node("propertyPath").and_then(Node::scalar).unwrap(),
                group.find_node("value").and_then(Node::scalar).unwrap(),
            )
        })
        .collect();
    assert_eq!(overrides.len(), 6);
    assert_eq!(overrides[1], ("m_LocalPosition.y", "5"));
    assert_eq!(overrides[3], ("m_LocalEulerAnglesHint.y", "90"));

    let scene_guid = doc
        .root()
        .find_path("OcclusionCullingSettings/m_SceneGUID")
        .and_then(Node::scalar);
    assert_eq!(scene_guid, Some("00000000000000000000000000000000"));
}

/// Test reading the GUID out of a sidecar file
#[test]
fn test_sidecar_guid() {
    let doc = YamlDocument::load_yaml(fixture("Rock_01.png.meta")).unwrap();
    let flat = doc.root().to_flat_map().unwrap();
    assert_eq!(
        flat.get("guid").and_then(|v| v.as_str()),
        Some("5c9d3b2a1e0f4a7b8c6d5e4f3a2b1c0d")
    );
    assert!(flat["TextureImporter"].get("userData").unwrap().is_null());
}

/// Test that a missing file surfaces as an IO error
#[test]
fn test_missing_file() {
    let result = YamlDocument::load_yaml(fixture("DoesNotExist.mat"));
    assert!(matches!(result, Err(unity_catalog_yaml::CatalogError::Io(_))));
}
