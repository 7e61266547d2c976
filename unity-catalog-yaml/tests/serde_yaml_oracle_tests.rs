//! Cross-checks against serde_yaml
//!
//! For documents without repeated same-named records, the structural reader
//! and a general YAML parser must agree on every value. serde_yaml types its
//! scalars, so both sides are compared in string-leaf form.

use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use unity_catalog_yaml::{UnityValue, YamlDocument};

fn fixture_text(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).unwrap()
}

/// Strip directives and document separators so serde_yaml sees one plain document
fn plain_document(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with('%') && !line.starts_with("---"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_unity_value(value: serde_yaml::Value) -> UnityValue {
    match value {
        serde_yaml::Value::Null => UnityValue::Null,
        serde_yaml::Value::Bool(b) => UnityValue::String(b.to_string()),
        serde_yaml::Value::Number(n) => UnityValue::String(n.to_string()),
        serde_yaml::Value::String(s) => UnityValue::String(s),
        serde_yaml::Value::Sequence(items) => {
            UnityValue::Array(items.into_iter().map(to_unity_value).collect())
        }
        serde_yaml::Value::Mapping(map) => UnityValue::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let key = k.as_str().map(str::to_string).unwrap_or_default();
                    (key, to_unity_value(v))
                })
                .collect::<IndexMap<_, _>>(),
        ),
        serde_yaml::Value::Tagged(tagged) => to_unity_value(tagged.value),
    }
}

fn assert_agrees(name: &str) {
    let text = plain_document(&fixture_text(name));
    let ours = YamlDocument::parse(&text).unwrap().root().to_value();
    let oracle = to_unity_value(serde_yaml::from_str(&text).unwrap());
    assert_eq!(ours, oracle, "{} disagrees with serde_yaml", name);
    println!("✓ {} agrees with serde_yaml", name);
}

/// Test a sidecar, which flattens without groups
#[test]
fn test_sidecar_matches_oracle() {
    assert_agrees("Rock_01.png.meta");

    let text = plain_document(&fixture_text("Rock_01.png.meta"));
    let flat = YamlDocument::parse(&text).unwrap().root().to_flat_map().unwrap();
    let oracle = to_unity_value(serde_yaml::from_str(&text).unwrap());
    assert_eq!(UnityValue::Object(flat), oracle);
}

/// Test a material, whose list records map to single-key mappings
#[test]
fn test_material_matches_oracle() {
    assert_agrees("Rock_01.mat");
}

/// Test a prefab instance with multi-line modification records
#[test]
fn test_prefab_instance_matches_oracle() {
    assert_agrees("RockVariant.prefab");
}
