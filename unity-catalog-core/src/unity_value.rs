//! Unity value types
//!
//! `UnityValue` is the export form of a parsed node tree: what
//! [`Node::to_flat_map`](crate::Node::to_flat_map) and
//! [`Node::to_value`](crate::Node::to_value) produce. The authoring format
//! carries no type information, so every leaf is a string; numeric
//! interpretation happens on access.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value exported from a Unity document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnityValue {
    Null,
    String(String),
    Array(Vec<UnityValue>),
    Object(IndexMap<String, UnityValue>),
}

impl UnityValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, UnityValue::Null)
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            UnityValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as float, parsing the underlying string
    pub fn as_f64(&self) -> Option<f64> {
        self.as_str().and_then(|s| s.trim().parse().ok())
    }

    /// Get as integer, parsing the underlying string
    pub fn as_i64(&self) -> Option<i64> {
        self.as_str().and_then(|s| s.trim().parse().ok())
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&Vec<UnityValue>> {
        match self {
            UnityValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&IndexMap<String, UnityValue>> {
        match self {
            UnityValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up a key when the value is an object
    pub fn get(&self, key: &str) -> Option<&UnityValue> {
        self.as_object().and_then(|obj| obj.get(key))
    }
}

impl fmt::Display for UnityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnityValue::Null => write!(f, "null"),
            UnityValue::String(s) => write!(f, "{}", s),
            UnityValue::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            UnityValue::Object(obj) => {
                write!(f, "{{")?;
                for (i, (key, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<String> for UnityValue {
    fn from(s: String) -> Self {
        UnityValue::String(s)
    }
}

impl From<&str> for UnityValue {
    fn from(s: &str) -> Self {
        UnityValue::String(s.to_string())
    }
}

impl From<Vec<UnityValue>> for UnityValue {
    fn from(arr: Vec<UnityValue>) -> Self {
        UnityValue::Array(arr)
    }
}

impl From<IndexMap<String, UnityValue>> for UnityValue {
    fn from(obj: IndexMap<String, UnityValue>) -> Self {
        UnityValue::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unity_value_numeric_access() {
        let val: UnityValue = "0.5".into();
        assert_eq!(val.as_f64(), Some(0.5));
        assert_eq!(val.as_i64(), None);

        let val: UnityValue = "-1".into();
        assert_eq!(val.as_i64(), Some(-1));

        let val: UnityValue = "_NORMALMAP".into();
        assert_eq!(val.as_f64(), None);
        assert!(UnityValue::Null.is_null());
    }

    #[test]
    fn test_unity_value_display() {
        let mut color = IndexMap::new();
        color.insert("r".to_string(), UnityValue::from("1"));
        color.insert("g".to_string(), UnityValue::from("0.5"));
        let val = UnityValue::Object(color);
        assert_eq!(format!("{}", val), "{r: 1, g: 0.5}");
        assert_eq!(val.get("g").and_then(UnityValue::as_f64), Some(0.5));

        let val = UnityValue::Array(vec!["a".into(), UnityValue::Null]);
        assert_eq!(format!("{}", val), "[a, null]");
    }
}
