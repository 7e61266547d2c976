//! Unity Catalog Core
//!
//! Core data structures shared by the Unity YAML reader and the asset
//! catalog: the parsed node tree, its exported value form, the error type
//! and the Unity class/property names the catalog looks for.

pub mod constants;
pub mod error;
pub mod node;
pub mod unity_value;

// Re-export main types
pub use constants::*;
pub use error::{CatalogError, Result};
pub use node::{Children, Group, Node, NodeValue};
pub use unity_value::UnityValue;
