//! Parsed document tree
//!
//! A [`Node`] is one `name: value` position of a Unity YAML document. Its
//! children are either plain child nodes or, at a list position such as
//! `m_Materials` or `m_TexEnvs`, a sequence of [`Group`]s where each group
//! holds the nodes of one list record. Same-named records stay separate
//! groups, which is the part a general YAML mapping model cannot express for
//! these files.

use crate::error::{CatalogError, Result};
use crate::unity_value::UnityValue;
use indexmap::IndexMap;
use indexmap::map::Entry;

/// The inline value carried on a node's own line
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeValue {
    /// Nothing after the colon: the node is a block header or empty
    #[default]
    Absent,
    /// Plain scalar text
    Scalar(String),
    /// Inline flow map, `{fileID: 0, guid: ..., type: 2}`
    Map(IndexMap<String, String>),
    /// Inline flow sequence, `[]` or `[a, b]`, or a collapsed list of scalars
    Sequence(Vec<String>),
}

impl NodeValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, NodeValue::Absent)
    }

    /// Flow collections are always terminal, they never open a block
    pub fn is_flow_collection(&self) -> bool {
        matches!(self, NodeValue::Map(_) | NodeValue::Sequence(_))
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            NodeValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, String>> {
        match self {
            NodeValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            NodeValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    fn to_unity_value(&self) -> UnityValue {
        match self {
            NodeValue::Absent => UnityValue::Null,
            NodeValue::Scalar(s) => UnityValue::String(s.clone()),
            NodeValue::Map(map) => UnityValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), UnityValue::String(v.clone())))
                    .collect(),
            ),
            NodeValue::Sequence(items) => {
                UnityValue::Array(items.iter().cloned().map(UnityValue::String).collect())
            }
        }
    }
}

/// One record of a repeated list position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    nodes: Vec<Node>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The `index`-th node of the record
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// The record's leading node, which names list entries like `- _MainTex:`
    pub fn first_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// Depth-first search for a named node inside this record
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find_map(|node| node.find(name))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn to_unity_value(&self) -> UnityValue {
        if let [only] = self.nodes.as_slice()
            && only.name.is_empty()
        {
            return only.to_value();
        }
        UnityValue::Object(collect_values(&self.nodes))
    }
}

/// Children of a node: plain nodes, or repeated list records
#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    Nodes(Vec<Node>),
    Groups(Vec<Group>),
}

impl Default for Children {
    fn default() -> Self {
        Children::Nodes(Vec::new())
    }
}

/// A parsed structural unit of a Unity YAML document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    name: String,
    value: NodeValue,
    depth: usize,
    children: Children,
}

impl Node {
    /// Create a node. The depth is fixed for the node's lifetime.
    pub fn new<S: Into<String>>(name: S, value: NodeValue, depth: usize) -> Self {
        Self {
            name: name.into(),
            value,
            depth,
            children: Children::default(),
        }
    }

    /// Create the depth-0 root that holds a document's top-level entries
    pub fn root() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Scalar value, or `None` for absent/flow values
    pub fn scalar(&self) -> Option<&str> {
        self.value.as_scalar()
    }

    /// Look up one key of an inline flow-map value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.value
            .as_map()
            .and_then(|map| map.get(key))
            .map(String::as_str)
    }

    /// Like [`Node::get`] with a fallback
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn is_group_repeated(&self) -> bool {
        matches!(self.children, Children::Groups(_))
    }

    pub fn has_children(&self) -> bool {
        match &self.children {
            Children::Nodes(nodes) => !nodes.is_empty(),
            Children::Groups(groups) => !groups.is_empty(),
        }
    }

    pub fn children_shape(&self) -> &Children {
        &self.children
    }

    /// Plain child nodes; empty for a group-repeated node
    pub fn children(&self) -> &[Node] {
        match &self.children {
            Children::Nodes(nodes) => nodes,
            Children::Groups(_) => &[],
        }
    }

    /// List records; empty unless the node is group-repeated
    pub fn groups(&self) -> &[Group] {
        match &self.children {
            Children::Groups(groups) => groups,
            Children::Nodes(_) => &[],
        }
    }

    /// First plain child with the given name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|child| child.name == name)
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children().first()
    }

    /// All plain children with the given name, in document order
    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Node> + use<'a, 'n> {
        self.children().iter().filter(move |child| child.name == name)
    }

    /// Follow a `/`-separated chain of child names
    pub fn find_path(&self, path: &str) -> Option<&Node> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Depth-first search for a node with the given name, starting at `self`
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        match &self.children {
            Children::Nodes(nodes) => nodes.iter().find_map(|node| node.find(name)),
            Children::Groups(groups) => groups.iter().find_map(|group| group.find_node(name)),
        }
    }

    /// Start a new list record. Returns `false` when the node already has
    /// plain children, which cannot be mixed with records.
    pub fn open_group(&mut self) -> bool {
        if let Children::Groups(groups) = &mut self.children {
            groups.push(Group::new());
            return true;
        }
        if self.has_children() {
            return false;
        }
        self.children = Children::Groups(vec![Group::new()]);
        true
    }

    /// Attach a child to the current record, or directly when not group-repeated
    pub fn attach(&mut self, child: Node) {
        match &mut self.children {
            Children::Nodes(nodes) => nodes.push(child),
            Children::Groups(groups) => match groups.last_mut() {
                Some(group) => group.push(child),
                None => groups.push(Group { nodes: vec![child] }),
            },
        }
    }

    /// Detach the last node of the last record so it can be extended
    pub fn take_last_member(&mut self) -> Option<Node> {
        match &mut self.children {
            Children::Groups(groups) => groups.last_mut().and_then(|group| group.nodes.pop()),
            Children::Nodes(_) => None,
        }
    }

    /// Peek at the last node of the last record
    pub fn last_member(&self) -> Option<&Node> {
        self.groups().last().and_then(|group| group.nodes.last())
    }

    /// Turn a list whose every record is one bare scalar into a sequence value
    pub fn collapse_scalar_groups(&mut self) -> bool {
        let Children::Groups(groups) = &self.children else {
            return false;
        };
        if !self.value.is_absent() || groups.is_empty() {
            return false;
        }
        let items: Option<Vec<String>> = groups
            .iter()
            .map(|group| match group.nodes.as_slice() {
                [only] if only.name.is_empty() && !only.has_children() => {
                    only.scalar().map(str::to_string)
                }
                _ => None,
            })
            .collect();
        match items {
            Some(items) => {
                self.value = NodeValue::Sequence(items);
                self.children = Children::default();
                true
            }
            None => false,
        }
    }

    /// Flatten a simple tree into nested maps of scalars.
    ///
    /// Fails on group-repeated nodes and on duplicate sibling names; use
    /// [`Node::to_value`] for documents that have either.
    pub fn to_flat_map(&self) -> Result<IndexMap<String, UnityValue>> {
        let mut contents = IndexMap::new();
        for child in self.children() {
            if child.is_group_repeated() {
                return Err(CatalogError::GroupedNode {
                    name: child.name.clone(),
                });
            }
            let value = if child.has_children() {
                UnityValue::Object(child.to_flat_map()?)
            } else {
                child.value.to_unity_value()
            };
            match contents.entry(child.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(CatalogError::DuplicateKey {
                        key: child.name.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
        Ok(contents)
    }

    /// Group-aware export: records become arrays, repeated sibling names
    /// become arrays of their values.
    pub fn to_value(&self) -> UnityValue {
        match &self.children {
            Children::Groups(groups) => {
                UnityValue::Array(groups.iter().map(Group::to_unity_value).collect())
            }
            Children::Nodes(nodes) if !nodes.is_empty() => UnityValue::Object(collect_values(nodes)),
            Children::Nodes(_) => self.value.to_unity_value(),
        }
    }
}

// Repeated sibling names (several `MeshRenderer` documents in one file)
// keep every value by becoming an array.
fn collect_values(nodes: &[Node]) -> IndexMap<String, UnityValue> {
    let mut gathered: IndexMap<String, Vec<UnityValue>> = IndexMap::new();
    for node in nodes {
        gathered
            .entry(node.name.clone())
            .or_default()
            .push(node.to_value());
    }
    gathered
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                UnityValue::Array(values)
            };
            (name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(name: &str, value: &str, depth: usize) -> Node {
        Node::new(name, NodeValue::Scalar(value.to_string()), depth)
    }

    fn flow_map(name: &str, pairs: &[(&str, &str)], depth: usize) -> Node {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Node::new(name, NodeValue::Map(map), depth)
    }

    #[test]
    fn test_child_queries() {
        let mut material = Node::new("Material", NodeValue::Absent, 1);
        material.attach(scalar("m_Name", "Rock_01", 2));
        material.attach(flow_map(
            "m_Shader",
            &[("fileID", "4800000"), ("guid", "abc"), ("type", "3")],
            2,
        ));

        assert_eq!(material.child("m_Name").and_then(Node::scalar), Some("Rock_01"));
        assert_eq!(material.child("m_Shader").and_then(|n| n.get("guid")), Some("abc"));
        assert_eq!(material.child("m_Shader").map(|n| n.get_or("missing", "-")), Some("-"));
        assert_eq!(material.first_child().map(Node::name), Some("m_Name"));
        assert!(material.child("m_Missing").is_none());
        assert_eq!(material.children().len(), 2);
    }

    #[test]
    fn test_children_named_outlives_name() {
        let mut root = Node::root();
        root.attach(Node::new("Transform", NodeValue::Absent, 1));
        root.attach(Node::new("MeshFilter", NodeValue::Absent, 1));
        root.attach(Node::new("Transform", NodeValue::Absent, 1));

        // The borrowed name only lives as long as the lookup
        fn named<'a>(node: &'a Node, name: &str) -> Vec<&'a Node> {
            node.children_named(name).collect()
        }
        let transforms = {
            let class_name = String::from("Transform");
            named(&root, &class_name)
        };
        assert_eq!(transforms.len(), 2);
        assert!(transforms.iter().all(|node| node.name() == "Transform"));
    }

    #[test]
    fn test_groups_and_find_node() {
        let mut mods = Node::new("m_Modifications", NodeValue::Absent, 3);
        for (path, value) in [("m_LocalPosition.x", "1"), ("m_LocalPosition.y", "5")] {
            assert!(mods.open_group());
            mods.attach(flow_map("target", &[("fileID", "1")], 4));
            mods.attach(scalar("propertyPath", path, 4));
            mods.attach(scalar("value", value, 4));
        }

        assert!(mods.is_group_repeated());
        assert_eq!(mods.groups().len(), 2);
        assert!(mods.children().is_empty());
        let second = &mods.groups()[1];
        assert_eq!(second.len(), 3);
        assert_eq!(
            second.find_node("propertyPath").and_then(Node::scalar),
            Some("m_LocalPosition.y")
        );
        assert_eq!(second.node(0).map(Node::name), Some("target"));
        assert_eq!(second.first_node(), second.node(0));
    }

    #[test]
    fn test_open_group_rejects_mixed_children() {
        let mut node = Node::new("m_Component", NodeValue::Absent, 1);
        node.attach(scalar("serializedVersion", "2", 2));
        assert!(!node.open_group());
        assert!(!node.is_group_repeated());
    }

    #[test]
    fn test_take_last_member() {
        let mut node = Node::new("m_List", NodeValue::Absent, 1);
        node.open_group();
        node.attach(scalar("first", "1", 2));
        let member = node.take_last_member().unwrap();
        assert_eq!(member.name(), "first");
        assert!(node.groups()[0].is_empty());
        node.attach(member);
        assert_eq!(node.last_member().map(Node::name), Some("first"));
    }

    #[test]
    fn test_collapse_scalar_groups() {
        let mut keywords = Node::new("m_ValidKeywords", NodeValue::Absent, 2);
        for keyword in ["_NORMALMAP", "_EMISSION"] {
            keywords.open_group();
            keywords.attach(scalar("", keyword, 3));
        }
        assert!(keywords.collapse_scalar_groups());
        assert!(!keywords.is_group_repeated());
        assert_eq!(
            keywords.value().as_sequence(),
            Some(&["_NORMALMAP".to_string(), "_EMISSION".to_string()][..])
        );

        let mut materials = Node::new("m_Materials", NodeValue::Absent, 2);
        materials.open_group();
        materials.attach(flow_map("", &[("guid", "abc")], 3));
        assert!(!materials.collapse_scalar_groups());
        assert!(materials.is_group_repeated());
    }

    #[test]
    fn test_find_path() {
        let mut root = Node::root();
        let mut material = Node::new("Material", NodeValue::Absent, 1);
        let mut saved = Node::new("m_SavedProperties", NodeValue::Absent, 2);
        saved.attach(scalar("serializedVersion", "3", 3));
        material.attach(saved);
        root.attach(material);

        let version = root.find_path("Material/m_SavedProperties/serializedVersion");
        assert_eq!(version.and_then(Node::scalar), Some("3"));
        assert!(root.find_path("Material/m_Missing").is_none());
        assert_eq!(root.find("serializedVersion").map(Node::depth), Some(3));
    }

    #[test]
    fn test_to_flat_map() {
        let mut root = Node::root();
        root.attach(scalar("fileFormatVersion", "2", 1));
        root.attach(scalar("guid", "0123abcd", 1));
        let mut importer = Node::new("TextureImporter", NodeValue::Absent, 1);
        importer.attach(flow_map("externalObjects", &[], 2));
        importer.attach(Node::new("internalIDToNameTable", NodeValue::Sequence(vec![]), 2));
        root.attach(importer);

        let flat = root.to_flat_map().unwrap();
        assert_eq!(flat["guid"], UnityValue::from("0123abcd"));
        let importer = flat["TextureImporter"].as_object().unwrap();
        assert_eq!(importer["externalObjects"], UnityValue::Object(IndexMap::new()));
        assert_eq!(importer["internalIDToNameTable"], UnityValue::Array(vec![]));
    }

    #[test]
    fn test_to_flat_map_rejects_groups_and_duplicates() {
        let mut root = Node::root();
        let mut list = Node::new("m_Materials", NodeValue::Absent, 1);
        list.open_group();
        list.attach(flow_map("", &[("guid", "abc")], 2));
        root.attach(list);
        assert!(matches!(
            root.to_flat_map(),
            Err(CatalogError::GroupedNode { name }) if name == "m_Materials"
        ));

        let mut root = Node::root();
        root.attach(scalar("MeshRenderer", "a", 1));
        root.attach(scalar("MeshRenderer", "b", 1));
        assert!(matches!(root.to_flat_map(), Err(CatalogError::DuplicateKey { .. })));
    }

    #[test]
    fn test_to_value_keeps_groups_and_duplicates() {
        let mut root = Node::root();
        let mut list = Node::new("m_Materials", NodeValue::Absent, 1);
        for guid in ["a", "b"] {
            list.open_group();
            list.attach(flow_map("", &[("guid", guid)], 2));
        }
        root.attach(list);
        root.attach(scalar("m_Name", "first", 1));
        root.attach(scalar("m_Name", "second", 1));
        root.attach(scalar("m_Name", "third", 1));

        let value = root.to_value();
        let materials = value.get("m_Materials").and_then(UnityValue::as_array).unwrap();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[1].get("guid"), Some(&UnityValue::from("b")));
        let names = value.get("m_Name").and_then(UnityValue::as_array).unwrap();
        assert_eq!(names.len(), 3);
    }
}
