//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Dmx Node Tree
//!
//! Read-only snapshot of one document subtree (domain, query, data-object or
//! mapper map). A snapshot is an id-keyed adjacency map plus a well-known
//! root id; every node carries a loosely typed property bag whose
//! `__node_name__` key selects its kind.
//!
//! ## Wire Format
//!
//! ```json
//! {
//!   "__ROOT__": { "id": "__ROOT__", "children": { "agg-1": 1 }, "properties": { "__node_name__": "__ROOT__" } },
//!   "agg-1": { "id": "agg-1", "parent": "__ROOT__", "children": {}, "properties": { "__node_name__": "aggregation", "uuid": "agg-1", "name": "Order" } }
//! }
//! ```
//!
//! `children` may be either an object keyed by child id or a plain list.
//! Child order is normalised to sorted id order, so compilation never
//! depends on map iteration order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::DEFAULT_ROOT_ID;
use crate::errors::{DmError, Result};

/// Property-bag key holding the node kind discriminator.
pub const NODE_NAME_KEY: &str = "__node_name__";

/// Node kinds understood by the compilers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DmNodeKind {
    Root,
    Aggregation,
    Entity,
    ValueObject,
    Enum,
    Command,
    Rule,
    Query,
    Dto,
    DataObject,
    MapperObject,
    Other(String),
}

impl DmNodeKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            DEFAULT_ROOT_ID => DmNodeKind::Root,
            "aggregation" => DmNodeKind::Aggregation,
            "entity" => DmNodeKind::Entity,
            "value-object" => DmNodeKind::ValueObject,
            "enum" => DmNodeKind::Enum,
            "command" => DmNodeKind::Command,
            "rule" => DmNodeKind::Rule,
            "query" => DmNodeKind::Query,
            "dto" => DmNodeKind::Dto,
            "dataObject" => DmNodeKind::DataObject,
            "mapperObject" => DmNodeKind::MapperObject,
            other => DmNodeKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DmNodeKind::Root => DEFAULT_ROOT_ID,
            DmNodeKind::Aggregation => "aggregation",
            DmNodeKind::Entity => "entity",
            DmNodeKind::ValueObject => "value-object",
            DmNodeKind::Enum => "enum",
            DmNodeKind::Command => "command",
            DmNodeKind::Rule => "rule",
            DmNodeKind::Query => "query",
            DmNodeKind::Dto => "dto",
            DmNodeKind::DataObject => "dataObject",
            DmNodeKind::MapperObject => "mapperObject",
            DmNodeKind::Other(name) => name,
        }
    }
}

impl fmt::Display for DmNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One visual element of the document.
#[derive(Clone, Debug, PartialEq)]
pub struct DmNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub child_ids: BTreeSet<String>,
    pub kind: DmNodeKind,
    pub properties: Map<String, Value>,
}

impl DmNode {
    /// Builds a node whose property bag is `properties` plus the kind
    /// discriminator. Non-object `properties` are treated as empty.
    pub fn new(id: impl Into<String>, kind: DmNodeKind, properties: Value) -> Self {
        let mut bag = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        bag.insert(
            NODE_NAME_KEY.to_string(),
            Value::String(kind.as_str().to_string()),
        );
        Self {
            id: id.into(),
            parent_id: None,
            child_ids: BTreeSet::new(),
            kind,
            properties: bag,
        }
    }

    /// The `uuid` the property bag declares, if any.
    pub fn declared_uuid(&self) -> Option<&str> {
        self.properties
            .get("uuid")
            .and_then(Value::as_str)
            .filter(|uuid| !uuid.is_empty())
    }

    /// Fails when the declared uuid differs from the node id.
    pub fn check_identity(&self) -> Result<()> {
        match self.declared_uuid() {
            Some(uuid) if uuid != self.id => Err(DmError::identifier_mismatch(&self.id, uuid)),
            _ => Ok(()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

/// Raw node record as it appears in a snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DmRawNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl DmRawNode {
    fn child_ids(&self) -> Result<BTreeSet<String>> {
        match &self.children {
            Value::Null => Ok(BTreeSet::new()),
            Value::Object(map) => Ok(map.keys().cloned().collect()),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        DmError::schema(format!(
                            "node '{}' lists a non-string child id: {}",
                            self.id, item
                        ))
                    })
                })
                .collect(),
            other => Err(DmError::schema(format!(
                "node '{}' has malformed children: {}",
                self.id, other
            ))),
        }
    }
}

impl TryFrom<DmRawNode> for DmNode {
    type Error = DmError;

    fn try_from(raw: DmRawNode) -> Result<Self> {
        let child_ids = raw.child_ids()?;
        let kind = raw
            .properties
            .get(NODE_NAME_KEY)
            .and_then(Value::as_str)
            .map(DmNodeKind::from_name)
            .unwrap_or_else(|| DmNodeKind::Other(String::new()));
        Ok(DmNode {
            id: raw.id,
            parent_id: raw.parent,
            child_ids,
            kind,
            properties: raw.properties,
        })
    }
}

impl From<&DmNode> for DmRawNode {
    fn from(node: &DmNode) -> Self {
        let children = node
            .child_ids
            .iter()
            .map(|id| (id.clone(), Value::from(1)))
            .collect::<Map<_, _>>();
        DmRawNode {
            id: node.id.clone(),
            parent: node.parent_id.clone(),
            children: Value::Object(children),
            properties: node.properties.clone(),
        }
    }
}

/// Id-keyed snapshot of one subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, DmRawNode>", into = "BTreeMap<String, DmRawNode>")]
pub struct DmTree {
    root_id: String,
    nodes: BTreeMap<String, DmNode>,
}

impl Default for DmTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_ID)
    }
}

impl DmTree {
    /// Creates a tree holding only its root node.
    pub fn new(root_id: impl Into<String>) -> Self {
        let root_id = root_id.into();
        let root = DmNode::new(root_id.clone(), DmNodeKind::Root, Value::Null);
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id.clone(), root);
        Self { root_id, nodes }
    }

    /// Builds a tree from already decoded nodes.
    pub fn from_nodes(root_id: impl Into<String>, nodes: impl IntoIterator<Item = DmNode>) -> Self {
        Self {
            root_id: root_id.into(),
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    pub fn from_value(value: Value, root_id: &str) -> Result<Self> {
        let raw: BTreeMap<String, DmRawNode> = serde_json::from_value(value)?;
        Self::from_raw(raw, root_id)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let raw: BTreeMap<String, DmRawNode> = serde_json::from_str(source)?;
        Self::from_raw(raw, DEFAULT_ROOT_ID)
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let raw: BTreeMap<String, DmRawNode> = serde_yaml::from_str(source)?;
        Self::from_raw(raw, DEFAULT_ROOT_ID)
    }

    /// Loads a snapshot file, choosing the format by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            other => Err(DmError::validation(format!(
                "unsupported snapshot extension '{}'",
                other
            ))),
        }
    }

    fn from_raw(raw: BTreeMap<String, DmRawNode>, root_id: &str) -> Result<Self> {
        let mut nodes = BTreeMap::new();
        for (key, node) in raw {
            if key != node.id {
                return Err(DmError::schema(format!(
                    "snapshot key '{}' holds node '{}'",
                    key, node.id
                )));
            }
            nodes.insert(key, DmNode::try_from(node)?);
        }
        Ok(Self {
            root_id: root_id.to_string(),
            nodes,
        })
    }

    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root(&self) -> Option<&DmNode> {
        self.nodes.get(&self.root_id)
    }

    pub fn get(&self, id: &str) -> Option<&DmNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DmNode> {
        self.nodes.values()
    }

    /// Children present in the tree, in id order. Dangling child ids are
    /// skipped.
    pub fn children<'a>(&'a self, node: &'a DmNode) -> impl Iterator<Item = &'a DmNode> + 'a {
        node.child_ids.iter().filter_map(move |id| self.nodes.get(id))
    }

    /// Parent node, or `None` when the parent is the root or absent.
    pub fn parent(&self, node: &DmNode) -> Option<&DmNode> {
        node.parent_id
            .as_deref()
            .filter(|id| *id != self.root_id)
            .and_then(|id| self.nodes.get(id))
    }

    /// Inserts `node` below `parent_id`, wiring both directions.
    pub fn add_child(&mut self, parent_id: &str, mut node: DmNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(DmError::validation(format!(
                "node '{}' already exists",
                node.id
            )));
        }
        let parent = self.nodes.get_mut(parent_id).ok_or_else(|| {
            DmError::validation(format!("parent node '{}' not found", parent_id))
        })?;
        parent.child_ids.insert(node.id.clone());
        node.parent_id = Some(parent_id.to_string());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Convenience for [`DmTree::add_child`] below the root.
    pub fn add_root_child(&mut self, node: DmNode) -> Result<()> {
        let root_id = self.root_id.clone();
        self.add_child(&root_id, node)
    }

    pub fn to_json(&self) -> Result<String> {
        let raw: BTreeMap<String, DmRawNode> = self.clone().into();
        Ok(serde_json::to_string(&raw)?)
    }
}

impl TryFrom<BTreeMap<String, DmRawNode>> for DmTree {
    type Error = DmError;

    fn try_from(raw: BTreeMap<String, DmRawNode>) -> Result<Self> {
        Self::from_raw(raw, DEFAULT_ROOT_ID)
    }
}

impl From<DmTree> for BTreeMap<String, DmRawNode> {
    fn from(tree: DmTree) -> Self {
        tree.nodes
            .values()
            .map(|node| (node.id.clone(), DmRawNode::from(node)))
            .collect()
    }
}
