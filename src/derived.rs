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

//! # Derived Relations
//!
//! Recomputes the relationship view of a document snapshot: which objects
//! each object depends on, associates with and aggregates, the edges
//! between them, and which objects hold references that do not resolve.
//! The view is a pure function of the trees passed in; callers decide
//! when a change makes it stale.
//!
//! | object | associations | dependencies | aggregations |
//! |---|---|---|---|
//! | entity, value object, DTO | property types | method signatures | |
//! | command | property and event types | | its rules |
//! | query | property types | result type | its rules |
//! | aggregation | | | its objects and commands |
//! | data object | reference column targets | | |

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::{read_node, DmCommand, DmDataObject, DmDto, DmEntity, DmQuery, DmRule, DmValueObject};
use crate::storage::DmStorageType;
use crate::traverse::{traverse, DmPostTraverse, DmTreeHandler};
use crate::tree::{DmNode, DmNodeKind, DmTree};
use crate::types::{class_dependencies, command_dependencies, query_dependencies, unique};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DmRelationship {
    Dependency,
    Association,
    Aggregation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmEdge {
    /// `"<source>-><target>"`.
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship: DmRelationship,
}

/// Resolved relations of one object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmObjectRelations {
    pub id: String,
    pub kind: String,
    pub dependencies: Vec<String>,
    pub associations: Vec<String>,
    pub aggregations: Vec<String>,
    /// Some referenced id does not resolve to an object in the snapshot.
    pub has_references_error: bool,
}

impl DmObjectRelations {
    fn edges(&self) -> impl Iterator<Item = DmEdge> + '_ {
        self.dependencies
            .iter()
            .map(|t| (t, DmRelationship::Dependency))
            .chain(self.associations.iter().map(|t| (t, DmRelationship::Association)))
            .chain(self.aggregations.iter().map(|t| (t, DmRelationship::Aggregation)))
            .filter(move |(target, _)| **target != self.id)
            .map(move |(target, relationship)| DmEdge {
                id: format!("{}->{}", self.id, target),
                source: self.id.clone(),
                target: target.clone(),
                relationship,
            })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDerivedView {
    pub objects: BTreeMap<String, DmObjectRelations>,
    pub edges: Vec<DmEdge>,
}

impl DmDerivedView {
    pub fn object(&self, id: &str) -> Option<&DmObjectRelations> {
        self.objects.get(id)
    }

    /// Ids of the objects that depend on or associate with `id`.
    pub fn objects_dependent_on(&self, id: &str) -> Vec<&str> {
        self.objects
            .values()
            .filter(|o| o.id != id)
            .filter(|o| o.dependencies.iter().chain(o.associations.iter()).any(|d| d == id))
            .map(|o| o.id.as_str())
            .collect()
    }

    /// Objects flagged with unresolved references.
    pub fn reference_errors(&self) -> Vec<&str> {
        self.objects
            .values()
            .filter(|o| o.has_references_error)
            .map(|o| o.id.as_str())
            .collect()
    }
}

#[derive(Debug, Default)]
struct DmRawRelations {
    kind: String,
    dependencies: Vec<String>,
    associations: Vec<String>,
    aggregations: Vec<String>,
}

/// First pass: raw, unresolved relations of every node.
#[derive(Debug, Default)]
struct DmRelationCollector {
    raw: BTreeMap<String, DmRawRelations>,
    known: BTreeSet<String>,
    /// `(owner, member)` aggregation links found from the member side.
    links: Vec<(String, String)>,
}

impl DmRelationCollector {
    fn record(&mut self, node: &DmNode, dependencies: Vec<String>, associations: Vec<String>) {
        let entry = self.raw.entry(node.id.clone()).or_default();
        entry.kind = node.kind.as_str().to_string();
        entry.dependencies.extend(dependencies);
        entry.associations.extend(associations);
    }

    fn link(&mut self, owner: String, member: String) {
        self.links.push((owner, member));
    }
}

impl DmTreeHandler for DmRelationCollector {
    fn handle(&mut self, node: &DmNode, tree: &DmTree, _post: &mut DmPostTraverse<Self>) -> Result<()> {
        if node.kind == DmNodeKind::Root {
            return Ok(());
        }
        self.known.insert(node.id.clone());

        match node.kind {
            DmNodeKind::Entity | DmNodeKind::ValueObject | DmNodeKind::Dto => {
                let class = match node.kind {
                    DmNodeKind::Entity => read_node::<DmEntity>(node)?.class,
                    DmNodeKind::ValueObject => read_node::<DmValueObject>(node)?.class,
                    _ => read_node::<DmDto>(node)?.class,
                };
                let deps = class_dependencies(&class);
                self.record(node, deps.dependencies, deps.associations);
            }
            DmNodeKind::Command => {
                let command: DmCommand = read_node(node)?;
                self.record(node, Vec::new(), command_dependencies(&command));
                if let Some(aggregation) = command.aggregation.as_ref().and_then(|r| r.target()) {
                    self.link(aggregation.to_string(), node.id.clone());
                }
            }
            DmNodeKind::Query => {
                let query: DmQuery = read_node(node)?;
                let deps = query_dependencies(&query);
                self.record(node, deps.dependencies, deps.associations);
            }
            DmNodeKind::Rule => {
                let rule: DmRule = read_node(node)?;
                self.record(node, Vec::new(), Vec::new());
                if let Some(aggregator) = rule.aggregator.as_ref().and_then(|r| r.target()) {
                    self.link(aggregator.to_string(), node.id.clone());
                }
            }
            DmNodeKind::Aggregation => {
                self.record(node, Vec::new(), Vec::new());
                for child in tree.children(node) {
                    self.link(node.id.clone(), child.id.clone());
                }
            }
            DmNodeKind::DataObject => {
                let object: DmDataObject = read_node(node)?;
                let targets = unique(object.properties.iter().filter_map(|p| match &p.ty {
                    DmStorageType::Reference {
                        target: Some(target),
                        ..
                    } => Some(target.clone()),
                    _ => None,
                }));
                self.record(node, Vec::new(), targets);
            }
            _ => self.record(node, Vec::new(), Vec::new()),
        }
        Ok(())
    }
}

/// Recomputes the relationship view over every tree of a snapshot.
/// References resolve against node ids of all `trees`.
pub fn recompute(trees: &[&DmTree]) -> Result<DmDerivedView> {
    let mut collector = DmRelationCollector::default();
    for tree in trees {
        traverse(&mut collector, tree)?;
    }

    let DmRelationCollector { mut raw, known, links } = collector;
    for (owner, member) in links {
        if let Some(entry) = raw.get_mut(&owner) {
            entry.aggregations.push(member);
        }
    }

    let mut view = DmDerivedView::default();
    for (id, relations) in raw {
        let resolve = |ids: Vec<String>| -> (Vec<String>, bool) {
            let ids = unique(ids);
            let total = ids.len();
            let resolved: Vec<String> = ids.into_iter().filter(|i| known.contains(i)).collect();
            let missing = resolved.len() != total;
            (resolved, missing)
        };
        let (dependencies, missing_dependency) = resolve(relations.dependencies);
        let (associations, missing_association) = resolve(relations.associations);
        let (aggregations, _) = resolve(relations.aggregations);

        let object = DmObjectRelations {
            id: id.clone(),
            kind: relations.kind,
            dependencies,
            associations,
            aggregations,
            has_references_error: missing_dependency || missing_association,
        };
        view.edges.extend(object.edges());
        view.objects.insert(id, object);
    }

    debug!(
        "derived {} objects, {} edges, {} with reference errors",
        view.objects.len(),
        view.edges.len(),
        view.reference_errors().len()
    );
    Ok(view)
}
