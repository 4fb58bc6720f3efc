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

//! Data-model compiler.
//!
//! Data objects are indexed at visit time and compiled in deferred
//! closures, since a reference column takes the type of its target column,
//! which may live in an object visited later.
//!
//! Per object the compiler emits:
//!
//! - columns, with reference columns narrowed to `{type: <target kind>}`
//!   and primary keys forced `notNull`
//! - declared indexes, property ids replaced by names
//! - an implicit `Primary` index over the primary-key columns
//! - a reference summary grouping outgoing references by target object

use std::collections::HashMap;

use log::{debug, warn};

use super::{compile_name, compile_node_name, non_empty, reject_kind};
use crate::config::DmConfig;
use crate::dsl::{
    DmDataIndexDsl, DmDataModelDsl, DmDataObjectDsl, DmDataObjectReferenceDsl, DmDataPropertyDsl,
    DmFieldPairDsl, DmNameDsl, DmReferenceTargetDsl,
};
use crate::errors::Result;
use crate::model::{read_node, DmDataObject, DmDataProperty, DmIndexKind};
use crate::storage::DmStorageType;
use crate::traverse::{traverse, DmPostTraverse, DmTreeHandler};
use crate::tree::{DmNode, DmNodeKind, DmTree};

/// Name of the synthesized primary-key index.
pub const PRIMARY_INDEX_NAME: &str = "primaryKeys";

#[derive(Debug, Default)]
pub struct DmDataCompiler {
    config: DmConfig,
    objects: Vec<(DmNameDsl, DmDataObject)>,
    object_index: HashMap<String, usize>,
    compiled: Vec<DmDataObjectDsl>,
    references: Vec<DmDataObjectReferenceDsl>,
}

impl DmDataCompiler {
    pub fn new(config: DmConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn object(&self, id: &str) -> Option<&DmDataObject> {
        self.object_index.get(id).map(|&index| &self.objects[index].1)
    }

    /// Target column of a reference column.
    fn reference_target(&self, property: &DmDataProperty) -> Option<(&DmDataObject, &DmDataProperty)> {
        match &property.ty {
            DmStorageType::Reference {
                target: Some(target),
                target_property: Some(target_property),
                ..
            } => {
                let object = self.object(target)?;
                Some((object, object.property(target_property)?))
            }
            _ => None,
        }
    }

    fn compile_property(&self, owner: &str, property: &DmDataProperty) -> Option<DmDataPropertyDsl> {
        let storage = match &property.ty {
            DmStorageType::Reference { .. } => match self.reference_target(property) {
                Some((_, target)) => DmStorageType::of_kind(target.ty.kind()),
                None => {
                    warn!(
                        "data object '{}' column '{}' references a missing column, skipped",
                        owner, property.base.name
                    );
                    return None;
                }
            },
            other => other.clone().without_empty_default(),
        };

        let not_null = if property.is_primary_key() {
            Some(true)
        } else {
            property.not_null
        };

        Some(DmDataPropertyDsl {
            base: compile_name(&property.base),
            property_name: non_empty(property.property_name.as_ref()),
            storage,
            not_null,
            primary_key: property.primary_key,
        })
    }

    fn compile_object(&self, base: &DmNameDsl, object: &DmDataObject) -> DmDataObjectDsl {
        let properties: Vec<DmDataPropertyDsl> = object
            .properties
            .iter()
            .filter_map(|p| self.compile_property(&base.uuid, p))
            .collect();

        let mut indexes: Vec<DmDataIndexDsl> = object
            .indexes
            .iter()
            .map(|index| DmDataIndexDsl {
                base: compile_name(&index.base),
                kind: index.kind,
                method: index.method,
                properties: index
                    .properties
                    .iter()
                    .filter_map(|id| object.property(id).map(|p| p.base.name.clone()))
                    .collect(),
            })
            .collect();

        let primary_keys: Vec<String> = properties
            .iter()
            .filter(|p| p.primary_key == Some(true))
            .map(|p| p.base.name.clone())
            .collect();
        if !primary_keys.is_empty() {
            indexes.push(DmDataIndexDsl {
                base: DmNameDsl {
                    uuid: format!("{}-primary-key", base.uuid),
                    name: PRIMARY_INDEX_NAME.to_string(),
                    ..DmNameDsl::default()
                },
                kind: DmIndexKind::Primary,
                method: None,
                properties: primary_keys,
            });
        }

        DmDataObjectDsl {
            base: base.clone(),
            table_name: non_empty(object.table_name.as_ref()),
            properties,
            indexes,
        }
    }

    /// Outgoing references grouped by target object name. Self references
    /// and unresolvable targets are left out; the first cardinality seen
    /// for a target wins.
    fn compile_references(&self, base: &DmNameDsl, object: &DmDataObject) -> Option<DmDataObjectReferenceDsl> {
        let mut targets: Vec<DmReferenceTargetDsl> = Vec::new();

        for property in &object.properties {
            let DmStorageType::Reference {
                target: Some(target_id),
                cardinality,
                ..
            } = &property.ty
            else {
                continue;
            };
            if *target_id == base.uuid {
                continue;
            }
            let Some((target_object, target_property)) = self.reference_target(property) else {
                continue;
            };

            let pair = DmFieldPairDsl {
                source_field: property.base.name.clone(),
                target_field: target_property.base.name.clone(),
            };
            match targets.iter_mut().find(|t| t.target == target_object.base.name) {
                Some(existing) => {
                    existing.cardinality = existing.cardinality.or(*cardinality);
                    existing.mapper.push(pair);
                }
                None => targets.push(DmReferenceTargetDsl {
                    target: target_object.base.name.clone(),
                    cardinality: *cardinality,
                    mapper: vec![pair],
                }),
            }
        }

        if targets.is_empty() {
            return None;
        }
        Some(DmDataObjectReferenceDsl {
            source: base.name.clone(),
            targets,
        })
    }

    fn finish_object(&mut self, index: usize) -> Result<()> {
        let (base, object) = &self.objects[index];
        let compiled = self.compile_object(base, object);
        let references = self.compile_references(base, object);
        self.compiled.push(compiled);
        self.references.extend(references);
        Ok(())
    }

    pub fn to_dsl(self) -> DmDataModelDsl {
        DmDataModelDsl {
            data_objects: self.compiled,
            references: self.references,
        }
    }
}

impl DmTreeHandler for DmDataCompiler {
    fn handle(&mut self, node: &DmNode, tree: &DmTree, post: &mut DmPostTraverse<Self>) -> Result<()> {
        match node.kind {
            DmNodeKind::DataObject => {
                let object: DmDataObject = read_node(node)?;
                let base = compile_node_name(node, &object.base);
                let index = self.objects.len();
                self.object_index.insert(node.id.clone(), index);
                self.objects.push((base, object));
                post.add(move |compiler: &mut Self| compiler.finish_object(index));
            }
            _ => reject_kind(node, tree, &self.config, "data")?,
        }
        Ok(())
    }
}

/// Compiles a data-object subtree.
pub fn compile_data_model(tree: &DmTree, config: &DmConfig) -> Result<DmDataModelDsl> {
    debug!("compiling data model of {} nodes", tree.len());
    let mut compiler = DmDataCompiler::new(config.clone());
    traverse(&mut compiler, tree)?;
    Ok(compiler.to_dsl())
}
