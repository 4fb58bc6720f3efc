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

//! Object-mapper compiler.
//!
//! Mapper sides point into other subtrees, so objects and fields resolve
//! through a [`DmObjectLookup`]. The compiled record names objects and
//! fields instead of pointing at them by id.

use log::{debug, warn};

use super::{compile_node_name, reject_kind};
use crate::config::DmConfig;
use crate::dsl::{DmFieldPairDsl, DmMapperObjectDsl, DmObjectMapperDsl, DmObjectRefDsl};
use crate::errors::Result;
use crate::lookup::{DmObjectEntry, DmObjectLookup};
use crate::model::{read_node, DmMapperObject, DmObjectReference};
use crate::traverse::{traverse, DmPostTraverse, DmTreeHandler};
use crate::tree::{DmNode, DmNodeKind, DmTree};

pub struct DmMapperCompiler<'l> {
    config: DmConfig,
    lookup: &'l dyn DmObjectLookup,
    mappers: Vec<DmMapperObjectDsl>,
}

impl<'l> DmMapperCompiler<'l> {
    pub fn new(config: DmConfig, lookup: &'l dyn DmObjectLookup) -> Self {
        Self {
            config,
            lookup,
            mappers: Vec::new(),
        }
    }

    fn resolve(&self, reference: Option<&DmObjectReference>) -> Option<(DmObjectEntry<'l>, DmObjectRefDsl)> {
        let reference = reference.filter(|r| !r.reference_id.is_empty())?;
        let lookup: &'l dyn DmObjectLookup = self.lookup;
        let entry = lookup.get_object_by_id(&reference.reference_id)?;
        let kind = entry.object.mapper_kind()?;
        let compiled = DmObjectRefDsl {
            name: entry.object.name().to_string(),
            parent: entry.parent.map(|p| p.name.clone()),
            kind,
        };
        Some((entry, compiled))
    }

    fn compile_mapper(&self, node: &DmNode, mapper: &DmMapperObject) -> Option<DmMapperObjectDsl> {
        let Some((source, source_ref)) = self.resolve(mapper.source.as_ref()) else {
            warn!("mapper '{}' has an unresolvable source object, skipped", node.id);
            return None;
        };
        let Some((target, target_ref)) = self.resolve(mapper.target.as_ref()) else {
            warn!("mapper '{}' has an unresolvable target object, skipped", node.id);
            return None;
        };

        let mut pairs = Vec::with_capacity(mapper.mappers.len());
        for field in &mapper.mappers {
            let source_field = field.source.as_deref().and_then(|id| source.object.field_name(id));
            let target_field = field.target.as_deref().and_then(|id| target.object.field_name(id));
            match (source_field, target_field) {
                (Some(source_field), Some(target_field)) => pairs.push(DmFieldPairDsl {
                    source_field: source_field.to_string(),
                    target_field: target_field.to_string(),
                }),
                _ => warn!(
                    "mapper '{}' field pair '{}' does not resolve, skipped",
                    node.id, field.uuid
                ),
            }
        }

        Some(DmMapperObjectDsl {
            base: compile_node_name(node, &mapper.base),
            source: source_ref,
            target: target_ref,
            mapper: pairs,
        })
    }

    pub fn to_dsl(self) -> DmObjectMapperDsl {
        DmObjectMapperDsl {
            mappers: self.mappers,
        }
    }
}

impl<'l> DmTreeHandler for DmMapperCompiler<'l> {
    fn handle(&mut self, node: &DmNode, tree: &DmTree, _post: &mut DmPostTraverse<Self>) -> Result<()> {
        match node.kind {
            DmNodeKind::MapperObject => {
                let mapper: DmMapperObject = read_node(node)?;
                if let Some(compiled) = self.compile_mapper(node, &mapper) {
                    self.mappers.push(compiled);
                }
            }
            _ => reject_kind(node, tree, &self.config, "mapper")?,
        }
        Ok(())
    }
}

/// Compiles a mapper subtree against `lookup`.
pub fn compile_object_mapper(
    tree: &DmTree,
    lookup: &dyn DmObjectLookup,
    config: &DmConfig,
) -> Result<DmObjectMapperDsl> {
    debug!("compiling object mappers of {} nodes", tree.len());
    let mut compiler = DmMapperCompiler::new(config.clone(), lookup);
    traverse(&mut compiler, tree)?;
    Ok(compiler.to_dsl())
}
