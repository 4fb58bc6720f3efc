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

//! Domain-model compiler.
//!
//! Entities, value objects and enums attach to the aggregation that is
//! their tree parent, at visit time. Commands name their aggregation and
//! rules name their command by id, so both attach in deferred closures.
//! Commands are indexed when visited, which lets a rule attach to a
//! command regardless of which of the two the walk reached first.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value;

use super::{compile_enum, compile_node_name, compile_rule, compile_source, reject_kind, DmTypeRenderer};
use crate::config::DmConfig;
use crate::dsl::{
    DmAggregateDsl, DmCommandDsl, DmDomainModelDsl, DmEntityDsl, DmEnumDsl, DmEventDsl, DmNameDsl,
    DmRuleDsl, DmValueObjectDsl,
};
use crate::errors::Result;
use crate::model::{read_node, DmAggregation, DmCommand, DmEntity, DmEnum, DmRule, DmValueObject};
use crate::traverse::{traverse, DmPostTraverse, DmTreeHandler};
use crate::tree::{DmNode, DmNodeKind, DmTree};

#[derive(Debug, Default)]
struct DmAggregateSlot {
    base: DmNameDsl,
    entities: Vec<DmEntityDsl>,
    value_objects: Vec<DmValueObjectDsl>,
    enums: Vec<DmEnumDsl>,
    commands: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct DmDomainCompiler {
    config: DmConfig,
    aggregates: Vec<DmAggregateSlot>,
    aggregate_index: HashMap<String, usize>,
    commands: Vec<DmCommandDsl>,
    command_index: HashMap<String, usize>,
}

impl DmDomainCompiler {
    pub fn new(config: DmConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Aggregation slot owning `node`, if its tree parent is an aggregation.
    fn owner(&self, node: &DmNode, tree: &DmTree) -> Option<usize> {
        let parent = tree.parent(node)?;
        if parent.kind != DmNodeKind::Aggregation {
            return None;
        }
        self.aggregate_index.get(&parent.id).copied()
    }

    fn compile_entity(&self, node: &DmNode, renderer: &DmTypeRenderer<'_>) -> Result<DmEntityDsl> {
        let entity: DmEntity = read_node(node)?;
        let id_uuid = node
            .properties
            .get(&self.config.id_field)
            .and_then(Value::as_str)
            .unwrap_or(entity.id.as_str())
            .to_string();

        let mut class = renderer.class(node, &entity.class)?;
        let (mut ids, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut class.properties)
            .into_iter()
            .partition(|p| !id_uuid.is_empty() && p.base.uuid == id_uuid);
        class.properties = rest;

        let id = if ids.is_empty() {
            warn!("entity '{}' has no identifier property", node.id);
            None
        } else {
            Some(ids.remove(0))
        };

        Ok(DmEntityDsl {
            class,
            id,
            is_aggregation_root: Some(entity.is_aggregation_root),
        })
    }

    fn compile_command(&self, node: &DmNode, command: &DmCommand, renderer: &DmTypeRenderer<'_>) -> DmCommandDsl {
        let base = compile_node_name(node, &command.base);
        let event = DmEventDsl {
            base: DmNameDsl {
                uuid: base.uuid.clone(),
                name: format!("{}Event", base.name),
                ..DmNameDsl::default()
            },
            properties: renderer.properties(&command.event_properties),
        };

        DmCommandDsl {
            source: compile_source(&command.source),
            repository: command.repository,
            event_sendable: command.event_sendable,
            properties: renderer.properties(&command.properties),
            event,
            rules: Vec::new(),
            result: renderer.render_return(command.result.as_ref()),
            base,
        }
    }

    fn attach_command(&mut self, aggregation_id: &str, command: usize) -> Result<()> {
        match self.aggregate_index.get(aggregation_id) {
            Some(&slot) => self.aggregates[slot].commands.push(command),
            None => warn!(
                "command '{}' names unknown aggregation '{}', skipped",
                self.commands[command].base.uuid, aggregation_id
            ),
        }
        Ok(())
    }

    fn attach_rule(&mut self, command_id: &str, rule: DmRuleDsl) -> Result<()> {
        match self.command_index.get(command_id) {
            Some(&index) => self.commands[index].rules.push(rule),
            None => warn!(
                "rule '{}' names unknown command '{}', skipped",
                rule.base.uuid, command_id
            ),
        }
        Ok(())
    }

    /// Assembles the compiled aggregates. The entity flagged as aggregation
    /// root becomes `root`; the others stay in `entities`.
    pub fn to_dsl(self) -> DmDomainModelDsl {
        let mut commands: Vec<Option<DmCommandDsl>> = self.commands.into_iter().map(Some).collect();

        let aggregates = self
            .aggregates
            .into_iter()
            .map(|slot| {
                let mut entities = slot.entities;
                let root = entities
                    .iter()
                    .position(|e| e.is_aggregation_root == Some(true))
                    .map(|index| entities.remove(index));
                if root.is_none() {
                    warn!("aggregation '{}' has no aggregate root", slot.base.name);
                }

                DmAggregateDsl {
                    base: slot.base,
                    root,
                    entities,
                    value_objects: slot.value_objects,
                    enums: slot.enums,
                    commands: slot
                        .commands
                        .into_iter()
                        .filter_map(|index| commands.get_mut(index).and_then(Option::take))
                        .collect(),
                }
            })
            .collect();

        DmDomainModelDsl { aggregates }
    }
}

impl DmTreeHandler for DmDomainCompiler {
    fn handle(&mut self, node: &DmNode, tree: &DmTree, post: &mut DmPostTraverse<Self>) -> Result<()> {
        let renderer = DmTypeRenderer::new(tree, &self.config);

        match node.kind {
            DmNodeKind::Aggregation => {
                let aggregation: DmAggregation = read_node(node)?;
                self.aggregate_index.insert(node.id.clone(), self.aggregates.len());
                self.aggregates.push(DmAggregateSlot {
                    base: compile_node_name(node, &aggregation.base),
                    ..DmAggregateSlot::default()
                });
            }
            DmNodeKind::Entity => {
                let compiled = self.compile_entity(node, &renderer)?;
                match self.owner(node, tree) {
                    Some(slot) => self.aggregates[slot].entities.push(compiled),
                    None => warn!("entity '{}' is outside any aggregation, skipped", node.id),
                }
            }
            DmNodeKind::ValueObject => {
                let value_object: DmValueObject = read_node(node)?;
                let compiled = DmValueObjectDsl {
                    class: renderer.class(node, &value_object.class)?,
                };
                match self.owner(node, tree) {
                    Some(slot) => self.aggregates[slot].value_objects.push(compiled),
                    None => warn!("value object '{}' is outside any aggregation, skipped", node.id),
                }
            }
            DmNodeKind::Enum => {
                let enumeration: DmEnum = read_node(node)?;
                let compiled = compile_enum(node, &enumeration);
                match self.owner(node, tree) {
                    Some(slot) => self.aggregates[slot].enums.push(compiled),
                    None => warn!("enum '{}' is outside any aggregation, skipped", node.id),
                }
            }
            DmNodeKind::Command => {
                let command: DmCommand = read_node(node)?;
                let compiled = self.compile_command(node, &command, &renderer);
                let index = self.commands.len();
                self.commands.push(compiled);
                self.command_index.insert(node.id.clone(), index);

                match command.aggregation.as_ref().and_then(|r| r.target()) {
                    Some(target) => {
                        let target = target.to_string();
                        post.add(move |compiler: &mut Self| compiler.attach_command(&target, index));
                    }
                    None => warn!("command '{}' names no aggregation, skipped", node.id),
                }
            }
            DmNodeKind::Rule => {
                let rule: DmRule = read_node(node)?;
                let compiled = compile_rule(node, &rule);
                match rule.aggregator.as_ref().and_then(|r| r.target()) {
                    Some(target) => {
                        let target = target.to_string();
                        post.add(move |compiler: &mut Self| compiler.attach_rule(&target, compiled));
                    }
                    None => warn!("rule '{}' names no command, skipped", node.id),
                }
            }
            _ => reject_kind(node, tree, &self.config, "domain")?,
        }

        Ok(())
    }
}

/// Compiles a domain subtree.
pub fn compile_domain_model(tree: &DmTree, config: &DmConfig) -> Result<DmDomainModelDsl> {
    debug!("compiling domain model of {} nodes", tree.len());
    let mut compiler = DmDomainCompiler::new(config.clone());
    traverse(&mut compiler, tree)?;
    Ok(compiler.to_dsl())
}
