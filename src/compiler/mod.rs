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

//! # Dmx DSL Compilers
//!
//! Four sibling compilers, one per document subtree, each a
//! [`DmTreeHandler`](crate::traverse::DmTreeHandler) that turns raw node
//! property bags into canonical DSL records.
//!
//! | compiler | node kinds | output |
//! |---|---|---|
//! | [`domain`] | aggregation, entity, value-object, enum, command, rule | [`DmDomainModelDsl`](crate::dsl::DmDomainModelDsl) |
//! | [`query`] | query, dto, rule | [`DmQueryModelDsl`](crate::dsl::DmQueryModelDsl) |
//! | [`data`] | dataObject | [`DmDataModelDsl`](crate::dsl::DmDataModelDsl) |
//! | [`mapper`] | mapperObject | [`DmObjectMapperDsl`](crate::dsl::DmObjectMapperDsl) |
//!
//! A compiler instance is single use: construct, traverse, read the result.
//! Compilation is pure, the same tree always yields the same DSL.
//!
//! Relationships that name their target by id (a command's aggregation, a
//! rule's command or query, a data reference's target object) are resolved
//! in deferred closures, after the whole subtree has been indexed.

pub mod data;
pub mod domain;
pub mod mapper;
pub mod query;

use std::collections::HashMap;

use log::warn;

use crate::config::DmConfig;
use crate::dsl::{
    DmClassDsl, DmEnumDsl, DmEnumMemberDsl, DmMetaDsl, DmMethodDsl, DmMethodSignatureDsl,
    DmMethodSignatures, DmNameDsl, DmParameterDsl, DmPropertyDsl, DmReturnDsl, DmRuleDsl,
    DmSourceDsl,
};
use crate::errors::{DmError, Result};
use crate::model::{
    DmClassModel, DmEnum, DmEnumBase, DmEnumCode, DmMetaEntry, DmMethod, DmNameModel, DmParameter,
    DmProperty, DmRule, DmSource,
};
use crate::tree::{DmNode, DmNodeKind, DmTree};
use crate::types::{optional_equals, stringify, DmTypeExpr};

pub use data::{compile_data_model, DmDataCompiler};
pub use domain::{compile_domain_model, DmDomainCompiler};
pub use mapper::{compile_object_mapper, DmMapperCompiler};
pub use query::{compile_query_model, DmQueryCompiler};

/// Strings that are empty count as absent.
pub(crate) fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// `[{key, value}]` to `{key: value}`, dropping entries with an empty key
/// or value. No entries left means no metadata.
pub fn transform_meta(meta: Option<&[DmMetaEntry]>) -> Option<DmMetaDsl> {
    let compiled: DmMetaDsl = meta?
        .iter()
        .filter(|entry| !entry.key.is_empty() && !entry.value.is_empty())
        .map(|entry| (entry.key.clone(), entry.value.clone()))
        .collect();
    Some(compiled).filter(|m| !m.is_empty())
}

pub(crate) fn compile_name(base: &DmNameModel) -> DmNameDsl {
    DmNameDsl {
        uuid: base.uuid.clone(),
        name: base.name.clone(),
        title: non_empty(base.title.as_ref()),
        description: non_empty(base.description.as_ref()),
        meta: transform_meta(base.meta.as_deref()),
    }
}

/// Naming fields of a node-level object. A missing uuid falls back to the
/// node id.
pub(crate) fn compile_node_name(node: &DmNode, base: &DmNameModel) -> DmNameDsl {
    let mut name = compile_name(base);
    if name.uuid.is_empty() {
        name.uuid = node.id.clone();
    }
    name
}

/// Handles a node kind the current compiler does not accept: an error in
/// strict mode, otherwise a warning. The root node is always accepted.
pub(crate) fn reject_kind(node: &DmNode, tree: &DmTree, config: &DmConfig, stage: &str) -> Result<()> {
    if node.kind == DmNodeKind::Root || node.id == tree.root_id() {
        return Ok(());
    }
    if config.strict {
        return Err(DmError::schema(format!(
            "node '{}' of kind '{}' is not allowed in the {} model",
            node.id, node.kind, stage
        )));
    }
    warn!(
        "skipping node '{}' of kind '{}' in the {} model",
        node.id, node.kind, stage
    );
    Ok(())
}

/// Renders type expressions against one subtree: references print the
/// referenced node's name, or their own display name when the node is not
/// in the subtree.
pub struct DmTypeRenderer<'a> {
    tree: &'a DmTree,
    config: &'a DmConfig,
}

impl<'a> DmTypeRenderer<'a> {
    pub fn new(tree: &'a DmTree, config: &'a DmConfig) -> Self {
        Self { tree, config }
    }

    fn resolve(&self, id: &str, display: &str) -> String {
        self.tree
            .get(id)
            .and_then(DmNode::name)
            .filter(|name| !name.is_empty())
            .unwrap_or(display)
            .to_string()
    }

    /// Property and parameter types; absent renders the void class.
    pub fn render(&self, ty: Option<&DmTypeExpr>) -> String {
        stringify(ty, &self.config.void_class, &|id, display| self.resolve(id, display))
    }

    /// Method, command and query results; absent renders the void return.
    pub fn render_return(&self, ty: Option<&DmTypeExpr>) -> DmReturnDsl {
        let rendered = match ty {
            Some(_) => self.render(ty),
            None => self.config.void_return.clone(),
        };
        DmReturnDsl { ty: rendered }
    }

    pub fn property(&self, property: &DmProperty) -> DmPropertyDsl {
        DmPropertyDsl {
            base: compile_name(&property.base),
            ty: self.render(property.ty.as_ref()),
            access: property.access,
            optional: property.optional,
        }
    }

    pub fn properties(&self, properties: &[DmProperty]) -> Vec<DmPropertyDsl> {
        properties.iter().map(|p| self.property(p)).collect()
    }

    pub fn parameter(&self, parameter: &DmParameter) -> DmParameterDsl {
        DmParameterDsl {
            base: compile_name(&parameter.base),
            ty: self.render(parameter.ty.as_ref()),
        }
    }

    /// Merges same-named methods into one overload set, first occurrence
    /// order. Two overloads with structurally equal parameter types are
    /// ambiguous.
    pub fn methods(&self, methods: &[DmMethod]) -> Result<Vec<DmMethodDsl>> {
        let mut compiled: Vec<DmMethodDsl> = Vec::new();
        let mut seen: HashMap<&str, (usize, Vec<&[DmParameter]>)> = HashMap::new();

        for method in methods {
            let signature = DmMethodSignatureDsl {
                description: non_empty(method.base.description.as_ref()),
                parameters: method.parameters.iter().map(|p| self.parameter(p)).collect(),
                result: self.render_return(method.result.as_ref()),
            };

            match seen.get_mut(method.base.name.as_str()) {
                Some((index, previous)) => {
                    if previous
                        .iter()
                        .any(|params| same_parameter_types(params, &method.parameters))
                    {
                        return Err(DmError::ambiguous_overload(&method.base.name));
                    }
                    previous.push(&method.parameters);
                    compiled[*index].signature.push(signature);
                }
                None => {
                    seen.insert(
                        method.base.name.as_str(),
                        (compiled.len(), vec![method.parameters.as_slice()]),
                    );
                    compiled.push(DmMethodDsl {
                        base: compile_name(&method.base),
                        access: method.access,
                        is_abstract: method.is_abstract,
                        signature: DmMethodSignatures::Single(signature),
                    });
                }
            }
        }

        Ok(compiled)
    }

    pub fn class(&self, node: &DmNode, class: &DmClassModel) -> Result<DmClassDsl> {
        Ok(DmClassDsl {
            base: compile_node_name(node, &class.base),
            extends: non_empty(class.extends.as_ref()),
            implements: class.implements.clone().filter(|list| !list.is_empty()),
            is_abstract: class.is_abstract,
            properties: self.properties(&class.properties),
            methods: self.methods(&class.methods)?,
            class_properties: self.properties(&class.class_properties),
            class_methods: self.methods(&class.class_methods)?,
        })
    }
}

fn same_parameter_types(a: &[DmParameter], b: &[DmParameter]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| optional_equals(x.ty.as_ref(), y.ty.as_ref()))
}

/// Numeric enums carry numeric codes where the code parses; string enums
/// carry text.
pub(crate) fn compile_enum(node: &DmNode, enumeration: &DmEnum) -> DmEnumDsl {
    let members = enumeration
        .members
        .iter()
        .map(|member| {
            let code = match enumeration.base_type {
                DmEnumBase::Number => member
                    .code
                    .to_number()
                    .map(DmEnumCode::Number)
                    .unwrap_or_else(|| member.code.clone()),
                DmEnumBase::String => DmEnumCode::Text(member.code.to_text()),
            };
            DmEnumMemberDsl {
                base: compile_name(&member.base),
                code,
            }
        })
        .collect();

    DmEnumDsl {
        base: compile_node_name(node, &enumeration.base),
        base_type: enumeration.base_type,
        members,
    }
}

pub(crate) fn compile_rule(node: &DmNode, rule: &DmRule) -> DmRuleDsl {
    DmRuleDsl {
        base: compile_node_name(node, &rule.base),
    }
}

/// Enabled trigger sources, in http, rpc, event, schedule order.
pub(crate) fn compile_source(source: &DmSource) -> Vec<DmSourceDsl> {
    let mut compiled = Vec::new();
    if source.http.enabled {
        compiled.push(DmSourceDsl::Http);
    }
    if source.rpc.enabled {
        compiled.push(DmSourceDsl::Rpc);
    }
    if source.event.enabled {
        compiled.push(DmSourceDsl::Event {
            value: source.event.value.clone(),
        });
    }
    if source.schedule.enabled {
        compiled.push(DmSourceDsl::Schedule {
            value: source.schedule.value.clone(),
        });
    }
    compiled
}
