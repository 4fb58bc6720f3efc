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

//! Query-model compiler. Rules attach to their query in deferred closures.

use std::collections::HashMap;

use log::{debug, warn};

use super::{compile_node_name, compile_rule, compile_source, reject_kind, DmTypeRenderer};
use crate::config::DmConfig;
use crate::dsl::{DmDtoDsl, DmQueryDsl, DmQueryModelDsl, DmRuleDsl};
use crate::errors::Result;
use crate::model::{read_node, DmDto, DmQuery, DmRule};
use crate::traverse::{traverse, DmPostTraverse, DmTreeHandler};
use crate::tree::{DmNode, DmNodeKind, DmTree};

#[derive(Debug, Default)]
pub struct DmQueryCompiler {
    config: DmConfig,
    queries: Vec<DmQueryDsl>,
    query_index: HashMap<String, usize>,
    dtos: Vec<DmDtoDsl>,
}

impl DmQueryCompiler {
    pub fn new(config: DmConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn attach_rule(&mut self, query_id: &str, rule: DmRuleDsl) -> Result<()> {
        match self.query_index.get(query_id) {
            Some(&index) => self.queries[index].rules.push(rule),
            None => warn!(
                "rule '{}' names unknown query '{}', skipped",
                rule.base.uuid, query_id
            ),
        }
        Ok(())
    }

    pub fn to_dsl(self) -> DmQueryModelDsl {
        DmQueryModelDsl {
            queries: self.queries,
            dtos: self.dtos,
        }
    }
}

impl DmTreeHandler for DmQueryCompiler {
    fn handle(&mut self, node: &DmNode, tree: &DmTree, post: &mut DmPostTraverse<Self>) -> Result<()> {
        let renderer = DmTypeRenderer::new(tree, &self.config);

        match node.kind {
            DmNodeKind::Query => {
                let query: DmQuery = read_node(node)?;
                let compiled = DmQueryDsl {
                    base: compile_node_name(node, &query.base),
                    source: compile_source(&query.source),
                    rules: Vec::new(),
                    pagination: query.pagination,
                    properties: renderer.properties(&query.properties),
                    result: renderer.render_return(query.result.as_ref()),
                };
                self.query_index.insert(node.id.clone(), self.queries.len());
                self.queries.push(compiled);
            }
            DmNodeKind::Dto => {
                let dto: DmDto = read_node(node)?;
                let compiled = DmDtoDsl {
                    class: renderer.class(node, &dto.class)?,
                };
                self.dtos.push(compiled);
            }
            DmNodeKind::Rule => {
                let rule: DmRule = read_node(node)?;
                let compiled = compile_rule(node, &rule);
                match rule.aggregator.as_ref().and_then(|r| r.target()) {
                    Some(target) => {
                        let target = target.to_string();
                        post.add(move |compiler: &mut Self| compiler.attach_rule(&target, compiled));
                    }
                    None => warn!("rule '{}' names no query, skipped", node.id),
                }
            }
            _ => reject_kind(node, tree, &self.config, "query")?,
        }

        Ok(())
    }
}

/// Compiles a query subtree.
pub fn compile_query_model(tree: &DmTree, config: &DmConfig) -> Result<DmQueryModelDsl> {
    debug!("compiling query model of {} nodes", tree.len());
    let mut compiler = DmQueryCompiler::new(config.clone());
    traverse(&mut compiler, tree)?;
    Ok(compiler.to_dsl())
}
