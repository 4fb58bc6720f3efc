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

//! # Document Compilation
//!
//! Batch boundary: a whole document snapshot in, the combined DSL out.
//!
//! A snapshot holds four subtrees keyed `domain`, `query`, `dataObject`
//! and `mapper`, each in the raw node format of [`crate::tree`], plus an
//! optional `vision` statement. Missing subtrees compile as empty. The
//! mapper subtree resolves its objects against the other three, searched
//! in that order.
//!
//! [`DmDocumentCompiler::compile_json`] answers malformed or empty input
//! with `None` rather than an error, matching a "no content" response.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::compiler::{compile_data_model, compile_domain_model, compile_object_mapper, compile_query_model};
use crate::config::DmConfig;
use crate::derived::{recompute, DmDerivedView};
use crate::dsl::DmBusinessDomainDsl;
use crate::errors::Result;
use crate::lookup::DmObjectStore;
use crate::tree::DmTree;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DmRawSnapshot {
    domain: Value,
    query: Value,
    #[serde(rename = "dataObject")]
    data_object: Value,
    mapper: Value,
    vision: Option<String>,
}

/// The four subtrees of one document.
#[derive(Clone, Debug, PartialEq)]
pub struct DmDocumentSnapshot {
    pub domain: DmTree,
    pub query: DmTree,
    pub data_object: DmTree,
    pub mapper: DmTree,
    pub vision: Option<String>,
}

impl DmDocumentSnapshot {
    /// An empty document rooted at `root_id`.
    pub fn empty(root_id: &str) -> Self {
        Self {
            domain: DmTree::new(root_id),
            query: DmTree::new(root_id),
            data_object: DmTree::new(root_id),
            mapper: DmTree::new(root_id),
            vision: None,
        }
    }

    fn subtree(value: Value, root_id: &str) -> Result<DmTree> {
        match value {
            Value::Null => Ok(DmTree::new(root_id)),
            value => DmTree::from_value(value, root_id),
        }
    }

    pub fn from_value(value: Value, root_id: &str) -> Result<Self> {
        let raw: DmRawSnapshot = serde_json::from_value(value)?;
        Ok(Self {
            domain: Self::subtree(raw.domain, root_id)?,
            query: Self::subtree(raw.query, root_id)?,
            data_object: Self::subtree(raw.data_object, root_id)?,
            mapper: Self::subtree(raw.mapper, root_id)?,
            vision: raw.vision.filter(|v| !v.is_empty()),
        })
    }

    pub fn from_slice(bytes: &[u8], root_id: &str) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value, root_id)
    }

    pub fn from_json(source: &str, root_id: &str) -> Result<Self> {
        Self::from_slice(source.as_bytes(), root_id)
    }

    /// Subtrees in object lookup order.
    pub fn trees(&self) -> [&DmTree; 4] {
        [&self.domain, &self.query, &self.data_object, &self.mapper]
    }
}

#[derive(Clone, Debug, Default)]
pub struct DmDocumentCompiler {
    config: DmConfig,
}

impl DmDocumentCompiler {
    pub fn new(config: DmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DmConfig {
        &self.config
    }

    /// Compiles all four subtrees. Any structural error aborts the whole
    /// document.
    pub fn compile(&self, snapshot: &DmDocumentSnapshot) -> Result<DmBusinessDomainDsl> {
        let domain_model = compile_domain_model(&snapshot.domain, &self.config)?;
        let query_model = compile_query_model(&snapshot.query, &self.config)?;
        let data_model = compile_data_model(&snapshot.data_object, &self.config)?;

        let object_mapper = if snapshot.mapper.len() > 1 {
            let store = DmObjectStore::from_trees(&[&snapshot.domain, &snapshot.query, &snapshot.data_object])?;
            Some(compile_object_mapper(&snapshot.mapper, &store, &self.config)?)
        } else {
            None
        };

        debug!(
            "compiled document: {} aggregates, {} queries, {} data objects",
            domain_model.aggregates.len(),
            query_model.queries.len(),
            data_model.data_objects.len()
        );

        Ok(DmBusinessDomainDsl {
            domain_model,
            query_model,
            data_model,
            object_mapper,
            vision: snapshot.vision.clone(),
        })
    }

    /// JSON snapshot bytes in, compiled JSON out. `None` for empty,
    /// malformed or uncompilable input.
    pub fn compile_json(&self, bytes: &[u8]) -> Option<String> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("empty document, no content");
            return None;
        }

        let compiled = DmDocumentSnapshot::from_slice(bytes, &self.config.root_id)
            .and_then(|snapshot| self.compile(&snapshot))
            .and_then(|dsl| Ok(serde_json::to_string(&dsl)?));

        match compiled {
            Ok(json) => Some(json),
            Err(err) => {
                warn!("document not compiled: {}", err);
                None
            }
        }
    }

    /// Relationship view of the snapshot.
    pub fn derive(&self, snapshot: &DmDocumentSnapshot) -> Result<DmDerivedView> {
        recompute(&snapshot.trees())
    }
}

/// Hex blake3 digest of the compiled document's JSON form.
pub fn digest(dsl: &DmBusinessDomainDsl) -> Result<String> {
    let bytes = serde_json::to_vec(dsl)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
