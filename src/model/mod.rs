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

//! # Dmx View Model
//!
//! Strongly typed shapes of the raw node property bags, as the editing
//! layer stores them. Compilers read these; the generator pipeline and the
//! retarget transforms produce them, ready to be inserted back as nodes.
//!
//! ## Submodules
//!
//! - [`domain`]: aggregations, entities, value objects, enums, commands,
//!   rules, queries and DTOs
//! - [`data`]: data objects, their properties and indexes
//! - [`mapper`]: object mappers and field pairs

pub mod data;
pub mod domain;
pub mod mapper;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DmError, Result};
use crate::tree::DmNode;

pub use data::{DmDataIndex, DmDataObject, DmDataProperty, DmIndexKind, DmIndexMethod};
pub use domain::{
    DmAccess, DmAggregation, DmClassModel, DmCommand, DmDto, DmEntity, DmEnum, DmEnumBase,
    DmEnumCode, DmEnumMember, DmMethod, DmParameter, DmProperty, DmQuery, DmRepository, DmRule,
    DmSource, DmSourceFlag, DmSourceValue, DmValueObject,
};
pub use mapper::{DmFieldMapper, DmMapperObject, DmObjectReference, DmObjectReferenceSource};

/// One `{key, value}` metadata entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmMetaEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Identity and naming fields shared by every named object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmNameModel {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Vec<DmMetaEntry>>,
}

impl DmNameModel {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Copies name, title, description and meta under a new uuid.
    pub fn renamed_copy(&self, uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..self.clone()
        }
    }
}

/// A by-id pointer to another node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmReference {
    #[serde(default)]
    pub reference_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DmReference {
    pub fn new(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            name: None,
        }
    }

    /// The id, or `None` when the pointer is empty.
    pub fn target(&self) -> Option<&str> {
        Some(self.reference_id.as_str()).filter(|id| !id.is_empty())
    }
}

/// Reads a node's property bag as `T`.
pub fn read_node<T: DeserializeOwned>(node: &DmNode) -> Result<T> {
    serde_json::from_value(Value::Object(node.properties.clone())).map_err(|err| {
        DmError::schema(format!(
            "node '{}' is not a valid {}: {}",
            node.id, node.kind, err
        ))
    })
}

/// Serializes a model back into a node property bag.
pub fn to_properties<T: Serialize>(model: &T) -> Result<serde_json::Map<String, Value>> {
    match serde_json::to_value(model)? {
        Value::Object(map) => Ok(map),
        other => Err(DmError::internal(format!(
            "model serialized to a non-object value: {}",
            other
        ))),
    }
}
