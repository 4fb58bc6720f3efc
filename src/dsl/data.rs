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

//! Compiled data-model records.

use serde::{Deserialize, Serialize};

use super::{DmFieldPairDsl, DmNameDsl};
use crate::model::{DmIndexKind, DmIndexMethod};
use crate::storage::{DmCardinality, DmStorageType};

/// A compiled column. The storage type's `type` tag and attributes are
/// inlined next to the naming fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmDataPropertyDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(flatten)]
    pub storage: DmStorageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDataIndexDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(rename = "type")]
    pub kind: DmIndexKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<DmIndexMethod>,
    /// Property names covered by the index.
    pub properties: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmDataObjectDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub properties: Vec<DmDataPropertyDsl>,
    pub indexes: Vec<DmDataIndexDsl>,
}

impl DmDataObjectDsl {
    pub fn property(&self, name: &str) -> Option<&DmDataPropertyDsl> {
        self.properties.iter().find(|p| p.base.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmReferenceTargetDsl {
    /// Target object name.
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<DmCardinality>,
    pub mapper: Vec<DmFieldPairDsl>,
}

/// Outgoing references of one data object, grouped by target object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDataObjectReferenceDsl {
    /// Source object name.
    pub source: String,
    pub targets: Vec<DmReferenceTargetDsl>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmDataModelDsl {
    pub data_objects: Vec<DmDataObjectDsl>,
    pub references: Vec<DmDataObjectReferenceDsl>,
}

impl DmDataModelDsl {
    pub fn data_object(&self, name: &str) -> Option<&DmDataObjectDsl> {
        self.data_objects.iter().find(|o| o.base.name == name)
    }
}
