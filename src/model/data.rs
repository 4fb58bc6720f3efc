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

//! Data-object node shapes.

use serde::{Deserialize, Serialize};

use super::DmNameModel;
use crate::storage::DmStorageType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmDataProperty {
    #[serde(flatten)]
    pub base: DmNameModel,
    /// Column name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(rename = "type")]
    pub ty: DmStorageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
}

impl DmDataProperty {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, ty: DmStorageType) -> Self {
        Self {
            base: DmNameModel::new(uuid, name),
            property_name: None,
            ty,
            not_null: None,
            primary_key: None,
        }
    }

    pub fn as_primary_key(mut self) -> Self {
        self.primary_key = Some(true);
        self.not_null = Some(true);
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key.unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmIndexKind {
    #[default]
    Normal,
    Unique,
    FullText,
    /// Synthesized from primary-key properties.
    Primary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmIndexMethod {
    #[serde(rename = "BTREE")]
    BTree,
    #[serde(rename = "HASH")]
    Hash,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDataIndex {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(rename = "type", default)]
    pub kind: DmIndexKind,
    /// Property uuids covered by the index.
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<DmIndexMethod>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmDataObject {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default)]
    pub properties: Vec<DmDataProperty>,
    #[serde(default)]
    pub indexes: Vec<DmDataIndex>,
}

impl DmDataObject {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base: DmNameModel::new(uuid, name),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, property: DmDataProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, uuid: &str) -> Option<&DmDataProperty> {
        self.properties.iter().find(|p| p.base.uuid == uuid)
    }
}
