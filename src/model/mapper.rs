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

//! Object-mapper node shapes.

use serde::{Deserialize, Serialize};

use super::DmNameModel;

/// Which document area a mapped object lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmObjectReferenceSource {
    Domain,
    Struct,
    Data,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmObjectReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DmObjectReferenceSource>,
    #[serde(default)]
    pub reference_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DmObjectReference {
    pub fn new(
        source: DmObjectReferenceSource,
        reference_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source: Some(source),
            reference_id: reference_id.into(),
            name: Some(name.into()),
        }
    }
}

/// One source-field to target-field pair, by property uuid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmFieldMapper {
    #[serde(default)]
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl DmFieldMapper {
    pub fn new(uuid: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmMapperObject {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DmObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<DmObjectReference>,
    #[serde(default)]
    pub mappers: Vec<DmFieldMapper>,
}
