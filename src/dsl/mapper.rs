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

//! Compiled object-mapper records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DmFieldPairDsl, DmNameDsl};

/// Kind of object a mapper side points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmObjectKind {
    Entity,
    ValueObject,
    #[serde(rename = "DTO")]
    Dto,
    DataObject,
}

impl fmt::Display for DmObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DmObjectKind::Entity => "Entity",
            DmObjectKind::ValueObject => "ValueObject",
            DmObjectKind::Dto => "DTO",
            DmObjectKind::DataObject => "DataObject",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmObjectRefDsl {
    pub name: String,
    /// Owning aggregation name, for domain objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(rename = "type")]
    pub kind: DmObjectKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmMapperObjectDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    pub source: DmObjectRefDsl,
    pub target: DmObjectRefDsl,
    pub mapper: Vec<DmFieldPairDsl>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmObjectMapperDsl {
    pub mappers: Vec<DmMapperObjectDsl>,
}
