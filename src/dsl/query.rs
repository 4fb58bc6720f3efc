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

//! Compiled query-model records.

use serde::{Deserialize, Serialize};

use super::domain::{DmClassDsl, DmPropertyDsl, DmReturnDsl, DmRuleDsl, DmSourceDsl};
use super::DmNameDsl;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmQueryDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    pub source: Vec<DmSourceDsl>,
    pub rules: Vec<DmRuleDsl>,
    pub pagination: bool,
    pub properties: Vec<DmPropertyDsl>,
    #[serde(rename = "return")]
    pub result: DmReturnDsl,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDtoDsl {
    #[serde(flatten)]
    pub class: DmClassDsl,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmQueryModelDsl {
    pub queries: Vec<DmQueryDsl>,
    pub dtos: Vec<DmDtoDsl>,
}

impl DmQueryModelDsl {
    pub fn query(&self, name: &str) -> Option<&DmQueryDsl> {
        self.queries.iter().find(|q| q.base.name == name)
    }
}
