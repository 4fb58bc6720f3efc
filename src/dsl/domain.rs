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

//! Compiled domain-model records.

use serde::{Deserialize, Serialize};

use super::DmNameDsl;
use crate::model::{DmAccess, DmEnumBase, DmEnumCode, DmRepository};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmPropertyDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<DmAccess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmParameterDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmReturnDsl {
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmMethodSignatureDsl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Vec<DmParameterDsl>,
    #[serde(rename = "return")]
    pub result: DmReturnDsl,
}

/// One signature, or the overload set of same-named methods.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DmMethodSignatures {
    Single(DmMethodSignatureDsl),
    Overloads(Vec<DmMethodSignatureDsl>),
}

impl DmMethodSignatures {
    pub fn push(&mut self, signature: DmMethodSignatureDsl) {
        match self {
            DmMethodSignatures::Single(first) => {
                let first = std::mem::take(first);
                *self = DmMethodSignatures::Overloads(vec![first, signature]);
            }
            DmMethodSignatures::Overloads(list) => list.push(signature),
        }
    }

    pub fn as_slice(&self) -> &[DmMethodSignatureDsl] {
        match self {
            DmMethodSignatures::Single(one) => std::slice::from_ref(one),
            DmMethodSignatures::Overloads(list) => list,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmMethodDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<DmAccess>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    pub signature: DmMethodSignatures,
}

/// Body shared by compiled entities, value objects and DTOs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmClassDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implements: Option<Vec<String>>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    pub properties: Vec<DmPropertyDsl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<DmMethodDsl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_properties: Vec<DmPropertyDsl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_methods: Vec<DmMethodDsl>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmEntityDsl {
    #[serde(flatten)]
    pub class: DmClassDsl,
    /// The identifier property, excluded from `properties`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DmPropertyDsl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_aggregation_root: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmValueObjectDsl {
    #[serde(flatten)]
    pub class: DmClassDsl,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DmEnumMemberDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    pub code: DmEnumCode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmEnumDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    pub base_type: DmEnumBase,
    pub members: Vec<DmEnumMemberDsl>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DmSourceDsl {
    Http,
    Rpc,
    Event { value: String },
    Schedule { value: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmRuleDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
}

/// Domain event raised by a command.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmEventDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    pub properties: Vec<DmPropertyDsl>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmCommandDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    pub source: Vec<DmSourceDsl>,
    pub repository: DmRepository,
    pub event_sendable: bool,
    pub properties: Vec<DmPropertyDsl>,
    pub event: DmEventDsl,
    pub rules: Vec<DmRuleDsl>,
    #[serde(rename = "return")]
    pub result: DmReturnDsl,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmAggregateDsl {
    #[serde(flatten)]
    pub base: DmNameDsl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<DmEntityDsl>,
    pub entities: Vec<DmEntityDsl>,
    pub value_objects: Vec<DmValueObjectDsl>,
    pub enums: Vec<DmEnumDsl>,
    pub commands: Vec<DmCommandDsl>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DmDomainModelDsl {
    pub aggregates: Vec<DmAggregateDsl>,
}

impl DmDomainModelDsl {
    pub fn aggregate(&self, name: &str) -> Option<&DmAggregateDsl> {
        self.aggregates.iter().find(|a| a.base.name == name)
    }
}
