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

//! Domain and query node shapes.

use serde::{Deserialize, Serialize};

use super::{DmNameModel, DmReference};
use crate::types::DmTypeExpr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DmAccess {
    Public,
    Private,
    Protected,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmProperty {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<DmTypeExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<DmAccess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

impl DmProperty {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, ty: DmTypeExpr) -> Self {
        Self {
            base: DmNameModel::new(uuid, name),
            ty: Some(ty),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmParameter {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<DmTypeExpr>,
}

impl DmParameter {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, ty: DmTypeExpr) -> Self {
        Self {
            base: DmNameModel::new(uuid, name),
            ty: Some(ty),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmMethod {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<DmAccess>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(default)]
    pub parameters: Vec<DmParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DmTypeExpr>,
}

/// Fields shared by entities, value objects and DTOs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmClassModel {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implements: Option<Vec<String>>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(default)]
    pub properties: Vec<DmProperty>,
    #[serde(default)]
    pub methods: Vec<DmMethod>,
    #[serde(default)]
    pub class_properties: Vec<DmProperty>,
    #[serde(default)]
    pub class_methods: Vec<DmMethod>,
}

impl DmClassModel {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base: DmNameModel::new(uuid, name),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, property: DmProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_method(mut self, method: DmMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn uuid(&self) -> &str {
        &self.base.uuid
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmEntity {
    #[serde(flatten)]
    pub class: DmClassModel,
    /// Uuid of the identifier property inside `properties`.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub is_aggregation_root: bool,
}

impl DmEntity {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: DmClassModel::new(uuid, name),
            ..Self::default()
        }
    }

    /// Adds `property` and designates it as the identifier.
    pub fn with_id_property(mut self, property: DmProperty) -> Self {
        self.id = property.base.uuid.clone();
        self.class.properties.push(property);
        self
    }

    pub fn with_property(mut self, property: DmProperty) -> Self {
        self.class.properties.push(property);
        self
    }

    pub fn as_aggregation_root(mut self) -> Self {
        self.is_aggregation_root = true;
        self
    }

    pub fn id_property(&self) -> Option<&DmProperty> {
        self.class.properties.iter().find(|p| p.base.uuid == self.id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmValueObject {
    #[serde(flatten)]
    pub class: DmClassModel,
}

impl DmValueObject {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: DmClassModel::new(uuid, name),
        }
    }

    pub fn with_property(mut self, property: DmProperty) -> Self {
        self.class.properties.push(property);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmDto {
    #[serde(flatten)]
    pub class: DmClassModel,
}

impl DmDto {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: DmClassModel::new(uuid, name),
        }
    }

    pub fn with_property(mut self, property: DmProperty) -> Self {
        self.class.properties.push(property);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DmEnumBase {
    Number,
    #[default]
    String,
}

/// An enum member code, numeric or textual.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DmEnumCode {
    Number(serde_json::Number),
    Text(String),
}

impl Default for DmEnumCode {
    fn default() -> Self {
        DmEnumCode::Text(String::new())
    }
}

impl DmEnumCode {
    /// Reads the leading numeric prefix of a textual code, the way a
    /// lenient float parser does. `"12px"` yields `12`, `"abc"` yields none.
    pub fn to_number(&self) -> Option<serde_json::Number> {
        match self {
            DmEnumCode::Number(n) => Some(n.clone()),
            DmEnumCode::Text(text) => parse_leading_number(text.trim()),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            DmEnumCode::Number(n) => n.to_string(),
            DmEnumCode::Text(text) => text.clone(),
        }
    }
}

fn parse_leading_number(text: &str) -> Option<serde_json::Number> {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in text.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    let prefix = text[..end].trim_end_matches('.');
    if let Ok(int) = prefix.parse::<i64>() {
        return Some(serde_json::Number::from(int));
    }
    prefix
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DmEnumMember {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default)]
    pub code: DmEnumCode,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmEnum {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default)]
    pub base_type: DmEnumBase,
    #[serde(default)]
    pub members: Vec<DmEnumMember>,
}

impl DmEnum {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, base_type: DmEnumBase) -> Self {
        Self {
            base: DmNameModel::new(uuid, name),
            base_type,
            members: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmAggregation {
    #[serde(flatten)]
    pub base: DmNameModel,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmRule {
    #[serde(flatten)]
    pub base: DmNameModel,
    /// The command or query the rule belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<DmReference>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmSourceFlag {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmSourceValue {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub value: String,
}

/// Trigger sources of a command or query. Defaults to http and rpc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmSource {
    pub http: DmSourceFlag,
    pub rpc: DmSourceFlag,
    pub event: DmSourceValue,
    pub schedule: DmSourceValue,
}

impl Default for DmSource {
    fn default() -> Self {
        Self {
            http: DmSourceFlag { enabled: true },
            rpc: DmSourceFlag { enabled: true },
            event: DmSourceValue::default(),
            schedule: DmSourceValue::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DmRepository {
    Create,
    #[default]
    Modify,
    Remove,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmCommand {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default)]
    pub source: DmSource,
    #[serde(default)]
    pub repository: DmRepository,
    #[serde(default)]
    pub event_sendable: bool,
    #[serde(default)]
    pub properties: Vec<DmProperty>,
    #[serde(default)]
    pub event_properties: Vec<DmProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DmTypeExpr>,
    /// The aggregation the command acts on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<DmReference>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmQuery {
    #[serde(flatten)]
    pub base: DmNameModel,
    #[serde(default)]
    pub source: DmSource,
    #[serde(default)]
    pub pagination: bool,
    #[serde(default)]
    pub properties: Vec<DmProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DmTypeExpr>,
}
