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

//! Persistence-level column types of data-object properties.
//!
//! On the wire a storage type is `{ "type": "<Kind>", ...attributes }`,
//! and a compiled data property carries the same keys inline.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DmStorageKind {
    Boolean,
    Date,
    DateTime,
    Timestamp,
    Integer,
    Decimal,
    Long,
    Double,
    Float,
    String,
    Text,
    LongText,
    #[serde(rename = "JSON")]
    Json,
    Reference,
}

impl DmStorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DmStorageKind::Boolean => "Boolean",
            DmStorageKind::Date => "Date",
            DmStorageKind::DateTime => "DateTime",
            DmStorageKind::Timestamp => "Timestamp",
            DmStorageKind::Integer => "Integer",
            DmStorageKind::Decimal => "Decimal",
            DmStorageKind::Long => "Long",
            DmStorageKind::Double => "Double",
            DmStorageKind::Float => "Float",
            DmStorageKind::String => "String",
            DmStorageKind::Text => "Text",
            DmStorageKind::LongText => "LongText",
            DmStorageKind::Json => "JSON",
            DmStorageKind::Reference => "Reference",
        }
    }
}

impl fmt::Display for DmStorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmCardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl DmCardinality {
    /// The same relationship seen from the other side.
    pub fn reversed(self) -> Self {
        match self {
            DmCardinality::OneToMany => DmCardinality::ManyToOne,
            DmCardinality::ManyToOne => DmCardinality::OneToMany,
            other => other,
        }
    }
}

/// A storage type with its kind-specific attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum DmStorageType {
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<bool>,
    },
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
    },
    DateTime {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
    },
    Timestamp {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
    },
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auto_increment: Option<bool>,
    },
    Decimal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        precision: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scale: Option<u32>,
    },
    Long {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auto_increment: Option<bool>,
    },
    Double {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auto_increment: Option<bool>,
    },
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auto_increment: Option<bool>,
    },
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        length: Option<u32>,
    },
    Text,
    LongText,
    #[serde(rename = "JSON")]
    Json,
    Reference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_property: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cardinality: Option<DmCardinality>,
    },
}

impl DmStorageType {
    /// A bare storage type of `kind` with no attributes set.
    pub fn of_kind(kind: DmStorageKind) -> Self {
        match kind {
            DmStorageKind::Boolean => DmStorageType::Boolean { default_value: None },
            DmStorageKind::Date => DmStorageType::Date { default_value: None },
            DmStorageKind::DateTime => DmStorageType::DateTime { default_value: None },
            DmStorageKind::Timestamp => DmStorageType::Timestamp { default_value: None },
            DmStorageKind::Integer => DmStorageType::Integer {
                default_value: None,
                auto_increment: None,
            },
            DmStorageKind::Decimal => DmStorageType::Decimal {
                default_value: None,
                precision: None,
                scale: None,
            },
            DmStorageKind::Long => DmStorageType::Long {
                default_value: None,
                auto_increment: None,
            },
            DmStorageKind::Double => DmStorageType::Double {
                default_value: None,
                auto_increment: None,
            },
            DmStorageKind::Float => DmStorageType::Float {
                default_value: None,
                auto_increment: None,
            },
            DmStorageKind::String => DmStorageType::String {
                default_value: None,
                length: None,
            },
            DmStorageKind::Text => DmStorageType::Text,
            DmStorageKind::LongText => DmStorageType::LongText,
            DmStorageKind::Json => DmStorageType::Json,
            DmStorageKind::Reference => DmStorageType::Reference {
                target: None,
                target_property: None,
                cardinality: None,
            },
        }
    }

    pub fn reference(
        target: impl Into<String>,
        target_property: impl Into<String>,
        cardinality: Option<DmCardinality>,
    ) -> Self {
        DmStorageType::Reference {
            target: Some(target.into()),
            target_property: Some(target_property.into()),
            cardinality,
        }
    }

    pub fn kind(&self) -> DmStorageKind {
        match self {
            DmStorageType::Boolean { .. } => DmStorageKind::Boolean,
            DmStorageType::Date { .. } => DmStorageKind::Date,
            DmStorageType::DateTime { .. } => DmStorageKind::DateTime,
            DmStorageType::Timestamp { .. } => DmStorageKind::Timestamp,
            DmStorageType::Integer { .. } => DmStorageKind::Integer,
            DmStorageType::Decimal { .. } => DmStorageKind::Decimal,
            DmStorageType::Long { .. } => DmStorageKind::Long,
            DmStorageType::Double { .. } => DmStorageKind::Double,
            DmStorageType::Float { .. } => DmStorageKind::Float,
            DmStorageType::String { .. } => DmStorageKind::String,
            DmStorageType::Text => DmStorageKind::Text,
            DmStorageType::LongText => DmStorageKind::LongText,
            DmStorageType::Json => DmStorageKind::Json,
            DmStorageType::Reference { .. } => DmStorageKind::Reference,
        }
    }

    /// Date-like kinds with an empty default normalised to none.
    pub fn without_empty_default(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }
        match self {
            DmStorageType::Date { default_value } => DmStorageType::Date {
                default_value: keep(default_value),
            },
            DmStorageType::DateTime { default_value } => DmStorageType::DateTime {
                default_value: keep(default_value),
            },
            DmStorageType::Timestamp { default_value } => DmStorageType::Timestamp {
                default_value: keep(default_value),
            },
            other => other,
        }
    }
}

impl From<DmStorageKind> for DmStorageType {
    fn from(kind: DmStorageKind) -> Self {
        DmStorageType::of_kind(kind)
    }
}
