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

//! # Dmx Canonical DSL
//!
//! The compiled, strongly typed intermediate representation every
//! downstream consumer reads. Records serialize with camelCase keys and
//! omit absent optionals; type expressions are already rendered to text
//! (`List<Order>`, `Map<String, Long>`).
//!
//! ## Structure
//!
//! ```text
//! DmBusinessDomainDsl
//! ├── domainModel: DmDomainModelDsl { aggregates }
//! ├── queryModel:  DmQueryModelDsl  { queries, dtos }
//! ├── dataModel:   DmDataModelDsl   { dataObjects, references }
//! ├── objectMapper: DmObjectMapperDsl { mappers }
//! └── vision
//! ```

pub mod data;
pub mod domain;
pub mod mapper;
pub mod query;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use data::{
    DmDataIndexDsl, DmDataModelDsl, DmDataObjectDsl, DmDataObjectReferenceDsl, DmDataPropertyDsl,
    DmReferenceTargetDsl,
};
pub use domain::{
    DmAggregateDsl, DmClassDsl, DmCommandDsl, DmDomainModelDsl, DmEntityDsl, DmEnumDsl,
    DmEnumMemberDsl, DmEventDsl, DmMethodDsl, DmMethodSignatureDsl, DmMethodSignatures,
    DmParameterDsl, DmPropertyDsl, DmReturnDsl, DmRuleDsl, DmSourceDsl, DmValueObjectDsl,
};
pub use mapper::{DmMapperObjectDsl, DmObjectKind, DmObjectMapperDsl, DmObjectRefDsl};
pub use query::{DmDtoDsl, DmQueryDsl, DmQueryModelDsl};

/// Compiled metadata: `{key: value}`.
pub type DmMetaDsl = BTreeMap<String, String>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmNameDsl {
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DmMetaDsl>,
}

/// One `{sourceField, targetField}` pair, by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmFieldPairDsl {
    pub source_field: String,
    pub target_field: String,
}

/// The whole compiled document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmBusinessDomainDsl {
    pub domain_model: DmDomainModelDsl,
    pub query_model: DmQueryModelDsl,
    pub data_model: DmDataModelDsl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_mapper: Option<DmObjectMapperDsl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,
}
