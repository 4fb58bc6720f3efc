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

//! # Aggregate Generation
//!
//! One aggregate-root entity in, a full read/persist artifact set out:
//!
//! | artifact | name |
//! |---|---|
//! | detail query | `<Name>Query` |
//! | page query | `<Name>PageQuery` |
//! | DTOs | `<Name>DTO`, one per reachable entity or value object |
//! | data object | `<Name>DO` |
//! | root mapper | `<Name>To<Name>DO` |
//! | DTO mapper | `<Name>DTOTo<Name>DO` |
//!
//! A run is all-or-nothing: any error aborts it and nothing generated so
//! far is returned.

use log::debug;
use serde::{Deserialize, Serialize};

use super::dto::DmDtoSynthesizer;
use crate::compat::project_to_storage;
use crate::errors::{DmError, Result};
use crate::ident::DmIdGenerator;
use crate::lookup::DmObjectLookup;
use crate::model::{
    DmClassModel, DmDataObject, DmDataProperty, DmDto, DmEntity, DmFieldMapper, DmMapperObject,
    DmNameModel, DmObjectReference, DmObjectReferenceSource, DmProperty, DmQuery,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmGeneratedQueries {
    pub detail_query: DmQuery,
    pub page_query: DmQuery,
}

/// Everything one generation run produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmGeneration {
    pub query: DmGeneratedQueries,
    pub dtos: Vec<DmDto>,
    pub data_object: DmDataObject,
    pub mapper: DmMapperObject,
    pub dto_mapper: DmMapperObject,
}

pub struct DmAggregateGenerator<'a> {
    root: &'a DmEntity,
    lookup: &'a dyn DmObjectLookup,
    ids: &'a dyn DmIdGenerator,
}

impl<'a> DmAggregateGenerator<'a> {
    pub fn new(
        root: &'a DmEntity,
        lookup: &'a dyn DmObjectLookup,
        ids: &'a dyn DmIdGenerator,
    ) -> Result<Self> {
        if !root.is_aggregation_root {
            return Err(DmError::validation(format!(
                "entity '{}' is not an aggregate root",
                root.class.name()
            )));
        }
        Ok(Self { root, lookup, ids })
    }

    pub fn generate(&self) -> Result<DmGeneration> {
        let name = self.root.class.name();
        debug!("generating artifacts for aggregate root '{}'", name);

        let id_property = self.root.id_property().ok_or_else(|| {
            DmError::validation(format!("aggregate root '{}' has no identifier property", name))
        })?;

        let mut synth = DmDtoSynthesizer::new(self.lookup, self.ids);
        let dto_ref = synth.synthesize(&self.root.class)?;

        let id_input = DmProperty {
            base: id_property.base.renamed_copy(self.ids.next_id()),
            ty: match id_property.ty.as_ref() {
                Some(ty) => Some(synth.transform(ty)?),
                None => None,
            },
            access: None,
            optional: None,
        };
        let detail_query = DmQuery {
            base: DmNameModel::new(self.ids.next_id(), format!("{}Query", name)),
            properties: vec![id_input],
            result: Some(dto_ref.clone()),
            ..DmQuery::default()
        };
        let page_query = DmQuery {
            base: DmNameModel::new(self.ids.next_id(), format!("{}PageQuery", name)),
            pagination: true,
            result: Some(dto_ref),
            ..DmQuery::default()
        };

        let data_object = self.data_object();

        let mapper = self.same_name_mapper(
            DmObjectReferenceSource::Domain,
            &self.root.class,
            &data_object,
        );
        let root_dto = synth.dto_of(self.root.class.uuid()).ok_or_else(|| {
            DmError::internal(format!("no DTO recorded for aggregate root '{}'", name))
        })?;
        let dto_mapper =
            self.same_name_mapper(DmObjectReferenceSource::Struct, &root_dto.class, &data_object);

        let dtos = synth.into_dtos();
        debug!(
            "aggregate root '{}' produced {} DTOs and {} columns",
            name,
            dtos.len(),
            data_object.properties.len()
        );

        Ok(DmGeneration {
            query: DmGeneratedQueries {
                detail_query,
                page_query,
            },
            dtos,
            data_object,
            mapper,
            dto_mapper,
        })
    }

    /// Scalar projection of the root's properties. Properties without a
    /// storage projection are left out.
    fn data_object(&self) -> DmDataObject {
        let class = &self.root.class;
        let mut object = DmDataObject {
            base: DmNameModel {
                uuid: self.ids.next_id(),
                name: format!("{}DO", class.name()),
                title: class.base.title.clone(),
                description: class.base.description.clone(),
                meta: None,
            },
            ..DmDataObject::default()
        };

        for property in &class.properties {
            let Some(storage) = project_to_storage(property.ty.as_ref(), Some(self.lookup)) else {
                debug!("'{}.{}' has no column projection", class.name(), property.base.name);
                continue;
            };
            let mut column = DmDataProperty::new(self.ids.next_id(), property.base.name.clone(), storage);
            column.base.title = property.base.title.clone();
            column.base.description = property.base.description.clone();
            if property.base.uuid == self.root.id {
                column = column.as_primary_key();
            }
            object.properties.push(column);
        }
        object
    }

    /// Pairs every source property with the same-named column.
    fn same_name_mapper(
        &self,
        source_kind: DmObjectReferenceSource,
        source: &DmClassModel,
        target: &DmDataObject,
    ) -> DmMapperObject {
        let mappers = source
            .properties
            .iter()
            .filter_map(|property| {
                target
                    .properties
                    .iter()
                    .find(|column| column.base.name == property.base.name)
                    .map(|column| DmFieldMapper::new(self.ids.next_id(), &property.base.uuid, &column.base.uuid))
            })
            .collect();

        DmMapperObject {
            base: DmNameModel::new(
                self.ids.next_id(),
                format!("{}To{}", source.name(), target.base.name),
            ),
            source: Some(DmObjectReference::new(source_kind, source.uuid(), source.name())),
            target: Some(DmObjectReference::new(
                DmObjectReferenceSource::Data,
                &target.base.uuid,
                &target.base.name,
            )),
            mappers,
        }
    }
}

/// Runs the generator for `root` with a fresh memo.
pub fn generate_aggregate(
    root: &DmEntity,
    lookup: &dyn DmObjectLookup,
    ids: &dyn DmIdGenerator,
) -> Result<DmGeneration> {
    DmAggregateGenerator::new(root, lookup, ids)?.generate()
}
