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

//! Recursive DTO synthesis.
//!
//! Entities and value objects become `<Name>DTO` objects. Property types
//! are rewritten on the way: enum references become their primitive base,
//! entity and value-object references become references to the target's
//! own DTO. Every DTO is memoised by source uuid before its properties are
//! visited, so cyclic object graphs terminate and each source object gets
//! exactly one DTO per run.

use log::debug;

use super::state::DmGeneratorState;
use crate::compat::enum_storage_type;
use crate::errors::{DmError, Result};
use crate::ident::DmIdGenerator;
use crate::lookup::{DmObjectLookup, DmObjectRef};
use crate::model::{DmClassModel, DmDto, DmNameModel, DmProperty};
use crate::types::{map_references, DmTypeExpr};

pub struct DmDtoSynthesizer<'a> {
    lookup: &'a dyn DmObjectLookup,
    ids: &'a dyn DmIdGenerator,
    state: DmGeneratorState<DmDto>,
}

impl<'a> DmDtoSynthesizer<'a> {
    pub fn new(lookup: &'a dyn DmObjectLookup, ids: &'a dyn DmIdGenerator) -> Self {
        Self {
            lookup,
            ids,
            state: DmGeneratorState::new(),
        }
    }

    fn dto_reference(dto: &DmDto) -> DmTypeExpr {
        DmTypeExpr::reference(dto.class.uuid(), dto.class.name())
    }

    /// DTO reference for `class`, synthesizing the DTO on first use.
    pub fn synthesize(&mut self, class: &DmClassModel) -> Result<DmTypeExpr> {
        if let Some(dto) = self.state.get(class.uuid()) {
            return Ok(Self::dto_reference(dto));
        }

        let dto = DmDto {
            class: DmClassModel {
                base: DmNameModel {
                    uuid: self.ids.next_id(),
                    name: format!("{}DTO", class.name()),
                    title: class
                        .base
                        .title
                        .as_ref()
                        .filter(|t| !t.is_empty())
                        .map(|t| format!("{} data transfer object", t)),
                    description: class.base.description.clone(),
                    meta: None,
                },
                ..DmClassModel::default()
            },
        };
        debug!("synthesizing {} from '{}'", dto.class.name(), class.uuid());
        let reference = Self::dto_reference(&dto);
        self.state.save(class.uuid(), dto)?;

        for property in &class.properties {
            let ty = match property.ty.as_ref() {
                Some(ty) => Some(self.transform(ty)?),
                None => None,
            };
            let copy = DmProperty {
                base: property.base.renamed_copy(self.ids.next_id()),
                ty,
                access: property.access,
                optional: property.optional,
            };
            self.state
                .get_mut(class.uuid())
                .ok_or_else(|| DmError::internal(format!("DTO of '{}' left the memo", class.uuid())))?
                .class
                .properties
                .push(copy);
        }

        Ok(reference)
    }

    /// Rewrites every reference inside `ty` to its DTO-side type.
    pub fn transform(&mut self, ty: &DmTypeExpr) -> Result<DmTypeExpr> {
        map_references(ty, &mut |id, _| self.transform_reference(id))
    }

    fn transform_reference(&mut self, id: &str) -> Result<DmTypeExpr> {
        let lookup: &'a dyn DmObjectLookup = self.lookup;
        let entry = lookup
            .get_object_by_id(id)
            .ok_or_else(|| DmError::unsupported_reference(id, "referenced object not found"))?;

        match entry.object {
            DmObjectRef::Enum(enumeration) => Ok(enum_storage_type(enumeration)),
            DmObjectRef::ValueObject(value_object) => self.synthesize(&value_object.class),
            DmObjectRef::Entity(entity) => self.synthesize(&entity.class),
            other => Err(DmError::unsupported_reference(
                id,
                format!("a {} cannot be carried by a DTO", other.node_kind()),
            )),
        }
    }

    /// DTO synthesized for the source object `source_uuid`, if any.
    pub fn dto_of(&self, source_uuid: &str) -> Option<&DmDto> {
        self.state.get(source_uuid)
    }

    /// All DTOs in creation order.
    pub fn into_dtos(self) -> Vec<DmDto> {
        self.state.into_list()
    }
}
