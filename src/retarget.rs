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

//! # Clone and Retarget
//!
//! Reinterprets a property-bearing object (entity, value object, DTO,
//! query or command) as another kind. Every result is independent of its
//! source: the object uuid and all nested property, method and parameter
//! uuids are freshly minted. Results carry the source's name, title,
//! description and meta plus its properties; kind-specific fields start
//! from their defaults.
//!
//! | target | extra work |
//! |---|---|
//! | entity | picks or adds an identifier property |
//! | command | `repository: modify`, `eventSendable: false` |
//! | data object | projects property types onto storage, drops the rest |

use log::debug;
use serde::{Deserialize, Serialize};

use crate::compat::project_to_storage;
use crate::errors::{DmError, Result};
use crate::ident::DmIdGenerator;
use crate::lookup::DmObjectLookup;
use crate::model::{
    DmClassModel, DmCommand, DmDataObject, DmDataProperty, DmDto, DmEntity, DmMethod,
    DmNameModel, DmParameter, DmProperty, DmQuery, DmRepository, DmValueObject,
};
use crate::types::DmTypeExpr;

/// Title given to a synthesized identifier property.
pub const ENTITY_ID_TITLE: &str = "Entity unique identifier";

/// Object to retarget, by kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DmRetargetSource<'a> {
    Entity(&'a DmEntity),
    ValueObject(&'a DmValueObject),
    Dto(&'a DmDto),
    Query(&'a DmQuery),
    Command(&'a DmCommand),
}

impl<'a> DmRetargetSource<'a> {
    pub fn base(&self) -> &'a DmNameModel {
        match self {
            DmRetargetSource::Entity(e) => &e.class.base,
            DmRetargetSource::ValueObject(v) => &v.class.base,
            DmRetargetSource::Dto(d) => &d.class.base,
            DmRetargetSource::Query(q) => &q.base,
            DmRetargetSource::Command(c) => &c.base,
        }
    }

    pub fn properties(&self) -> &'a [DmProperty] {
        match self {
            DmRetargetSource::Entity(e) => &e.class.properties,
            DmRetargetSource::ValueObject(v) => &v.class.properties,
            DmRetargetSource::Dto(d) => &d.class.properties,
            DmRetargetSource::Query(q) => &q.properties,
            DmRetargetSource::Command(c) => &c.properties,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmRetargetKind {
    Entity,
    ValueObject,
    #[serde(rename = "DTO")]
    Dto,
    Query,
    Command,
    DataObject,
}

/// A retargeted or cloned object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum DmRetargeted {
    Entity(DmEntity),
    ValueObject(DmValueObject),
    #[serde(rename = "DTO")]
    Dto(DmDto),
    Query(DmQuery),
    Command(DmCommand),
    DataObject(DmDataObject),
}

impl DmRetargeted {
    pub fn kind(&self) -> DmRetargetKind {
        match self {
            DmRetargeted::Entity(_) => DmRetargetKind::Entity,
            DmRetargeted::ValueObject(_) => DmRetargetKind::ValueObject,
            DmRetargeted::Dto(_) => DmRetargetKind::Dto,
            DmRetargeted::Query(_) => DmRetargetKind::Query,
            DmRetargeted::Command(_) => DmRetargetKind::Command,
            DmRetargeted::DataObject(_) => DmRetargetKind::DataObject,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            DmRetargeted::Entity(e) => e.class.uuid(),
            DmRetargeted::ValueObject(v) => v.class.uuid(),
            DmRetargeted::Dto(d) => d.class.uuid(),
            DmRetargeted::Query(q) => &q.base.uuid,
            DmRetargeted::Command(c) => &c.base.uuid,
            DmRetargeted::DataObject(d) => &d.base.uuid,
        }
    }
}

pub struct DmRetarget<'a> {
    ids: &'a dyn DmIdGenerator,
    lookup: Option<&'a dyn DmObjectLookup>,
}

impl<'a> DmRetarget<'a> {
    pub fn new(ids: &'a dyn DmIdGenerator) -> Self {
        Self { ids, lookup: None }
    }

    /// Lookup used to project enum references onto storage columns.
    pub fn with_lookup(mut self, lookup: &'a dyn DmObjectLookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    fn fresh_base(&self, base: &DmNameModel) -> DmNameModel {
        base.renamed_copy(self.ids.next_id())
    }

    fn fresh_properties(&self, properties: &[DmProperty]) -> Vec<DmProperty> {
        properties
            .iter()
            .map(|p| DmProperty {
                base: self.fresh_base(&p.base),
                ..p.clone()
            })
            .collect()
    }

    fn fresh_methods(&self, methods: &[DmMethod]) -> Vec<DmMethod> {
        methods
            .iter()
            .map(|m| DmMethod {
                base: self.fresh_base(&m.base),
                parameters: m
                    .parameters
                    .iter()
                    .map(|p| DmParameter {
                        base: self.fresh_base(&p.base),
                        ..p.clone()
                    })
                    .collect(),
                ..m.clone()
            })
            .collect()
    }

    fn fresh_class(&self, class: &DmClassModel) -> DmClassModel {
        DmClassModel {
            base: self.fresh_base(&class.base),
            properties: self.fresh_properties(&class.properties),
            methods: self.fresh_methods(&class.methods),
            class_properties: self.fresh_properties(&class.class_properties),
            class_methods: self.fresh_methods(&class.class_methods),
            ..class.clone()
        }
    }

    /// Class body carrying only the source's name data and properties.
    fn shell_class(&self, source: DmRetargetSource<'_>) -> DmClassModel {
        DmClassModel {
            base: self.fresh_base(source.base()),
            properties: self.fresh_properties(source.properties()),
            ..DmClassModel::default()
        }
    }

    /// Deep copy of `source` of the same kind with every uuid regenerated.
    pub fn clone_object(&self, source: DmRetargetSource<'_>) -> Result<DmRetargeted> {
        let cloned = match source {
            DmRetargetSource::Entity(entity) => {
                let class = self.fresh_class(&entity.class);
                let position = entity
                    .class
                    .properties
                    .iter()
                    .position(|p| p.base.uuid == entity.id);
                let id = match position {
                    Some(index) => class.properties[index].base.uuid.clone(),
                    None => {
                        return Err(DmError::validation(format!(
                            "entity '{}' names a missing identifier property",
                            entity.class.name()
                        )))
                    }
                };
                DmRetargeted::Entity(DmEntity {
                    class,
                    id,
                    is_aggregation_root: entity.is_aggregation_root,
                })
            }
            DmRetargetSource::ValueObject(value_object) => DmRetargeted::ValueObject(DmValueObject {
                class: self.fresh_class(&value_object.class),
            }),
            DmRetargetSource::Dto(dto) => DmRetargeted::Dto(DmDto {
                class: self.fresh_class(&dto.class),
            }),
            DmRetargetSource::Query(query) => DmRetargeted::Query(DmQuery {
                base: self.fresh_base(&query.base),
                properties: self.fresh_properties(&query.properties),
                ..query.clone()
            }),
            DmRetargetSource::Command(command) => DmRetargeted::Command(DmCommand {
                base: self.fresh_base(&command.base),
                properties: self.fresh_properties(&command.properties),
                event_properties: self.fresh_properties(&command.event_properties),
                ..command.clone()
            }),
        };
        Ok(cloned)
    }

    /// Entity whose identifier is the first property with "id" in its
    /// name, else the first property, else a new `id: Long`.
    pub fn to_entity(&self, source: DmRetargetSource<'_>) -> DmEntity {
        let mut class = self.shell_class(source);
        let picked = class
            .properties
            .iter()
            .find(|p| p.base.name.to_lowercase().contains("id"))
            .or_else(|| class.properties.first())
            .map(|p| p.base.uuid.clone());

        let id = match picked {
            Some(id) => id,
            None => {
                let mut property = DmProperty::new(self.ids.next_id(), "id", DmTypeExpr::base("Long"));
                property.base.title = Some(ENTITY_ID_TITLE.to_string());
                let id = property.base.uuid.clone();
                class.properties.insert(0, property);
                id
            }
        };

        DmEntity {
            class,
            id,
            is_aggregation_root: false,
        }
    }

    pub fn to_value_object(&self, source: DmRetargetSource<'_>) -> DmValueObject {
        DmValueObject {
            class: self.shell_class(source),
        }
    }

    pub fn to_dto(&self, source: DmRetargetSource<'_>) -> DmDto {
        DmDto {
            class: self.shell_class(source),
        }
    }

    pub fn to_query(&self, source: DmRetargetSource<'_>) -> DmQuery {
        DmQuery {
            base: self.fresh_base(source.base()),
            properties: self.fresh_properties(source.properties()),
            ..DmQuery::default()
        }
    }

    pub fn to_command(&self, source: DmRetargetSource<'_>) -> DmCommand {
        DmCommand {
            base: self.fresh_base(source.base()),
            properties: self.fresh_properties(source.properties()),
            repository: DmRepository::Modify,
            event_sendable: false,
            ..DmCommand::default()
        }
    }

    /// Data object holding one column per projectable property. An
    /// entity's identifier becomes the primary key.
    pub fn to_data_object(&self, source: DmRetargetSource<'_>) -> DmDataObject {
        let id = match source {
            DmRetargetSource::Entity(entity) => Some(entity.id.as_str()),
            _ => None,
        };

        let mut object = DmDataObject {
            base: self.fresh_base(source.base()),
            ..DmDataObject::default()
        };
        for property in source.properties() {
            let Some(storage) = project_to_storage(property.ty.as_ref(), self.lookup) else {
                debug!(
                    "'{}.{}' has no column projection, skipped",
                    source.base().name,
                    property.base.name
                );
                continue;
            };
            let mut column = DmDataProperty {
                base: self.fresh_base(&property.base),
                ..DmDataProperty::new("", "", storage)
            };
            if id == Some(property.base.uuid.as_str()) {
                column = column.as_primary_key();
            }
            object.properties.push(column);
        }
        object
    }

    /// Dispatches to the `to_*` operation for `kind`.
    pub fn retarget(&self, source: DmRetargetSource<'_>, kind: DmRetargetKind) -> DmRetargeted {
        match kind {
            DmRetargetKind::Entity => DmRetargeted::Entity(self.to_entity(source)),
            DmRetargetKind::ValueObject => DmRetargeted::ValueObject(self.to_value_object(source)),
            DmRetargetKind::Dto => DmRetargeted::Dto(self.to_dto(source)),
            DmRetargetKind::Query => DmRetargeted::Query(self.to_query(source)),
            DmRetargetKind::Command => DmRetargeted::Command(self.to_command(source)),
            DmRetargetKind::DataObject => DmRetargeted::DataObject(self.to_data_object(source)),
        }
    }
}
