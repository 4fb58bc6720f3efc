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

//! # Dmx Object Lookup
//!
//! Cross-subtree object resolution. The mapper compiler, the generator and
//! the derived view resolve ids that may live in any of the document's
//! subtrees through [`DmObjectLookup`]; [`DmObjectStore`] is the in-memory
//! implementation, filled by hand or loaded from snapshot trees.

use std::collections::HashMap;

use log::debug;

use crate::compat::enum_storage_type;
use crate::dsl::DmObjectKind;
use crate::errors::Result;
use crate::model::{
    read_node, DmAggregation, DmClassModel, DmDataObject, DmDto, DmEntity, DmEnum, DmNameModel,
    DmValueObject,
};
use crate::tree::{DmNodeKind, DmTree};
use crate::types::DmTypeExpr;

/// A borrowed view of a resolvable object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DmObjectRef<'a> {
    Entity(&'a DmEntity),
    ValueObject(&'a DmValueObject),
    Enum(&'a DmEnum),
    Dto(&'a DmDto),
    DataObject(&'a DmDataObject),
}

impl<'a> DmObjectRef<'a> {
    pub fn node_kind(&self) -> DmNodeKind {
        match self {
            DmObjectRef::Entity(_) => DmNodeKind::Entity,
            DmObjectRef::ValueObject(_) => DmNodeKind::ValueObject,
            DmObjectRef::Enum(_) => DmNodeKind::Enum,
            DmObjectRef::Dto(_) => DmNodeKind::Dto,
            DmObjectRef::DataObject(_) => DmNodeKind::DataObject,
        }
    }

    /// Kind as seen by object mappers. Enums cannot be mapped.
    pub fn mapper_kind(&self) -> Option<DmObjectKind> {
        match self {
            DmObjectRef::Entity(_) => Some(DmObjectKind::Entity),
            DmObjectRef::ValueObject(_) => Some(DmObjectKind::ValueObject),
            DmObjectRef::Dto(_) => Some(DmObjectKind::Dto),
            DmObjectRef::DataObject(_) => Some(DmObjectKind::DataObject),
            DmObjectRef::Enum(_) => None,
        }
    }

    pub fn base(&self) -> &'a DmNameModel {
        match self {
            DmObjectRef::Entity(e) => &e.class.base,
            DmObjectRef::ValueObject(v) => &v.class.base,
            DmObjectRef::Enum(e) => &e.base,
            DmObjectRef::Dto(d) => &d.class.base,
            DmObjectRef::DataObject(d) => &d.base,
        }
    }

    pub fn uuid(&self) -> &'a str {
        &self.base().uuid
    }

    pub fn name(&self) -> &'a str {
        &self.base().name
    }

    /// The class body of entities, value objects and DTOs.
    pub fn class(&self) -> Option<&'a DmClassModel> {
        match self {
            DmObjectRef::Entity(e) => Some(&e.class),
            DmObjectRef::ValueObject(v) => Some(&v.class),
            DmObjectRef::Dto(d) => Some(&d.class),
            _ => None,
        }
    }

    /// Name of the field (property, column or enum member) with uuid `id`.
    pub fn field_name(&self, id: &str) -> Option<&'a str> {
        match self {
            DmObjectRef::Enum(e) => e
                .members
                .iter()
                .find(|m| m.base.uuid == id)
                .map(|m| m.base.name.as_str()),
            DmObjectRef::DataObject(d) => d.property(id).map(|p| p.base.name.as_str()),
            _ => self.class().and_then(|class| {
                class
                    .properties
                    .iter()
                    .find(|p| p.base.uuid == id)
                    .map(|p| p.base.name.as_str())
            }),
        }
    }
}

/// A resolved object with its owning aggregation, if any.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DmObjectEntry<'a> {
    pub object: DmObjectRef<'a>,
    pub parent: Option<&'a DmNameModel>,
}

pub trait DmObjectLookup {
    fn get_object_by_id(&self, id: &str) -> Option<DmObjectEntry<'_>>;

    /// Type whose storage a reference to `id` uses. Only enums have one.
    fn reference_storage(&self, id: &str) -> Option<DmTypeExpr> {
        match self.get_object_by_id(id)?.object {
            DmObjectRef::Enum(enumeration) => Some(enum_storage_type(enumeration)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DmStoredObject {
    Entity(DmEntity),
    ValueObject(DmValueObject),
    Enum(DmEnum),
    Dto(DmDto),
    DataObject(DmDataObject),
}

impl DmStoredObject {
    pub fn view(&self) -> DmObjectRef<'_> {
        match self {
            DmStoredObject::Entity(e) => DmObjectRef::Entity(e),
            DmStoredObject::ValueObject(v) => DmObjectRef::ValueObject(v),
            DmStoredObject::Enum(e) => DmObjectRef::Enum(e),
            DmStoredObject::Dto(d) => DmObjectRef::Dto(d),
            DmStoredObject::DataObject(d) => DmObjectRef::DataObject(d),
        }
    }
}

#[derive(Clone, Debug)]
struct DmStoreSlot {
    object: DmStoredObject,
    parent: Option<DmNameModel>,
}

/// In-memory object lookup. The first object inserted under an id wins.
#[derive(Clone, Debug, Default)]
pub struct DmObjectStore {
    slots: HashMap<String, DmStoreSlot>,
    order: Vec<String>,
}

impl DmObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every entity, value object, enum, DTO and data object of
    /// `trees`, earlier trees taking precedence on id clashes. Domain
    /// objects record their aggregation as parent.
    pub fn from_trees(trees: &[&DmTree]) -> Result<Self> {
        let mut store = Self::new();
        for tree in trees {
            for node in tree.nodes() {
                let object = match node.kind {
                    DmNodeKind::Entity => DmStoredObject::Entity(read_node(node)?),
                    DmNodeKind::ValueObject => DmStoredObject::ValueObject(read_node(node)?),
                    DmNodeKind::Enum => DmStoredObject::Enum(read_node(node)?),
                    DmNodeKind::Dto => DmStoredObject::Dto(read_node(node)?),
                    DmNodeKind::DataObject => DmStoredObject::DataObject(read_node(node)?),
                    _ => continue,
                };
                let parent = match tree.parent(node) {
                    Some(parent) if parent.kind == DmNodeKind::Aggregation => {
                        Some(read_node::<DmAggregation>(parent)?.base)
                    }
                    _ => None,
                };
                store.insert_as(node.id.clone(), object, parent);
            }
        }
        debug!("object store loaded {} objects", store.len());
        Ok(store)
    }

    /// Inserts under the object's own uuid.
    pub fn insert(&mut self, object: DmStoredObject, parent: Option<DmNameModel>) -> bool {
        let id = object.view().uuid().to_string();
        self.insert_as(id, object, parent)
    }

    fn insert_as(&mut self, id: String, object: DmStoredObject, parent: Option<DmNameModel>) -> bool {
        if self.slots.contains_key(&id) {
            return false;
        }
        self.order.push(id.clone());
        self.slots.insert(id, DmStoreSlot { object, parent });
        true
    }

    pub fn with_entity(mut self, entity: DmEntity, parent: Option<DmNameModel>) -> Self {
        self.insert(DmStoredObject::Entity(entity), parent);
        self
    }

    pub fn with_value_object(mut self, value_object: DmValueObject, parent: Option<DmNameModel>) -> Self {
        self.insert(DmStoredObject::ValueObject(value_object), parent);
        self
    }

    pub fn with_enum(mut self, enumeration: DmEnum, parent: Option<DmNameModel>) -> Self {
        self.insert(DmStoredObject::Enum(enumeration), parent);
        self
    }

    pub fn with_dto(mut self, dto: DmDto) -> Self {
        self.insert(DmStoredObject::Dto(dto), None);
        self
    }

    pub fn with_data_object(mut self, data_object: DmDataObject) -> Self {
        self.insert(DmStoredObject::DataObject(data_object), None);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = DmObjectEntry<'_>> {
        self.order
            .iter()
            .filter_map(move |id| self.get_object_by_id(id))
    }
}

impl DmObjectLookup for DmObjectStore {
    fn get_object_by_id(&self, id: &str) -> Option<DmObjectEntry<'_>> {
        self.slots.get(id).map(|slot| DmObjectEntry {
            object: slot.object.view(),
            parent: slot.parent.as_ref(),
        })
    }
}
