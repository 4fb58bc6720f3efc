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

//! # Dmx Type Compatibility
//!
//! Decides which storage column kinds a domain type may be written to.
//!
//! Base types follow a fixed table. References are resolved once through a
//! caller-supplied resolver (enums resolve to their primitive base) and then
//! checked like a base type. Containers, and references that resolve to
//! something other than a base type, only fit an opaque `JSON` column.
//!
//! | base | storage kinds |
//! |---|---|
//! | String, Char | String, Text, LongText |
//! | Integer, Short, Byte | Integer, Long |
//! | Long | Long |
//! | Float | Float, Double, Decimal |
//! | Double | Double, Decimal |
//! | BigDecimal | Decimal |
//! | Boolean | Boolean, Integer |
//! | Date | DateTime, Date, Timestamp |
//! | Void | none |
//!
//! The first entry of a row is the default storage the generator picks.

use crate::lookup::{DmObjectLookup, DmObjectRef};
use crate::model::{DmDataProperty, DmEnum, DmEnumBase};
use crate::storage::{DmStorageKind, DmStorageType};
use crate::types::DmTypeExpr;

const TEXTUAL: &[DmStorageKind] = &[
    DmStorageKind::String,
    DmStorageKind::Text,
    DmStorageKind::LongText,
];
const INTEGRAL: &[DmStorageKind] = &[DmStorageKind::Integer, DmStorageKind::Long];

/// Storage kinds a base type may be written to. Unknown names map to none.
pub fn compatible_storage(base: &str) -> &'static [DmStorageKind] {
    match base {
        "String" | "Char" => TEXTUAL,
        "Integer" | "Short" | "Byte" => INTEGRAL,
        "Long" => &[DmStorageKind::Long],
        "Float" => &[
            DmStorageKind::Float,
            DmStorageKind::Double,
            DmStorageKind::Decimal,
        ],
        "Double" => &[DmStorageKind::Double, DmStorageKind::Decimal],
        "BigDecimal" => &[DmStorageKind::Decimal],
        "Boolean" => &[DmStorageKind::Boolean, DmStorageKind::Integer],
        "Date" => &[
            DmStorageKind::DateTime,
            DmStorageKind::Date,
            DmStorageKind::Timestamp,
        ],
        _ => &[],
    }
}

/// Default storage kind of a base type, falling back to `String`.
pub fn default_storage(base: &str) -> DmStorageKind {
    compatible_storage(base)
        .first()
        .copied()
        .unwrap_or(DmStorageKind::String)
}

/// Effective primitive type of an enum: `Integer` for numeric codes,
/// `String` otherwise.
pub fn enum_storage_type(enumeration: &DmEnum) -> DmTypeExpr {
    match enumeration.base_type {
        DmEnumBase::Number => DmTypeExpr::base("Integer"),
        DmEnumBase::String => DmTypeExpr::base("String"),
    }
}

/// Whether a value of type `source` may be stored in a `target` column.
///
/// `resolve` maps a reference id to the type whose storage it uses, or
/// `None` when the reference cannot be stored as a scalar.
pub fn is_compatible<R>(source: &DmTypeExpr, target: &DmStorageType, resolve: R) -> bool
where
    R: Fn(&str) -> Option<DmTypeExpr>,
{
    let resolved;
    let effective = match source {
        DmTypeExpr::Reference { reference_id, .. } => match resolve(reference_id) {
            Some(ty) => {
                resolved = ty;
                &resolved
            }
            None => return false,
        },
        other => other,
    };

    match effective {
        DmTypeExpr::Base { name } => compatible_storage(name).contains(&target.kind()),
        _ => target.kind() == DmStorageKind::Json,
    }
}

/// Target fields a source field of type `source` may be mapped to, in
/// declaration order.
pub fn compatible_targets<'a, R>(
    source: &DmTypeExpr,
    targets: &'a [DmDataProperty],
    resolve: R,
) -> Vec<&'a DmDataProperty>
where
    R: Fn(&str) -> Option<DmTypeExpr>,
{
    targets
        .iter()
        .filter(|target| is_compatible(source, &target.ty, &resolve))
        .collect()
}

/// Projects a domain type onto a storage column type.
///
/// Base types take their default storage; a reference to an enum takes
/// `Integer` or `String` by the enum's base. Everything else, including
/// every reference when no lookup is given, has no scalar projection.
pub fn project_to_storage(
    ty: Option<&DmTypeExpr>,
    lookup: Option<&dyn DmObjectLookup>,
) -> Option<DmStorageType> {
    match ty? {
        DmTypeExpr::Base { name } => Some(DmStorageType::of_kind(default_storage(name))),
        DmTypeExpr::Reference { reference_id, .. } => {
            let entry = lookup?.get_object_by_id(reference_id)?;
            match entry.object {
                DmObjectRef::Enum(enumeration) => {
                    let storage = match enumeration.base_type {
                        DmEnumBase::Number => DmStorageKind::Integer,
                        DmEnumBase::String => DmStorageKind::String,
                    };
                    Some(DmStorageType::of_kind(storage))
                }
                _ => None,
            }
        }
        DmTypeExpr::Container { .. } => None,
    }
}
