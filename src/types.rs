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

//! # Dmx Type Expressions
//!
//! The recursive type grammar used by properties, parameters and method
//! results, plus the analyses the compilers and the generator run over it.
//!
//! ## Grammar
//!
//! - `Base { name }`: a primitive such as `String`, `Long` or `Date`
//! - `Container { name, params }`: `List` and `Set` carry an `item` param,
//!   `Map` carries `key` and `value`; any param may be absent
//! - `Reference { referenceId, name }`: another node, by id; `name` is a
//!   display name only
//!
//! ## Analyses
//!
//! - [`stringify`]: canonical text rendering (`List<Order>`, `Map<String, Long>`)
//! - [`extract_dependencies`]: referenced ids, order preserving and de-duplicated
//! - [`structural_equals`]: variant-wise equality ignoring display names
//! - [`map_references`]: rebuilds a type with every reference replaced
//! - [`class_dependencies`] and friends: association/dependency split used
//!   by the derived view

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::{DmClassModel, DmCommand, DmMethod, DmParameter, DmProperty, DmQuery};

/// Container names.
pub const LIST: &str = "List";
pub const SET: &str = "Set";
pub const MAP: &str = "Map";

/// Container param names.
pub const ITEM: &str = "item";
pub const KEY: &str = "key";
pub const VALUE: &str = "value";

/// Rendering of an absent type when no configuration is at hand.
pub const VOID_CLASS: &str = "Void";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DmTypeExpr {
    Base {
        name: String,
    },
    Container {
        name: String,
        #[serde(default)]
        params: BTreeMap<String, Option<DmTypeExpr>>,
    },
    Reference {
        #[serde(rename = "referenceId")]
        reference_id: String,
        #[serde(default)]
        name: String,
    },
}

impl DmTypeExpr {
    pub fn base(name: impl Into<String>) -> Self {
        DmTypeExpr::Base { name: name.into() }
    }

    pub fn list(item: DmTypeExpr) -> Self {
        Self::single(LIST, item)
    }

    pub fn set(item: DmTypeExpr) -> Self {
        Self::single(SET, item)
    }

    pub fn map(key: DmTypeExpr, value: DmTypeExpr) -> Self {
        let mut params = BTreeMap::new();
        params.insert(KEY.to_string(), Some(key));
        params.insert(VALUE.to_string(), Some(value));
        DmTypeExpr::Container {
            name: MAP.to_string(),
            params,
        }
    }

    pub fn reference(reference_id: impl Into<String>, name: impl Into<String>) -> Self {
        DmTypeExpr::Reference {
            reference_id: reference_id.into(),
            name: name.into(),
        }
    }

    fn single(name: &str, item: DmTypeExpr) -> Self {
        let mut params = BTreeMap::new();
        params.insert(ITEM.to_string(), Some(item));
        DmTypeExpr::Container {
            name: name.to_string(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DmTypeExpr::Base { name }
            | DmTypeExpr::Container { name, .. }
            | DmTypeExpr::Reference { name, .. } => name,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, DmTypeExpr::Base { .. })
    }

    pub fn reference_id(&self) -> Option<&str> {
        match self {
            DmTypeExpr::Reference { reference_id, .. } => Some(reference_id),
            _ => None,
        }
    }

    fn param(&self, key: &str) -> Option<&DmTypeExpr> {
        match self {
            DmTypeExpr::Container { params, .. } => params.get(key).and_then(Option::as_ref),
            _ => None,
        }
    }
}

impl fmt::Display for DmTypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = stringify(Some(self), VOID_CLASS, &|_, name| name.to_string());
        write!(f, "{}", rendered)
    }
}

/// Renders a type. `resolve` receives `(referenceId, displayName)` and
/// returns the name to print for a reference.
pub fn stringify<F>(ty: Option<&DmTypeExpr>, void_token: &str, resolve: &F) -> String
where
    F: Fn(&str, &str) -> String,
{
    let Some(ty) = ty else {
        return void_token.to_string();
    };

    match ty {
        DmTypeExpr::Base { name } => name.clone(),
        DmTypeExpr::Container { name, .. } if name == MAP => format!(
            "Map<{}, {}>",
            stringify(ty.param(KEY), void_token, resolve),
            stringify(ty.param(VALUE), void_token, resolve)
        ),
        DmTypeExpr::Container { name, .. } => format!(
            "{}<{}>",
            name,
            stringify(ty.param(ITEM), void_token, resolve)
        ),
        DmTypeExpr::Reference { reference_id, name } => resolve(reference_id, name),
    }
}

/// Ids referenced anywhere inside `ty`, first occurrence order.
pub fn extract_dependencies(ty: Option<&DmTypeExpr>) -> Vec<String> {
    let Some(ty) = ty else {
        return Vec::new();
    };

    match ty {
        DmTypeExpr::Base { .. } => Vec::new(),
        DmTypeExpr::Reference { reference_id, .. } => vec![reference_id.clone()],
        DmTypeExpr::Container { name, .. } if name == MAP => {
            let mut deps = extract_dependencies(ty.param(KEY));
            deps.extend(extract_dependencies(ty.param(VALUE)));
            unique(deps)
        }
        DmTypeExpr::Container { .. } => extract_dependencies(ty.param(ITEM)),
    }
}

/// Order-preserving de-duplication.
pub fn unique<I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

pub fn dependencies_of_properties(properties: &[DmProperty]) -> Vec<String> {
    unique(
        properties
            .iter()
            .flat_map(|p| extract_dependencies(p.ty.as_ref())),
    )
}

pub fn dependencies_of_parameters(parameters: &[DmParameter]) -> Vec<String> {
    unique(
        parameters
            .iter()
            .flat_map(|p| extract_dependencies(p.ty.as_ref())),
    )
}

pub fn dependencies_of_methods(methods: &[DmMethod]) -> Vec<String> {
    unique(methods.iter().flat_map(|m| {
        let mut deps = dependencies_of_parameters(&m.parameters);
        deps.extend(extract_dependencies(m.result.as_ref()));
        deps
    }))
}

/// Class-level dependency split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmClassDependencies {
    /// Ids used only by method signatures.
    pub dependencies: Vec<String>,
    /// Ids held by properties.
    pub associations: Vec<String>,
}

impl DmClassDependencies {
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.associations.iter().chain(self.dependencies.iter())
    }

    fn add_dependency(&mut self, id: String) {
        if !self.associations.contains(&id) && !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
    }
}

/// Property references are associations, method references are
/// dependencies; an id held by both is an association only.
pub fn class_dependencies(class: &DmClassModel) -> DmClassDependencies {
    let associations = unique(
        dependencies_of_properties(&class.properties)
            .into_iter()
            .chain(dependencies_of_properties(&class.class_properties)),
    );

    let mut deps = DmClassDependencies {
        dependencies: Vec::new(),
        associations,
    };
    for id in dependencies_of_methods(&class.methods)
        .into_iter()
        .chain(dependencies_of_methods(&class.class_methods))
    {
        deps.add_dependency(id);
    }
    deps
}

/// Commands only hold associations: their properties and event properties.
pub fn command_dependencies(command: &DmCommand) -> Vec<String> {
    unique(
        dependencies_of_properties(&command.properties)
            .into_iter()
            .chain(dependencies_of_properties(&command.event_properties)),
    )
}

/// Query properties are associations; the result type adds dependencies.
pub fn query_dependencies(query: &DmQuery) -> DmClassDependencies {
    let mut deps = DmClassDependencies {
        dependencies: Vec::new(),
        associations: dependencies_of_properties(&query.properties),
    };
    for id in extract_dependencies(query.result.as_ref()) {
        deps.add_dependency(id);
    }
    deps
}

/// Variant-wise equality: same base name, same container name with
/// pairwise equal params, or the same reference target. Reference display
/// names are ignored.
pub fn structural_equals(a: &DmTypeExpr, b: &DmTypeExpr) -> bool {
    match (a, b) {
        (DmTypeExpr::Base { name: x }, DmTypeExpr::Base { name: y }) => x == y,
        (
            DmTypeExpr::Container { name: x, params: px },
            DmTypeExpr::Container { name: y, params: py },
        ) => {
            x == y
                && px.len() == py.len()
                && px.iter().all(|(key, left)| match py.get(key) {
                    Some(right) => optional_equals(left.as_ref(), right.as_ref()),
                    None => false,
                })
        }
        (
            DmTypeExpr::Reference { reference_id: x, .. },
            DmTypeExpr::Reference { reference_id: y, .. },
        ) => x == y,
        _ => false,
    }
}

pub fn optional_equals(a: Option<&DmTypeExpr>, b: Option<&DmTypeExpr>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => structural_equals(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Rebuilds `ty`, replacing every reference with `f(referenceId, name)`.
/// Base types are copied, container params are rebuilt recursively.
pub fn map_references<F>(ty: &DmTypeExpr, f: &mut F) -> Result<DmTypeExpr>
where
    F: FnMut(&str, &str) -> Result<DmTypeExpr>,
{
    match ty {
        DmTypeExpr::Base { .. } => Ok(ty.clone()),
        DmTypeExpr::Container { name, params } => {
            let mut mapped = BTreeMap::new();
            for (key, param) in params {
                let value = match param {
                    Some(inner) => Some(map_references(inner, f)?),
                    None => None,
                };
                mapped.insert(key.clone(), value);
            }
            Ok(DmTypeExpr::Container {
                name: name.clone(),
                params: mapped,
            })
        }
        DmTypeExpr::Reference { reference_id, name } => f(reference_id, name),
    }
}
