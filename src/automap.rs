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

//! # Dmx Auto-Mapper
//!
//! Proposes source-field to target-column pairs by fuzzy name similarity,
//! keeping only pairs whose types are compatible.
//!
//! Names are ranked with Jaro-Winkler similarity; candidates below the
//! configured threshold are discarded. For every named source property the
//! best-ranked compatible target is taken and the search stops there, so a
//! source field maps to at most one target. Fields with no compatible match
//! are left out rather than mapped wrongly.

use std::collections::BTreeMap;

use crate::compat::is_compatible;
use crate::config::DmAutoMapConfig;
use crate::model::{DmDataProperty, DmProperty};
use crate::types::DmTypeExpr;

/// One ranked candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct DmFuzzyMatch {
    /// Position in the indexed list.
    pub index: usize,
    pub score: f64,
}

/// Name search index over a fixed list of target names.
#[derive(Clone, Debug)]
pub struct DmFuzzyIndex {
    entries: Vec<(usize, String)>,
    threshold: f64,
    case_insensitive: bool,
}

impl DmFuzzyIndex {
    /// Indexes `names`; empty names are never returned.
    pub fn new<'a, I>(names: I, config: &DmAutoMapConfig) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let entries = names
            .into_iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(index, name)| (index, Self::normalise(name, config.case_insensitive)))
            .collect();
        Self {
            entries,
            threshold: config.threshold,
            case_insensitive: config.case_insensitive,
        }
    }

    fn normalise(name: &str, case_insensitive: bool) -> String {
        if case_insensitive {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Matches at or above the threshold, best first. Equal scores keep
    /// index order.
    pub fn search(&self, query: &str) -> Vec<DmFuzzyMatch> {
        let query = Self::normalise(query, self.case_insensitive);
        let mut matches: Vec<DmFuzzyMatch> = self
            .entries
            .iter()
            .map(|(index, name)| DmFuzzyMatch {
                index: *index,
                score: strsim::jaro_winkler(&query, name),
            })
            .filter(|m| m.score >= self.threshold)
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps source property uuids to target property uuids.
///
/// `resolve` gives the storage-relevant type of a referenced id (see
/// [`is_compatible`]). Neither side is modified.
pub fn auto_map<R>(
    source: &[DmProperty],
    target: &[DmDataProperty],
    resolve: R,
    config: &DmAutoMapConfig,
) -> BTreeMap<String, String>
where
    R: Fn(&str) -> Option<DmTypeExpr>,
{
    let index = DmFuzzyIndex::new(target.iter().map(|p| p.base.name.as_str()), config);
    let mut mapping = BTreeMap::new();

    for property in source {
        if property.base.name.is_empty() {
            continue;
        }
        let Some(ty) = property.ty.as_ref() else {
            continue;
        };
        let accepted = index
            .search(&property.base.name)
            .into_iter()
            .map(|m| &target[m.index])
            .find(|candidate| is_compatible(ty, &candidate.ty, &resolve));
        if let Some(candidate) = accepted {
            mapping.insert(property.base.uuid.clone(), candidate.base.uuid.clone());
        }
    }

    mapping
}
