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

//! Write-once memo of one generation run, keyed by source object uuid.

use std::collections::HashMap;

use crate::errors::{DmError, Result};

/// Results in creation order plus a source-uuid index into them.
#[derive(Clone, Debug)]
pub struct DmGeneratorState<T> {
    list: Vec<T>,
    results: HashMap<String, usize>,
}

impl<T> Default for DmGeneratorState<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            results: HashMap::new(),
        }
    }
}

impl<T> DmGeneratorState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source_uuid: &str) -> Option<&T> {
        self.results.get(source_uuid).map(|&index| &self.list[index])
    }

    pub fn get_mut(&mut self, source_uuid: &str) -> Option<&mut T> {
        match self.results.get(source_uuid) {
            Some(&index) => self.list.get_mut(index),
            None => None,
        }
    }

    pub fn contains(&self, source_uuid: &str) -> bool {
        self.results.contains_key(source_uuid)
    }

    /// Records `result` for `source_uuid`. A second save under the same
    /// uuid is a [`DmError::MemoCollision`].
    pub fn save(&mut self, source_uuid: impl Into<String>, result: T) -> Result<usize> {
        let source_uuid = source_uuid.into();
        if self.results.contains_key(&source_uuid) {
            return Err(DmError::memo_collision(source_uuid));
        }
        let index = self.list.len();
        self.list.push(result);
        self.results.insert(source_uuid, index);
        Ok(index)
    }

    pub fn list(&self) -> &[T] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn into_list(self) -> Vec<T> {
        self.list
    }
}
