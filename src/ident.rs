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

//! Identifier minting for generated and cloned DSL objects.
//!
//! Compilers never mint identifiers; only the generator pipeline and the
//! retarget transforms do, through a [`DmIdGenerator`] handed in by the
//! caller.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

pub trait DmIdGenerator {
    fn next_id(&self) -> String;
}

/// Random UUID v4 identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct DmUuidGenerator;

impl DmUuidGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl DmIdGenerator for DmUuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `"<prefix>-<n>"` identifiers, counting from 1.
#[derive(Debug)]
pub struct DmSequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl DmSequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Number of identifiers minted so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for DmSequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl DmIdGenerator for DmSequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

impl<G: DmIdGenerator + ?Sized> DmIdGenerator for &G {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}
