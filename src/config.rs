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

//! # Dmx Configuration
//!
//! Settings shared by the compilers, the generator pipeline and the fuzzy
//! auto-mapper. Every field has a default, so an empty JSON or YAML object
//! is a valid configuration.
//!
//! ```rust
//! use dmx::DmConfig;
//!
//! let config = DmConfig::default().with_strict(true).with_automap_threshold(0.75);
//! assert_eq!(config.root_id, "__ROOT__");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{DmError, Result};

/// Well-known root id of every snapshot subtree.
pub const DEFAULT_ROOT_ID: &str = "__ROOT__";

/// Fuzzy index settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmAutoMapConfig {
    /// Minimum Jaro-Winkler similarity for a candidate to be returned.
    pub threshold: f64,
    pub case_insensitive: bool,
}

impl Default for DmAutoMapConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            case_insensitive: true,
        }
    }
}

/// Compiler and generator configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmConfig {
    pub root_id: String,
    /// Rendering of an absent property or parameter type.
    pub void_class: String,
    /// Rendering of an absent method, command or query result.
    pub void_return: String,
    /// Property-bag key naming an entity's identifier property.
    pub id_field: String,
    /// Reject unknown node kinds instead of skipping them.
    pub strict: bool,
    pub automap: DmAutoMapConfig,
}

impl Default for DmConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            void_class: "Void".to_string(),
            void_return: "void".to_string(),
            id_field: "id".to_string(),
            strict: false,
            automap: DmAutoMapConfig::default(),
        }
    }
}

impl DmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    pub fn with_void_class(mut self, void_class: impl Into<String>) -> Self {
        self.void_class = void_class.into();
        self
    }

    pub fn with_void_return(mut self, void_return: impl Into<String>) -> Self {
        self.void_return = void_return.into();
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_automap_threshold(mut self, threshold: f64) -> Self {
        self.automap.threshold = threshold;
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.automap.case_insensitive = case_insensitive;
        self
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let config: DmConfig = serde_json::from_str(source)?;
        config.validate()
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let config: DmConfig = serde_yaml::from_str(source)?;
        config.validate()
    }

    /// Loads a configuration file, choosing the format by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            other => Err(DmError::config(format!(
                "unsupported config extension '{}'",
                other
            ))),
        }
    }

    fn validate(self) -> Result<Self> {
        if self.root_id.is_empty() {
            return Err(DmError::config("root_id must not be empty"));
        }
        if self.id_field.is_empty() {
            return Err(DmError::config("id_field must not be empty"));
        }
        if !(0.0..=1.0).contains(&self.automap.threshold) {
            return Err(DmError::config(format!(
                "automap.threshold must be within [0, 1], got {}",
                self.automap.threshold
            )));
        }
        Ok(self)
    }
}
