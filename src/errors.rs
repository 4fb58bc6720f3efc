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

//! # Dmx Error Module
//!
//! This module defines the error types shared by every stage of the DSL
//! compilation and artifact-generation engine.
//!
//! ## Error Categories
//!
//! - **IdentifierMismatch**: a node's declared `uuid` differs from its id.
//!   Structural integrity failure, aborts the whole compilation.
//! - **Schema**: a node's property bag cannot be read as its declared kind
//! - **Validation**: invalid caller input (e.g. generating from a
//!   non-aggregate-root entity)
//! - **UnsupportedReference**: a reference the generator cannot synthesize
//!   a DTO type for
//! - **MemoCollision**: a generator memo slot was written twice
//! - **AmbiguousOverload**: two same-named methods with indistinguishable
//!   parameter lists
//! - **Config**: unreadable or invalid configuration
//! - **Io** / **Serde**: wrapped IO and (de)serialization failures
//! - **Internal**: unexpected internal failures
//!
//! Type-compatibility checks and auto-mapping never produce errors; they
//! answer `false` or omit the pair instead.
//!
//! ## Usage
//!
//! ```rust
//! use dmx::errors::{DmError, Result};
//!
//! fn require_root(flag: bool) -> Result<()> {
//!     if !flag {
//!         return Err(DmError::validation("generation must start from an aggregation root"));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Dmx.
pub type Result<T> = std::result::Result<T, DmError>;

/// Canonical error enumeration for Dmx.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmError {
    /// A node whose `properties.uuid` does not equal its own id.
    #[error("identifier mismatch: node '{id}' declares uuid '{uuid}'")]
    IdentifierMismatch { id: String, uuid: String },

    /// A property bag that cannot be read as the declared node kind.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A reference the generator cannot turn into a DTO type.
    #[error("unsupported reference '{id}': {message}")]
    UnsupportedReference { id: String, message: String },

    /// A generator memo slot saved twice in one run.
    #[error("generator state already holds a result for '{uuid}'")]
    MemoCollision { uuid: String },

    /// Two overloads of one method that no caller could tell apart.
    #[error("method '{method}' declares two overloads with identical parameters")]
    AmbiguousOverload { method: String },

    /// Unreadable or invalid configuration.
    #[error("config error: {message}")]
    Config { message: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for DmError {
    fn from(err: io::Error) -> Self {
        DmError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DmError {
    fn from(err: serde_json::Error) -> Self {
        DmError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for DmError {
    fn from(err: serde_yaml::Error) -> Self {
        DmError::Serde(err.to_string())
    }
}

impl DmError {
    /// Helper to construct identifier mismatch errors.
    pub fn identifier_mismatch(id: impl Into<String>, uuid: impl Into<String>) -> Self {
        DmError::IdentifierMismatch {
            id: id.into(),
            uuid: uuid.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        DmError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        DmError::Validation {
            message: message.into(),
        }
    }

    pub fn unsupported_reference(id: impl Into<String>, message: impl Into<String>) -> Self {
        DmError::UnsupportedReference {
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn memo_collision(uuid: impl Into<String>) -> Self {
        DmError::MemoCollision { uuid: uuid.into() }
    }

    pub fn ambiguous_overload(method: impl Into<String>) -> Self {
        DmError::AmbiguousOverload {
            method: method.into(),
        }
    }

    /// Helper to construct config errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        DmError::Config {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        DmError::Internal(message.into())
    }

    /// Whether the error aborts a compilation rather than describing bad
    /// caller input.
    pub fn is_structural(&self) -> bool {
        matches!(self, DmError::IdentifierMismatch { .. } | DmError::Schema { .. })
    }
}
