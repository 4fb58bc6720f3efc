//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Dmx.
//! The Dmx project belongs to the Dunimd Team.
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

//! # Dmx Core Library
//!
//! Dmx compiles the node trees of a domain-driven design document into a
//! canonical, strongly typed DSL and generates derived artifacts (queries,
//! DTOs, data objects, field mappers) from aggregate roots.
//!
//! ## Module Overview
//!
//! - **tree**: Raw node snapshots keyed by id
//! - **traverse**: Pre-order tree walk with deferred post-traversal closures
//! - **types**: Type expressions, rendering and dependency extraction
//! - **storage**: Persistence column types
//! - **compat**: Domain type to storage type compatibility
//! - **automap**: Fuzzy field auto-mapping
//! - **model**: Typed property bags of document nodes
//! - **dsl**: Canonical compiled records
//! - **compiler**: Domain, query, data and mapper compilers
//! - **lookup**: Cross-subtree object lookup
//! - **generator**: Artifact generation from an aggregate root
//! - **retarget**: Clone and kind-reinterpretation transforms
//! - **derived**: Dependency, association and aggregation edges
//! - **document**: Whole-document compilation and digests
//! - **config**: Compiler configuration
//! - **ident**: Identifier minting
//!
//! ## Quick Start
//!
//! ```rust
//! use dmx::{DmConfig, DmDocumentCompiler};
//!
//! let compiler = DmDocumentCompiler::new(DmConfig::default());
//! let json = compiler.compile_json(br#"{ "vision": "Sell things" }"#).unwrap();
//! assert!(json.contains("\"vision\":\"Sell things\""));
//! ```
//!
//! ## Architecture
//!
//! 1. **Snapshot**: a document arrives as four id-keyed node trees
//! 2. **Compilers**: each tree is walked once and compiled to DSL
//! 3. **Lookup**: compiled view models resolve mapper references
//! 4. **Generator**: an aggregate root expands into new view models
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, DmError>`. Structural errors
//! (a node whose uuid differs from its id) abort compilation; unresolvable
//! references in batch compilation are dropped with a warning.

#![allow(non_snake_case)]

pub mod errors;
pub mod config;
pub mod ident;
pub mod tree;
pub mod traverse;
pub mod types;
pub mod storage;
pub mod compat;
pub mod automap;
pub mod model;
pub mod dsl;
pub mod compiler;
pub mod lookup;
pub mod generator;
pub mod retarget;
pub mod derived;
pub mod document;

pub use errors::{DmError, Result};
pub use config::{DmAutoMapConfig, DmConfig, DEFAULT_ROOT_ID};
pub use ident::{DmIdGenerator, DmSequentialIds, DmUuidGenerator};
pub use tree::{DmNode, DmNodeKind, DmTree};
pub use traverse::{traverse, DmPostTraverse, DmTreeHandler};
pub use types::{extract_dependencies, stringify, structural_equals, DmTypeExpr};
pub use storage::{DmCardinality, DmStorageKind, DmStorageType};
pub use compat::{compatible_targets, is_compatible, project_to_storage};
pub use automap::{auto_map, DmFuzzyIndex, DmFuzzyMatch};
pub use dsl::DmBusinessDomainDsl;
pub use compiler::{compile_data_model, compile_domain_model, compile_object_mapper, compile_query_model};
pub use lookup::{DmObjectLookup, DmObjectRef, DmObjectStore};
pub use generator::{generate_aggregate, DmAggregateGenerator, DmGeneration, DmGeneratorState};
pub use retarget::{DmRetarget, DmRetargetKind, DmRetargetSource, DmRetargeted};
pub use derived::{recompute, DmDerivedView, DmEdge, DmRelationship};
pub use document::{digest, DmDocumentCompiler, DmDocumentSnapshot};
