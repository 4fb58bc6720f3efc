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

//! # Generator Pipeline
//!
//! Synthesizes queries, DTOs, a data object and field mappers from one
//! aggregate-root entity. Outputs are view-model records, ready to be
//! inserted into a document as new nodes.
//!
//! ## Example
//!
//! ```rust
//! use dmx::generator::generate_aggregate;
//! use dmx::ident::DmSequentialIds;
//! use dmx::lookup::DmObjectStore;
//! use dmx::model::{DmEntity, DmProperty};
//! use dmx::types::DmTypeExpr;
//!
//! let root = DmEntity::new("order", "Order")
//!     .with_id_property(DmProperty::new("order-id", "id", DmTypeExpr::base("Long")))
//!     .as_aggregation_root();
//! let generation = generate_aggregate(&root, &DmObjectStore::new(), &DmSequentialIds::default()).unwrap();
//! assert_eq!(generation.data_object.base.name, "OrderDO");
//! ```

pub mod aggregate;
pub mod dto;
pub mod state;

pub use aggregate::{generate_aggregate, DmAggregateGenerator, DmGeneratedQueries, DmGeneration};
pub use dto::DmDtoSynthesizer;
pub use state::DmGeneratorState;
