// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod builtin;        // built-in constraint kinds + validators
pub mod config;         // engine options + loader
pub mod constraint;     // constraint catalog, declarations, composition
pub mod descriptor;     // immutable per-type metadata
pub mod engine;         // group computer + validation jobs
pub mod errors;         // error handling
pub mod metadata;       // metadata sources + builder pipeline
pub mod observability;
pub mod path;           // property-path model
pub mod registry;       // validator + extractor registries
pub mod traits;         // collaborator contracts
pub mod value;          // object-graph arena + declared-type lattice
