// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod context;
mod factory;
mod groups;
#[cfg(test)]
mod integration_tests;
mod job;
mod violation;

pub use context::{ConstraintContext, NodeBuilder, ViolationBuilder};
pub use factory::{EngineBuilder, ValidationEngine};
pub use groups::{compute_plan, GroupCatalog, GroupPlan};
pub use job::ValidationJob;
pub use violation::ConstraintViolation;
