// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod catalog;
mod composition;
mod declaration;

pub use catalog::{ConstraintCatalog, ConstraintDefinition, OverrideDeclaration};
pub use composition::{ComposedMember, CompositionCache, CompositionPlan, resolve_composition};
pub use declaration::{
    AttributeMap, AttributeValue, ConstraintDeclaration, ConstraintTarget, SKIP_PAYLOAD,
    UNWRAP_PAYLOAD,
};
