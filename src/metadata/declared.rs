// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The declared (programmatic) metadata source.
//!
//! The primary source of constraint metadata: applications register what
//! their types declare, the native analogue of annotations read off a
//! class. The source is populated during engine assembly and read-only
//! afterwards; it always abstains from mapping-behavior consensus since
//! the behavior controls treat *it* as the baseline.

use std::collections::HashMap;

use crate::metadata::raw::{MappingBehavior, MetadataSource, RawEntity};

#[derive(Debug, Default)]
pub struct DeclaredSource {
    entities: HashMap<String, RawEntity>,
}

impl DeclaredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type's declared metadata, replacing any previous entry.
    pub fn register(&mut self, entity: RawEntity) {
        let mut entity = entity;
        entity.behavior = MappingBehavior::Abstain;
        self.entities.insert(entity.type_name.clone(), entity);
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl MetadataSource for DeclaredSource {
    fn entity(&self, type_name: &str) -> Option<RawEntity> {
        self.entities.get(type_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintDeclaration;

    #[test]
    fn test_register_and_query() {
        let mut source = DeclaredSource::new();
        source.register(RawEntity::new("User").constrained(ConstraintDeclaration::new("NotNull")));

        let entity = source.entity("User").unwrap();
        assert_eq!(entity.constraints.len(), 1);
        assert!(source.entity("Order").is_none());
    }

    #[test]
    fn test_declared_source_always_abstains() {
        let mut source = DeclaredSource::new();
        source.register(RawEntity::new("User").with_behavior(MappingBehavior::Override));
        assert_eq!(
            source.entity("User").unwrap().behavior,
            MappingBehavior::Abstain
        );
    }
}
