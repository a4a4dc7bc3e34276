// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-wide descriptor cache with idempotent first-wins publication.
//!
//! The first thread to request a type runs the builder pipeline; racing
//! threads may redo that work, but publication is idempotent: whichever
//! descriptor lands first is the one every reader observes from then on.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::descriptor::entity::EntityDescriptor;

#[derive(Debug, Default)]
pub struct DescriptorCache {
    inner: RwLock<HashMap<String, Arc<EntityDescriptor>>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<EntityDescriptor>> {
        let inner = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.get(type_name).map(Arc::clone)
    }

    /// Publish a freshly built descriptor; the first completed value wins.
    ///
    /// Returns the descriptor all readers will observe, which is not
    /// necessarily the argument when another thread published first.
    pub fn publish(&self, descriptor: EntityDescriptor) -> Arc<EntityDescriptor> {
        let mut inner = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = inner
            .entry(descriptor.type_name.clone())
            .or_insert_with(|| Arc::new(descriptor));
        Arc::clone(entry)
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
