// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Value-extractor registry.
//!
//! Extractors are looked up by `(container kind, type-arg index)` through a
//! chain of scopes: each scope holds its own bindings and a parent link,
//! and lookup walks parent-ward until a binding is found. The root scope is
//! pre-populated from the static manifest below and is reachable only
//! behind an `Arc`, so registrations are possible in non-root scopes alone.
//!
//! Each manifest entry carries an activation gate; a gated-off extractor is
//! simply absent from the root scope. All built-ins are unconditionally
//! active today, but environment-specific extractors plug into the same
//! mechanism.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::traits::{CollaboratorError, ExtractedValueReceiver, ValueExtractor};
use crate::value::{FieldValue, ValueType};

/// Lookup key of an extractor binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerKey {
    pub container: ValueType,
    pub type_arg_index: usize,
}

impl ContainerKey {
    pub fn new(container: ValueType, type_arg_index: usize) -> Self {
        ContainerKey { container, type_arg_index }
    }
}

/// A bound extractor plus the path-node name its elements carry.
pub struct ExtractorBinding {
    pub key: ContainerKey,
    pub node_name: String,
    pub extractor: Arc<dyn ValueExtractor>,
}

/// One scope of the extractor registry chain.
pub struct ExtractorRegistry {
    parent: Option<Arc<ExtractorRegistry>>,
    locals: IndexMap<ContainerKey, Arc<ExtractorBinding>>,
}

impl ExtractorRegistry {
    /// A fresh mutable scope over the built-in root.
    pub fn with_defaults() -> Self {
        ExtractorRegistry {
            parent: Some(builtin_root()),
            locals: IndexMap::new(),
        }
    }

    /// A fresh mutable scope with no bindings at all.
    pub fn empty() -> Self {
        ExtractorRegistry {
            parent: None,
            locals: IndexMap::new(),
        }
    }

    /// A child scope of this one.
    pub fn child(parent: Arc<ExtractorRegistry>) -> Self {
        ExtractorRegistry {
            parent: Some(parent),
            locals: IndexMap::new(),
        }
    }

    /// Bind an extractor in this scope, shadowing parent bindings.
    pub fn register(
        &mut self,
        key: ContainerKey,
        node_name: impl Into<String>,
        extractor: Arc<dyn ValueExtractor>,
    ) {
        let binding = Arc::new(ExtractorBinding {
            key: key.clone(),
            node_name: node_name.into(),
            extractor,
        });
        self.locals.insert(key, binding);
    }

    /// Find the binding for a key, walking parent-ward.
    pub fn find(&self, key: &ContainerKey) -> Option<Arc<ExtractorBinding>> {
        if let Some(binding) = self.locals.get(key) {
            return Some(Arc::clone(binding));
        }
        self.parent.as_ref().and_then(|parent| parent.find(key))
    }
}

// --- built-in manifest -----------------------------------------------------

struct ManifestEntry {
    container: ValueType,
    type_arg_index: usize,
    node_name: &'static str,
    gate: fn() -> bool,
    build: fn() -> Arc<dyn ValueExtractor>,
}

fn always_active() -> bool {
    true
}

/// Default extractor manifest: container kind, type-arg index, node name,
/// activation gate, constructor.
fn builtin_manifest() -> Vec<ManifestEntry> {
    vec![
        ManifestEntry {
            container: ValueType::Sequence,
            type_arg_index: 0,
            node_name: "<list element>",
            gate: always_active,
            build: || Arc::new(SequenceExtractor),
        },
        ManifestEntry {
            container: ValueType::Mapping,
            type_arg_index: 0,
            node_name: "<map key>",
            gate: always_active,
            build: || Arc::new(MappingKeyExtractor),
        },
        ManifestEntry {
            container: ValueType::Mapping,
            type_arg_index: 1,
            node_name: "<map value>",
            gate: always_active,
            build: || Arc::new(MappingValueExtractor),
        },
        ManifestEntry {
            container: ValueType::Optional,
            type_arg_index: 0,
            node_name: "<optional value>",
            gate: always_active,
            build: || Arc::new(OptionalExtractor),
        },
    ]
}

/// The shared root scope, populated from the manifest.
fn builtin_root() -> Arc<ExtractorRegistry> {
    let mut locals = IndexMap::new();
    for entry in builtin_manifest() {
        if !(entry.gate)() {
            continue;
        }
        let key = ContainerKey::new(entry.container.clone(), entry.type_arg_index);
        locals.insert(
            key.clone(),
            Arc::new(ExtractorBinding {
                key,
                node_name: entry.node_name.to_string(),
                extractor: (entry.build)(),
            }),
        );
    }
    Arc::new(ExtractorRegistry { parent: None, locals })
}

// --- built-in extractors ---------------------------------------------------

struct SequenceExtractor;

impl ValueExtractor for SequenceExtractor {
    fn extract(
        &self,
        container: &FieldValue,
        receiver: &mut dyn ExtractedValueReceiver,
    ) -> Result<(), CollaboratorError> {
        if let FieldValue::Sequence(items) = container {
            for (index, item) in items.iter().enumerate() {
                receiver.indexed("<list element>", index, item);
            }
        }
        Ok(())
    }
}

struct MappingKeyExtractor;

impl ValueExtractor for MappingKeyExtractor {
    fn extract(
        &self,
        container: &FieldValue,
        receiver: &mut dyn ExtractedValueReceiver,
    ) -> Result<(), CollaboratorError> {
        if let FieldValue::Mapping(entries) = container {
            for (key, _) in entries {
                let key_value = FieldValue::Text(key.clone());
                receiver.keyed("<map key>", key, &key_value);
            }
        }
        Ok(())
    }
}

struct MappingValueExtractor;

impl ValueExtractor for MappingValueExtractor {
    fn extract(
        &self,
        container: &FieldValue,
        receiver: &mut dyn ExtractedValueReceiver,
    ) -> Result<(), CollaboratorError> {
        if let FieldValue::Mapping(entries) = container {
            for (key, value) in entries {
                receiver.keyed("<map value>", key, value);
            }
        }
        Ok(())
    }
}

struct OptionalExtractor;

impl ValueExtractor for OptionalExtractor {
    fn extract(
        &self,
        container: &FieldValue,
        receiver: &mut dyn ExtractedValueReceiver,
    ) -> Result<(), CollaboratorError> {
        if let FieldValue::Optional(inner) = container {
            // An empty optional unwraps to the null marker, so null-aware
            // constraints see the same value they would on a plain field.
            match inner {
                Some(value) => receiver.value("<optional value>", value),
                None => receiver.value("<optional value>", &FieldValue::Null),
            }
        }
        Ok(())
    }
}
