// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Object-graph arena for validated instances.
//!
//! Validation walks arbitrary object graphs, including cyclic ones. Rust
//! ownership rules out direct back-references, so instances live in an
//! arena and refer to each other by [`InstanceId`]. Identity-based cycle
//! detection and the at-most-once visit guarantee key on those ids.
//!
//! # Example
//!
//! ```
//! use the_turnstile::value::{FieldValue, ObjectGraph};
//!
//! let mut graph = ObjectGraph::new();
//! let order = graph.add_instance("Order");
//! graph.set_property(order, "amount", FieldValue::Int(250));
//!
//! let customer = graph.add_instance("Customer");
//! graph.set_property(customer, "order", FieldValue::Entity(order));
//! // Cycles are just ids pointing back:
//! graph.set_property(order, "customer", FieldValue::Entity(customer));
//! ```

use indexmap::IndexMap;

/// Index of an instance inside an [`ObjectGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) usize);

/// A runtime value held by a property, parameter, or container element.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Text(String),
    Sequence(Vec<FieldValue>),
    /// Keys are rendered strings; the key path node stores the same rendering.
    Mapping(Vec<(String, FieldValue)>),
    Optional(Option<Box<FieldValue>>),
    /// Edge to another instance in the same arena.
    Entity(InstanceId),
}

impl FieldValue {
    /// Whether this value is the null marker (not an empty container).
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

#[derive(Debug)]
struct InstanceData {
    type_name: String,
    properties: IndexMap<String, FieldValue>,
}

/// Arena of validated instances; edges are indices, never owning references.
#[derive(Debug, Default)]
pub struct ObjectGraph {
    instances: Vec<InstanceData>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance of the named entity type with no properties set.
    pub fn add_instance(&mut self, type_name: impl Into<String>) -> InstanceId {
        let id = InstanceId(self.instances.len());
        self.instances.push(InstanceData {
            type_name: type_name.into(),
            properties: IndexMap::new(),
        });
        id
    }

    /// Set a property value, replacing any previous value.
    pub fn set_property(&mut self, id: InstanceId, name: impl Into<String>, value: FieldValue) {
        self.instances[id.0].properties.insert(name.into(), value);
    }

    /// Declared entity type of an instance.
    pub fn type_name(&self, id: InstanceId) -> &str {
        &self.instances[id.0].type_name
    }

    /// Read a property; unset properties read as `Null`.
    pub fn property(&self, id: InstanceId, name: &str) -> &FieldValue {
        self.instances[id.0]
            .properties
            .get(name)
            .unwrap_or(&FieldValue::Null)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_read_properties() {
        let mut graph = ObjectGraph::new();
        let id = graph.add_instance("User");
        graph.set_property(id, "name", FieldValue::text("ada"));
        graph.set_property(id, "age", FieldValue::Int(36));

        assert_eq!(graph.type_name(id), "User");
        assert_eq!(graph.property(id, "name"), &FieldValue::text("ada"));
        assert_eq!(graph.property(id, "age"), &FieldValue::Int(36));
        // Unset properties read as Null rather than panicking.
        assert_eq!(graph.property(id, "missing"), &FieldValue::Null);
    }

    #[test]
    fn test_cyclic_edges_are_plain_ids() {
        let mut graph = ObjectGraph::new();
        let a = graph.add_instance("A");
        let b = graph.add_instance("B");
        graph.set_property(a, "b", FieldValue::Entity(b));
        graph.set_property(b, "a", FieldValue::Entity(a));

        assert_eq!(graph.property(a, "b"), &FieldValue::Entity(b));
        assert_eq!(graph.property(b, "a"), &FieldValue::Entity(a));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_set_property_replaces() {
        let mut graph = ObjectGraph::new();
        let id = graph.add_instance("User");
        graph.set_property(id, "name", FieldValue::text("first"));
        graph.set_property(id, "name", FieldValue::text("second"));
        assert_eq!(graph.property(id, "name"), &FieldValue::text("second"));
    }
}
