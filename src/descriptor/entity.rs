// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-type metadata: entity, element and executable descriptors.
//!
//! An [`EntityDescriptor`] is the merged, immutable view of everything the
//! metadata sources declared for one type. Constrained elements share one
//! shape — [`ElementDescriptor`] — whether they are properties, parameters,
//! return values or container elements; the engine's sprout frames walk
//! them uniformly.

use indexmap::IndexMap;

use crate::descriptor::constraint::ConstraintDescriptor;
use crate::value::{TypeUse, ValueType};

/// Key of a container-element descriptor: which type argument of which
/// declared container type it constrains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerElementKey {
    pub type_arg_index: usize,
    pub container: ValueType,
}

impl ContainerElementKey {
    pub fn new(type_arg_index: usize, container: ValueType) -> Self {
        ContainerElementKey { type_arg_index, container }
    }
}

/// The constrained-element core shared by properties, parameters, return
/// values and container elements.
#[derive(Debug, Clone)]
pub struct ElementDescriptor {
    pub declared: TypeUse,
    /// Own constraints, in merged registration order.
    pub constraints: Vec<ConstraintDescriptor>,
    /// Whether the referenced value is validated recursively.
    pub cascade: bool,
    /// Group conversions applied when cascading, `from -> to`.
    pub conversions: IndexMap<String, String>,
    /// Container-element descriptors, keyed by `(type-arg index, container)`.
    pub containers: IndexMap<ContainerElementKey, ContainerElementDescriptor>,
}

impl ElementDescriptor {
    pub fn unconstrained(declared: TypeUse) -> Self {
        ElementDescriptor {
            declared,
            constraints: Vec::new(),
            cascade: false,
            conversions: IndexMap::new(),
            containers: IndexMap::new(),
        }
    }

    /// Whether anything at or below this element can produce a violation.
    pub fn is_constrained(&self) -> bool {
        !self.constraints.is_empty()
            || self.cascade
            || self.containers.values().any(|c| c.element.is_constrained())
    }

    /// The group a cascaded child sees for `group`, after conversions.
    pub fn convert_group<'a>(&'a self, group: &'a str) -> &'a str {
        self.conversions.get(group).map(String::as_str).unwrap_or(group)
    }
}

/// Constraints and cascading declared for one type argument of a container.
#[derive(Debug, Clone)]
pub struct ContainerElementDescriptor {
    pub key: ContainerElementKey,
    pub element: ElementDescriptor,
}

/// A constrained property (merged field/getter view).
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub element: ElementDescriptor,
}

/// A constrained executable parameter.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub name: String,
    pub index: usize,
    pub element: ElementDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableKind {
    Method,
    Constructor,
}

/// A constrained method or constructor.
#[derive(Debug, Clone)]
pub struct ExecutableDescriptor {
    pub signature: String,
    pub name: String,
    pub kind: ExecutableKind,
    /// Constraints against the whole parameter array.
    pub cross_parameter: Vec<ConstraintDescriptor>,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_value: Option<ElementDescriptor>,
}

/// The merged, immutable metadata of one entity type.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    pub type_name: String,
    /// Class-level constraints.
    pub constraints: Vec<ConstraintDescriptor>,
    pub properties: IndexMap<String, PropertyDescriptor>,
    pub methods: IndexMap<String, ExecutableDescriptor>,
    pub constructors: IndexMap<String, ExecutableDescriptor>,
    /// Redefined default-group sequence, when the type declares one.
    pub group_sequence: Option<Vec<String>>,
}

impl EntityDescriptor {
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn method(&self, signature: &str) -> Option<&ExecutableDescriptor> {
        self.methods.get(signature)
    }

    pub fn constructor(&self, signature: &str) -> Option<&ExecutableDescriptor> {
        self.constructors.get(signature)
    }

    /// Whether the type carries any constraint metadata at all.
    pub fn is_constrained(&self) -> bool {
        !self.constraints.is_empty()
            || self.properties.values().any(|p| p.element.is_constrained())
            || !self.methods.is_empty()
            || !self.constructors.is_empty()
            || self.group_sequence.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(declared: ValueType) -> ElementDescriptor {
        ElementDescriptor::unconstrained(TypeUse::raw(declared))
    }

    #[test]
    fn test_unconstrained_element_reports_unconstrained() {
        let el = element(ValueType::Text);
        assert!(!el.is_constrained());
    }

    #[test]
    fn test_cascade_alone_is_constrained() {
        let mut el = element(ValueType::Entity("Order".into()));
        el.cascade = true;
        assert!(el.is_constrained());
    }

    #[test]
    fn test_nested_container_constraints_count() {
        let mut inner = element(ValueType::Text);
        inner.cascade = true;

        let mut outer = element(ValueType::Mapping);
        let key = ContainerElementKey::new(1, ValueType::Mapping);
        outer.containers.insert(
            key.clone(),
            ContainerElementDescriptor { key, element: inner },
        );
        assert!(outer.is_constrained());
    }

    #[test]
    fn test_group_conversion_lookup() {
        let mut el = element(ValueType::Entity("Order".into()));
        el.conversions.insert("Default".into(), "OrderChecks".into());

        assert_eq!(el.convert_group("Default"), "OrderChecks");
        assert_eq!(el.convert_group("Extended"), "Extended");
    }
}
