// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The uniform raw view every metadata source produces.
//!
//! A source answers "what did you declare for this type?" with a
//! [`RawEntity`]: class-level declarations, fields, getters and
//! executables, plus the source's mapping behavior for the type. Raw
//! metadata is union-merged across sources and hierarchy levels before the
//! descriptor build turns it immutable.

use indexmap::IndexMap;

use crate::constraint::ConstraintDeclaration;
use crate::descriptor::ContainerElementKey;

/// How a custom source's metadata combines with declared metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingBehavior {
    /// Keep declared metadata and add this source's on top.
    Merge,
    /// Replace declared metadata with this source's.
    Override,
    /// No opinion; treated as merge.
    Abstain,
}

impl Default for MappingBehavior {
    fn default() -> Self {
        MappingBehavior::Abstain
    }
}

/// Raw constrained-element data: declarations plus cascade/conversion
/// marks and nested container elements.
#[derive(Debug, Clone, Default)]
pub struct RawElement {
    pub declarations: Vec<ConstraintDeclaration>,
    pub cascade: bool,
    pub conversions: Vec<(String, String)>,
    pub containers: IndexMap<ContainerElementKey, RawElement>,
}

impl RawElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constrained(mut self, declaration: ConstraintDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn cascaded(mut self) -> Self {
        self.cascade = true;
        self
    }

    pub fn converting(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.conversions.push((from.into(), to.into()));
        self
    }

    pub fn with_container(mut self, key: ContainerElementKey, element: RawElement) -> Self {
        self.containers.insert(key, element);
        self
    }

    /// Union-merge another element's data into this one.
    pub fn merge(&mut self, other: RawElement) {
        self.declarations.extend(other.declarations);
        self.cascade |= other.cascade;
        self.conversions.extend(other.conversions);
        for (key, element) in other.containers {
            match self.containers.get_mut(&key) {
                Some(existing) => existing.merge(element),
                None => {
                    self.containers.insert(key, element);
                }
            }
        }
    }
}

/// Raw executable data. Declarations on the executable itself are sorted
/// into return-value or cross-parameter constraints later, based on each
/// constraint's validation target.
#[derive(Debug, Clone, Default)]
pub struct RawExecutable {
    pub name: String,
    /// Constraints declared on the executable itself.
    pub declarations: Vec<ConstraintDeclaration>,
    /// Per-parameter elements, by position.
    pub parameters: Vec<RawElement>,
    /// Explicit return-value element (cascade, containers).
    pub return_element: Option<RawElement>,
}

impl RawExecutable {
    pub fn new(name: impl Into<String>) -> Self {
        RawExecutable {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn constrained(mut self, declaration: ConstraintDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn with_parameter(mut self, index: usize, element: RawElement) -> Self {
        while self.parameters.len() <= index {
            self.parameters.push(RawElement::new());
        }
        self.parameters[index].merge(element);
        self
    }

    pub fn with_return(mut self, element: RawElement) -> Self {
        self.return_element = Some(element);
        self
    }

    pub fn merge(&mut self, other: RawExecutable) {
        self.declarations.extend(other.declarations);
        for (index, parameter) in other.parameters.into_iter().enumerate() {
            while self.parameters.len() <= index {
                self.parameters.push(RawElement::new());
            }
            self.parameters[index].merge(parameter);
        }
        match (&mut self.return_element, other.return_element) {
            (Some(existing), Some(incoming)) => existing.merge(incoming),
            (slot @ None, Some(incoming)) => *slot = Some(incoming),
            _ => {}
        }
    }
}

/// Everything one source declared for one type.
#[derive(Debug, Clone)]
pub struct RawEntity {
    pub type_name: String,
    pub behavior: MappingBehavior,
    /// Class-level declarations.
    pub constraints: Vec<ConstraintDeclaration>,
    pub group_sequence: Option<Vec<String>>,
    pub fields: IndexMap<String, RawElement>,
    pub getters: IndexMap<String, RawElement>,
    pub methods: IndexMap<String, RawExecutable>,
    pub constructors: IndexMap<String, RawExecutable>,
}

impl RawEntity {
    pub fn new(type_name: impl Into<String>) -> Self {
        RawEntity {
            type_name: type_name.into(),
            behavior: MappingBehavior::Abstain,
            constraints: Vec::new(),
            group_sequence: None,
            fields: IndexMap::new(),
            getters: IndexMap::new(),
            methods: IndexMap::new(),
            constructors: IndexMap::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: MappingBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn constrained(mut self, declaration: ConstraintDeclaration) -> Self {
        self.constraints.push(declaration);
        self
    }

    pub fn with_group_sequence(mut self, groups: Vec<String>) -> Self {
        self.group_sequence = Some(groups);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, element: RawElement) -> Self {
        self.fields.insert(name.into(), element);
        self
    }

    pub fn with_getter(mut self, name: impl Into<String>, element: RawElement) -> Self {
        self.getters.insert(name.into(), element);
        self
    }

    pub fn with_method(mut self, signature: impl Into<String>, executable: RawExecutable) -> Self {
        self.methods.insert(signature.into(), executable);
        self
    }

    pub fn with_constructor(
        mut self,
        signature: impl Into<String>,
        executable: RawExecutable,
    ) -> Self {
        self.constructors.insert(signature.into(), executable);
        self
    }

    /// Union-merge another raw entity for the same type into this one.
    /// The behavior field is left untouched; callers decide consensus.
    pub fn merge(&mut self, other: RawEntity) {
        self.constraints.extend(other.constraints);
        if other.group_sequence.is_some() {
            self.group_sequence = other.group_sequence;
        }
        for (name, element) in other.fields {
            match self.fields.get_mut(&name) {
                Some(existing) => existing.merge(element),
                None => {
                    self.fields.insert(name, element);
                }
            }
        }
        for (name, element) in other.getters {
            match self.getters.get_mut(&name) {
                Some(existing) => existing.merge(element),
                None => {
                    self.getters.insert(name, element);
                }
            }
        }
        for (signature, executable) in other.methods {
            match self.methods.get_mut(&signature) {
                Some(existing) => existing.merge(executable),
                None => {
                    self.methods.insert(signature, executable);
                }
            }
        }
        for (signature, executable) in other.constructors {
            match self.constructors.get_mut(&signature) {
                Some(existing) => existing.merge(executable),
                None => {
                    self.constructors.insert(signature, executable);
                }
            }
        }
    }
}

/// A source of raw constraint metadata, queried lazily per type.
pub trait MetadataSource: Send + Sync {
    /// The raw metadata this source declares for a type, if any.
    fn entity(&self, type_name: &str) -> Option<RawEntity>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    #[test]
    fn test_element_merge_unions_everything() {
        let mut base = RawElement::new()
            .constrained(ConstraintDeclaration::new("NotNull"))
            .converting("Default", "Basic");
        let other = RawElement::new()
            .constrained(ConstraintDeclaration::new("NotBlank"))
            .cascaded();

        base.merge(other);
        assert_eq!(base.declarations.len(), 2);
        assert_eq!(base.declarations[0].kind, "NotNull");
        assert_eq!(base.declarations[1].kind, "NotBlank");
        assert!(base.cascade);
        assert_eq!(base.conversions.len(), 1);
    }

    #[test]
    fn test_container_merge_recurses_per_key() {
        let key = ContainerElementKey::new(1, ValueType::Mapping);
        let mut base = RawElement::new().with_container(
            key.clone(),
            RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
        );
        let other = RawElement::new().with_container(
            key.clone(),
            RawElement::new().constrained(ConstraintDeclaration::new("Size")),
        );

        base.merge(other);
        assert_eq!(base.containers.len(), 1);
        assert_eq!(base.containers[&key].declarations.len(), 2);
    }

    #[test]
    fn test_executable_parameter_slots_grow_on_demand() {
        let executable = RawExecutable::new("m").with_parameter(
            2,
            RawElement::new().constrained(ConstraintDeclaration::new("NotNull")),
        );
        assert_eq!(executable.parameters.len(), 3);
        assert!(executable.parameters[0].declarations.is_empty());
        assert_eq!(executable.parameters[2].declarations.len(), 1);
    }

    #[test]
    fn test_entity_merge_keeps_later_group_sequence() {
        let mut base = RawEntity::new("User").with_group_sequence(vec!["A".into()]);
        base.merge(RawEntity::new("User").with_group_sequence(vec!["B".into()]));
        assert_eq!(base.group_sequence, Some(vec!["B".to_string()]));

        let mut keep = RawEntity::new("User").with_group_sequence(vec!["A".into()]);
        keep.merge(RawEntity::new("User"));
        assert_eq!(keep.group_sequence, Some(vec!["A".to_string()]));
    }
}
