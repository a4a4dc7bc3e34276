// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Hierarchy flattening.
//!
//! A type's effective metadata is its own level flattened with the levels
//! of its supertypes. Inherited declarations keep working but are tagged
//! with hierarchy scope; a level whose behavior is `override` ignores
//! everything inherited. Constructors never flow down the hierarchy.

use indexmap::IndexMap;

use crate::constraint::ConstraintDeclaration;
use crate::descriptor::{ContainerElementKey, DeclarationScope};
use crate::metadata::raw::{MappingBehavior, RawElement, RawEntity, RawExecutable};
use crate::value::TypeRegistry;

/// A constrained element with scope-tagged declarations.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlatElement {
    pub declarations: Vec<(ConstraintDeclaration, DeclarationScope)>,
    pub cascade: bool,
    pub conversions: Vec<(String, String)>,
    pub containers: IndexMap<ContainerElementKey, FlatElement>,
}

impl FlatElement {
    fn from_raw(raw: RawElement, scope: DeclarationScope) -> Self {
        FlatElement {
            declarations: raw
                .declarations
                .into_iter()
                .map(|declaration| (declaration, scope))
                .collect(),
            cascade: raw.cascade,
            conversions: raw.conversions,
            containers: raw
                .containers
                .into_iter()
                .map(|(key, element)| (key, FlatElement::from_raw(element, scope)))
                .collect(),
        }
    }

    fn merge(&mut self, other: FlatElement) {
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

#[derive(Debug, Clone, Default)]
pub(crate) struct FlatExecutable {
    pub name: String,
    pub declarations: Vec<(ConstraintDeclaration, DeclarationScope)>,
    pub parameters: Vec<FlatElement>,
    pub return_element: Option<FlatElement>,
}

impl FlatExecutable {
    fn from_raw(raw: RawExecutable, scope: DeclarationScope) -> Self {
        FlatExecutable {
            name: raw.name,
            declarations: raw
                .declarations
                .into_iter()
                .map(|declaration| (declaration, scope))
                .collect(),
            parameters: raw
                .parameters
                .into_iter()
                .map(|element| FlatElement::from_raw(element, scope))
                .collect(),
            return_element: raw
                .return_element
                .map(|element| FlatElement::from_raw(element, scope)),
        }
    }

    fn merge(&mut self, other: FlatExecutable) {
        self.declarations.extend(other.declarations);
        for (index, parameter) in other.parameters.into_iter().enumerate() {
            while self.parameters.len() <= index {
                self.parameters.push(FlatElement::default());
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

/// A type's effective metadata after hierarchy flattening: fields and
/// getters merged into one property namespace, every declaration tagged
/// with its scope.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlatEntity {
    pub type_name: String,
    pub constraints: Vec<(ConstraintDeclaration, DeclarationScope)>,
    pub group_sequence: Option<Vec<String>>,
    pub properties: IndexMap<String, FlatElement>,
    pub methods: IndexMap<String, FlatExecutable>,
    pub constructors: IndexMap<String, FlatExecutable>,
}

impl FlatEntity {
    fn absorb(&mut self, raw: RawEntity, scope: DeclarationScope) {
        self.constraints.extend(
            raw.constraints
                .into_iter()
                .map(|declaration| (declaration, scope)),
        );
        // The redefined default sequence never flows down the hierarchy.
        if scope == DeclarationScope::LocalElement && raw.group_sequence.is_some() {
            self.group_sequence = raw.group_sequence;
        }

        for (name, element) in raw.fields.into_iter().chain(raw.getters) {
            let flat = FlatElement::from_raw(element, scope);
            match self.properties.get_mut(&name) {
                Some(existing) => existing.merge(flat),
                None => {
                    self.properties.insert(name, flat);
                }
            }
        }

        for (signature, executable) in raw.methods {
            let flat = FlatExecutable::from_raw(executable, scope);
            match self.methods.get_mut(&signature) {
                Some(existing) => existing.merge(flat),
                None => {
                    self.methods.insert(signature, flat);
                }
            }
        }

        // Constructors are not inherited.
        if scope == DeclarationScope::LocalElement {
            for (signature, executable) in raw.constructors {
                self.constructors
                    .insert(signature, FlatExecutable::from_raw(executable, scope));
            }
        }
    }
}

/// The hierarchy chain of a type: itself first, then its supertypes in
/// breadth-first declaration order, deduplicated.
pub(crate) fn linearize(types: &TypeRegistry, type_name: &str) -> Vec<String> {
    let mut chain: Vec<String> = vec![type_name.to_string()];
    let mut cursor = 0;
    while cursor < chain.len() {
        let current = chain[cursor].clone();
        if let Some(shape) = types.shape(&current) {
            for supertype in &shape.supertypes {
                if !chain.iter().any(|name| name == supertype) {
                    chain.push(supertype.clone());
                }
            }
        }
        cursor += 1;
    }
    chain
}

/// Flatten a type's own level with its inherited levels.
///
/// `levels` holds the per-level merged raw entities, own level first. A
/// non-`merge`-minded own level (behavior `override`) drops everything
/// inherited.
pub(crate) fn flatten(type_name: &str, levels: Vec<Option<RawEntity>>) -> FlatEntity {
    let mut flat = FlatEntity {
        type_name: type_name.to_string(),
        ..FlatEntity::default()
    };

    let mut levels = levels.into_iter();
    let own_behavior = match levels.next() {
        Some(Some(own)) => {
            let behavior = own.behavior;
            flat.absorb(own, DeclarationScope::LocalElement);
            behavior
        }
        _ => MappingBehavior::Abstain,
    };

    if own_behavior == MappingBehavior::Override {
        return flat;
    }

    for level in levels.flatten() {
        flat.absorb(level, DeclarationScope::Hierarchy);
    }
    flat
}
