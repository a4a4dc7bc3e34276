// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Constraint-kind catalog.
//!
//! A [`ConstraintDefinition`] is the declarative identity of a validation
//! rule: its attribute schema, default message template, composing
//! constraints and their attribute-override mappings. The catalog maps
//! kind names to definitions and is populated once at engine build time
//! (built-ins first, custom kinds after), then shared read-only.

use indexmap::IndexMap;

use crate::constraint::declaration::{AttributeValue, ConstraintDeclaration};

/// An attribute-override mapping declared on a composed constraint kind.
///
/// When the composed kind is instantiated, the value of its `from`
/// attribute is copied onto the `to` attribute (defaulting to `from`) of
/// the composing constraint selected by `(target_kind, constraint_index)`.
/// A `constraint_index` of `None` means "the sole composing constraint of
/// that kind" and is a definition error when the kind appears more or less
/// than exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideDeclaration {
    pub from: String,
    pub target_kind: String,
    pub constraint_index: Option<usize>,
    pub to: Option<String>,
}

impl OverrideDeclaration {
    pub fn new(from: impl Into<String>, target_kind: impl Into<String>) -> Self {
        OverrideDeclaration {
            from: from.into(),
            target_kind: target_kind.into(),
            constraint_index: None,
            to: None,
        }
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.constraint_index = Some(index);
        self
    }

    pub fn to_attribute(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// The attribute this override writes on the composing constraint.
    pub fn target_attribute(&self) -> &str {
        self.to.as_deref().unwrap_or(&self.from)
    }
}

/// The declarative definition of a constraint kind.
#[derive(Debug, Clone)]
pub struct ConstraintDefinition {
    pub name: String,
    /// Declared attributes; `None` means required (no default).
    pub attributes: IndexMap<String, Option<AttributeValue>>,
    /// Default message template; conventionally `{Kind.message}`.
    pub message_template: String,
    /// Constraints this kind is defined in terms of, in declaration order.
    pub composing: Vec<ConstraintDeclaration>,
    pub overrides: Vec<OverrideDeclaration>,
    /// When set, a failing composing constraint reports as one violation
    /// of this kind instead of surfacing its own.
    pub report_as_single_violation: bool,
}

impl ConstraintDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let message_template = format!("{{{}.message}}", name);
        ConstraintDefinition {
            name,
            attributes: IndexMap::new(),
            message_template,
            composing: Vec::new(),
            overrides: Vec::new(),
            report_as_single_violation: false,
        }
    }

    /// Declare an attribute with a default value.
    pub fn attribute(mut self, name: impl Into<String>, default: AttributeValue) -> Self {
        self.attributes.insert(name.into(), Some(default));
        self
    }

    /// Declare an attribute without a default; declarations must set it.
    pub fn required_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), None);
        self
    }

    pub fn message_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    pub fn composed_of(mut self, declaration: ConstraintDeclaration) -> Self {
        self.composing.push(declaration);
        self
    }

    pub fn with_override(mut self, declaration: OverrideDeclaration) -> Self {
        self.overrides.push(declaration);
        self
    }

    pub fn report_as_single(mut self) -> Self {
        self.report_as_single_violation = true;
        self
    }
}

/// Process-wide registry of constraint-kind definitions.
#[derive(Debug, Default)]
pub struct ConstraintCatalog {
    definitions: IndexMap<String, ConstraintDefinition>,
}

impl ConstraintCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one of the same name.
    pub fn register(&mut self, definition: ConstraintDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn definition(&self, name: &str) -> Option<&ConstraintDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
