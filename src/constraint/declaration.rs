// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Constraint declarations: one occurrence of a constraint kind on an element.
//!
//! A declaration is the raw, source-level form — what a metadata source
//! hands the builder pipeline. Attribute defaulting, group closure and
//! composition happen later, when a declaration is turned into an immutable
//! descriptor.

use std::fmt;

use indexmap::IndexMap;

/// Payload marker that unwraps container values before applying constraints.
pub const UNWRAP_PAYLOAD: &str = "Unwrap";

/// Payload marker that suppresses container unwrapping.
pub const SKIP_PAYLOAD: &str = "Skip";

/// A constraint attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Text(String),
    TextList(Vec<String>),
}

impl AttributeValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Decimal(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => write!(f, "{}", v),
            AttributeValue::TextList(v) => write!(f, "{}", v.join(", ")),
        }
    }
}

/// Attribute map of a constraint occurrence, in declaration order.
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// Which element a constraint declared on an executable applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintTarget {
    /// The executable's parameter array as a whole.
    Parameters,
    /// The annotated element itself (return value, parameter, property).
    AnnotatedElement,
    /// Not specified; resolved from the registered validators.
    Implicit,
}

/// One declared occurrence of a constraint kind.
///
/// Built either programmatically or from a mapping document. `groups` left
/// empty means the default group; the rewrite happens at descriptor-build
/// time so the declaration keeps what the source actually said.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDeclaration {
    pub kind: String,
    pub attributes: AttributeMap,
    pub groups: Vec<String>,
    pub payloads: Vec<String>,
    /// Overrides the kind's default message template when set.
    pub message: Option<String>,
    pub applies_to: ConstraintTarget,
}

impl ConstraintDeclaration {
    pub fn new(kind: impl Into<String>) -> Self {
        ConstraintDeclaration {
            kind: kind.into(),
            attributes: AttributeMap::new(),
            groups: Vec::new(),
            payloads: Vec::new(),
            message: None,
            applies_to: ConstraintTarget::Implicit,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payloads.push(payload.into());
        self
    }

    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    pub fn applies_to(mut self, target: ConstraintTarget) -> Self {
        self.applies_to = target;
        self
    }
}
