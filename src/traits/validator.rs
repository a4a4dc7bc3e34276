// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::constraint::AttributeMap;
use crate::engine::ConstraintContext;
use crate::value::FieldValue;

/// Error type collaborators raise; wrapped with path context at the call site.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// The value handed to a validator.
#[derive(Clone, Copy)]
pub enum ValueRef<'a> {
    /// A single annotated element value.
    Value(&'a FieldValue),
    /// The full parameter array of an executable, for cross-parameter validators.
    Parameters(&'a [FieldValue]),
}

impl<'a> ValueRef<'a> {
    /// The single value, when this is not a parameter array.
    pub fn value(&self) -> Option<&'a FieldValue> {
        match self {
            ValueRef::Value(value) => Some(value),
            ValueRef::Parameters(_) => None,
        }
    }

    pub fn parameters(&self) -> Option<&'a [FieldValue]> {
        match self {
            ValueRef::Parameters(params) => Some(params),
            ValueRef::Value(_) => None,
        }
    }
}

/// A constraint validator implementation.
///
/// One instance is created per evaluated constraint occurrence;
/// `initialize` receives the occurrence's fully defaulted attributes before
/// any `is_valid` call. An `initialize` failure is a constraint-definition
/// error; an `is_valid` failure is a wrapped evaluation failure.
pub trait ConstraintValidator: Send {
    fn initialize(&mut self, _attributes: &AttributeMap) -> Result<(), CollaboratorError> {
        Ok(())
    }

    /// Whether the value satisfies the constraint. Custom violations go
    /// through the context; returning `false` without disabling the default
    /// queues the constraint's own template.
    fn is_valid(
        &self,
        value: ValueRef<'_>,
        ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError>;
}
