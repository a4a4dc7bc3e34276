// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in constraint validators.
//!
//! Null handling follows the usual convention: every validator except the
//! null-presence family (`NotNull`, `NotBlank`, `NotEmpty`) treats the null
//! marker as valid, leaving presence checks to `NotNull`.

use regex::Regex;

use crate::constraint::{AttributeMap, AttributeValue};
use crate::engine::ConstraintContext;
use crate::registry::{ValidatorInfo, ValidatorRegistry};
use crate::traits::{CollaboratorError, ConstraintValidator, ValueRef};
use crate::value::{FieldValue, TypeUse, ValueType};

/// Register the built-in validators into a registry.
pub fn register_builtin_validators(registry: &mut ValidatorRegistry) {
    registry.register(
        "NotNull",
        ValidatorInfo::new("NotNull.Any", TypeUse::raw(ValueType::Any), || {
            Box::new(NotNullValidator)
        }),
    );
    registry.register(
        "AssertTrue",
        ValidatorInfo::new("AssertTrue.Bool", TypeUse::raw(ValueType::Bool), || {
            Box::new(AssertTrueValidator)
        }),
    );
    registry.register(
        "NotBlank",
        ValidatorInfo::new("NotBlank.Text", TypeUse::raw(ValueType::Text), || {
            Box::new(NotBlankValidator)
        }),
    );
    registry.register(
        "NotEmpty",
        ValidatorInfo::new("NotEmpty.Text", TypeUse::raw(ValueType::Text), || {
            Box::new(NotEmptyValidator)
        }),
    );
    registry.register(
        "NotEmpty",
        ValidatorInfo::new("NotEmpty.Sequence", TypeUse::raw(ValueType::Sequence), || {
            Box::new(NotEmptyValidator)
        }),
    );
    registry.register(
        "NotEmpty",
        ValidatorInfo::new("NotEmpty.Mapping", TypeUse::raw(ValueType::Mapping), || {
            Box::new(NotEmptyValidator)
        }),
    );
    registry.register(
        "Size",
        ValidatorInfo::new("Size.Text", TypeUse::raw(ValueType::Text), || {
            Box::new(SizeValidator::default())
        }),
    );
    registry.register(
        "Size",
        ValidatorInfo::new("Size.Sequence", TypeUse::raw(ValueType::Sequence), || {
            Box::new(SizeValidator::default())
        }),
    );
    registry.register(
        "Size",
        ValidatorInfo::new("Size.Mapping", TypeUse::raw(ValueType::Mapping), || {
            Box::new(SizeValidator::default())
        }),
    );
    registry.register(
        "Min",
        ValidatorInfo::new("Min.Number", TypeUse::raw(ValueType::Number), || {
            Box::new(MinValidator::default())
        }),
    );
    registry.register(
        "Max",
        ValidatorInfo::new("Max.Number", TypeUse::raw(ValueType::Number), || {
            Box::new(MaxValidator::default())
        }),
    );
    registry.register(
        "Pattern",
        ValidatorInfo::new("Pattern.Text", TypeUse::raw(ValueType::Text), || {
            Box::new(PatternValidator::default())
        }),
    );
}

fn int_attribute(attributes: &AttributeMap, name: &str) -> Result<i64, CollaboratorError> {
    match attributes.get(name) {
        Some(AttributeValue::Int(value)) => Ok(*value),
        other => Err(format!("attribute '{}' must be an integer, got {:?}", name, other).into()),
    }
}

fn text_attribute<'a>(
    attributes: &'a AttributeMap,
    name: &str,
) -> Result<&'a str, CollaboratorError> {
    match attributes.get(name) {
        Some(AttributeValue::Text(value)) => Ok(value),
        other => Err(format!("attribute '{}' must be text, got {:?}", name, other).into()),
    }
}

/// A numeric bound, kept in its declared representation.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Int(i64),
    Decimal(f64),
}

impl Bound {
    fn from_attribute(attributes: &AttributeMap, name: &str) -> Result<Bound, CollaboratorError> {
        match attributes.get(name) {
            Some(AttributeValue::Int(value)) => Ok(Bound::Int(*value)),
            Some(AttributeValue::Decimal(value)) => Ok(Bound::Decimal(*value)),
            other => Err(format!("attribute '{}' must be numeric, got {:?}", name, other).into()),
        }
    }

    fn as_decimal(&self) -> f64 {
        match self {
            Bound::Int(value) => *value as f64,
            Bound::Decimal(value) => *value,
        }
    }
}

struct NotNullValidator;

impl ConstraintValidator for NotNullValidator {
    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        Ok(match value.value() {
            Some(value) => !value.is_null(),
            None => true,
        })
    }
}

struct AssertTrueValidator;

impl ConstraintValidator for AssertTrueValidator {
    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        Ok(match value.value() {
            Some(FieldValue::Bool(flag)) => *flag,
            _ => true,
        })
    }
}

struct NotBlankValidator;

impl ConstraintValidator for NotBlankValidator {
    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        Ok(match value.value() {
            Some(FieldValue::Text(text)) => !text.trim().is_empty(),
            Some(FieldValue::Null) => false,
            _ => true,
        })
    }
}

struct NotEmptyValidator;

impl ConstraintValidator for NotEmptyValidator {
    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        Ok(match value.value() {
            Some(FieldValue::Text(text)) => !text.is_empty(),
            Some(FieldValue::Sequence(items)) => !items.is_empty(),
            Some(FieldValue::Mapping(entries)) => !entries.is_empty(),
            Some(FieldValue::Null) => false,
            _ => true,
        })
    }
}

#[derive(Default)]
struct SizeValidator {
    min: i64,
    max: i64,
}

impl ConstraintValidator for SizeValidator {
    fn initialize(&mut self, attributes: &AttributeMap) -> Result<(), CollaboratorError> {
        self.min = int_attribute(attributes, "min")?;
        self.max = int_attribute(attributes, "max")?;
        if self.min < 0 || self.max < self.min {
            return Err(format!("invalid size bounds [{}, {}]", self.min, self.max).into());
        }
        Ok(())
    }

    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        let length = match value.value() {
            Some(FieldValue::Text(text)) => text.chars().count() as i64,
            Some(FieldValue::Sequence(items)) => items.len() as i64,
            Some(FieldValue::Mapping(entries)) => entries.len() as i64,
            _ => return Ok(true),
        };
        Ok(length >= self.min && length <= self.max)
    }
}

#[derive(Default)]
struct MinValidator {
    bound: Option<Bound>,
}

impl ConstraintValidator for MinValidator {
    fn initialize(&mut self, attributes: &AttributeMap) -> Result<(), CollaboratorError> {
        self.bound = Some(Bound::from_attribute(attributes, "value")?);
        Ok(())
    }

    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        let bound = match self.bound {
            Some(bound) => bound,
            None => return Err("Min validator used before initialize".into()),
        };
        Ok(match (value.value(), bound) {
            (Some(FieldValue::Int(actual)), Bound::Int(expected)) => *actual >= expected,
            (Some(FieldValue::Int(actual)), Bound::Decimal(_)) => {
                (*actual as f64) >= bound.as_decimal()
            }
            (Some(FieldValue::Decimal(actual)), _) => *actual >= bound.as_decimal(),
            _ => true,
        })
    }
}

#[derive(Default)]
struct MaxValidator {
    bound: Option<Bound>,
}

impl ConstraintValidator for MaxValidator {
    fn initialize(&mut self, attributes: &AttributeMap) -> Result<(), CollaboratorError> {
        self.bound = Some(Bound::from_attribute(attributes, "value")?);
        Ok(())
    }

    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        let bound = match self.bound {
            Some(bound) => bound,
            None => return Err("Max validator used before initialize".into()),
        };
        Ok(match (value.value(), bound) {
            (Some(FieldValue::Int(actual)), Bound::Int(expected)) => *actual <= expected,
            (Some(FieldValue::Int(actual)), Bound::Decimal(_)) => {
                (*actual as f64) <= bound.as_decimal()
            }
            (Some(FieldValue::Decimal(actual)), _) => *actual <= bound.as_decimal(),
            _ => true,
        })
    }
}

#[derive(Default)]
struct PatternValidator {
    regex: Option<Regex>,
}

impl ConstraintValidator for PatternValidator {
    fn initialize(&mut self, attributes: &AttributeMap) -> Result<(), CollaboratorError> {
        let pattern = text_attribute(attributes, "regexp")?;
        // A malformed pattern surfaces as a constraint-definition error.
        self.regex = Some(Regex::new(pattern)?);
        Ok(())
    }

    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        let regex = match &self.regex {
            Some(regex) => regex,
            None => return Err("Pattern validator used before initialize".into()),
        };
        Ok(match value.value() {
            Some(FieldValue::Text(text)) => regex.is_match(text),
            _ => true,
        })
    }
}
