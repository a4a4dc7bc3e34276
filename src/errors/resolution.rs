// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validator-resolution errors.
//!
//! Raised when the registry cannot produce exactly one validator for a
//! declared constraint and the static type of its annotated element.

use thiserror::Error;

use crate::value::ValueType;

/// No single validator fits the (constraint, validated type, target) triple.
///
/// Fatal to the job that requested the resolution.
#[derive(Error, Debug)]
pub enum UnexpectedTypeError {
    /// No registered validator accepts the element's declared type.
    #[error("No validator for constraint '{kind}' validates values of type {value_type}")]
    NoValidator { kind: String, value_type: ValueType },

    /// More than one maximally specific validator accepts the element's declared type.
    #[error(
        "Ambiguous validators for constraint '{kind}' on type {value_type}: {}",
        .candidates.join(", ")
    )]
    AmbiguousValidators {
        kind: String,
        value_type: ValueType,
        candidates: Vec<String>,
    },

    /// Cross-parameter validation needs exactly one parameter-capable validator.
    #[error("Constraint '{kind}' declares {count} cross-parameter validators, expected exactly one")]
    CrossParameterCount { kind: String, count: usize },

    /// The sole cross-parameter validator does not accept a parameter array.
    #[error("Cross-parameter validator '{validator}' for '{kind}' does not accept a parameter array")]
    CrossParameterShape { kind: String, validator: String },
}
