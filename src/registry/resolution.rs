// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validator resolution.
//!
//! Given a declared constraint, the static type of its annotated element
//! and a validation target, pick the single most specific validator
//! implementation — or fail loudly. The annotated-element walk ascends the
//! declared type's supertype lattice breadth-first, admitting every
//! validated type it meets while keeping only the maximally specific ones:
//! a candidate is skipped when an admitted type is assignable to it, and
//! admitting a candidate expels any previously admitted type it is
//! assignable to. Exactly one admitted type with exactly one validator
//! must remain.
//!
//! Primitive (machine-scalar) declared types box to their nullable forms
//! before the walk, so a validator declared for `Integer` also covers
//! elements declared `int`.

use std::collections::VecDeque;

use crate::errors::{DefinitionError, EngineError, UnexpectedTypeError};
use crate::registry::validators::{ValidationTarget, ValidatorInfo, ValidatorRegistry};
use crate::value::{TypeRegistry, TypeUse, ValueType};

/// Resolve the validator for `(kind, declared element type, target)`.
pub fn resolve_validator<'r>(
    registry: &'r ValidatorRegistry,
    types: &TypeRegistry,
    kind: &str,
    declared: &TypeUse,
    target: ValidationTarget,
) -> Result<&'r ValidatorInfo, EngineError> {
    match target {
        ValidationTarget::Parameters => resolve_cross_parameter(registry, kind),
        ValidationTarget::AnnotatedElement => {
            resolve_annotated_element(registry, types, kind, declared)
        }
    }
}

fn resolve_cross_parameter<'r>(
    registry: &'r ValidatorRegistry,
    kind: &str,
) -> Result<&'r ValidatorInfo, EngineError> {
    let candidates: Vec<&ValidatorInfo> = registry
        .infos(kind)
        .iter()
        .filter(|info| info.supports(ValidationTarget::Parameters))
        .collect();

    if candidates.len() != 1 {
        return Err(UnexpectedTypeError::CrossParameterCount {
            kind: kind.to_string(),
            count: candidates.len(),
        }
        .into());
    }

    let info = candidates[0];
    check_validated_type_shape(info)?;

    // The sole cross-parameter validator must accept the parameter array.
    let base = &info.validated_type.base;
    if base != &ValueType::ParameterArray && base != &ValueType::Any {
        return Err(UnexpectedTypeError::CrossParameterShape {
            kind: kind.to_string(),
            validator: info.id.clone(),
        }
        .into());
    }

    Ok(info)
}

fn resolve_annotated_element<'r>(
    registry: &'r ValidatorRegistry,
    types: &TypeRegistry,
    kind: &str,
    declared: &TypeUse,
) -> Result<&'r ValidatorInfo, EngineError> {
    let candidates: Vec<&ValidatorInfo> = registry
        .infos(kind)
        .iter()
        .filter(|info| info.supports(ValidationTarget::AnnotatedElement))
        .collect();
    for info in &candidates {
        check_validated_type_shape(*info)?;
    }

    let element_type = declared.base.boxed();

    // Ascend the supertype lattice breadth-first, keeping the maximally
    // specific validated types met along the way.
    let mut admitted: Vec<ValueType> = Vec::new();
    let mut visited: Vec<ValueType> = vec![element_type.clone()];
    let mut frontier: VecDeque<ValueType> = VecDeque::new();
    frontier.push_back(element_type.clone());

    while let Some(current) = frontier.pop_front() {
        let declared_here = candidates
            .iter()
            .any(|info| info.validated_type.base == current);
        if declared_here {
            let shadowed = admitted
                .iter()
                .any(|kept| types.is_assignable(kept, &current));
            if !shadowed {
                // A more specific admission expels anything it subsumes.
                admitted.retain(|kept| !types.is_assignable(&current, kept));
                admitted.push(current.clone());
            }
        }

        for supertype in types.direct_supertypes(&current) {
            if !visited.contains(&supertype) {
                visited.push(supertype.clone());
                frontier.push_back(supertype);
            }
        }
    }

    if admitted.is_empty() {
        return Err(UnexpectedTypeError::NoValidator {
            kind: kind.to_string(),
            value_type: element_type,
        }
        .into());
    }
    if admitted.len() > 1 {
        let names = candidates
            .iter()
            .filter(|info| admitted.contains(&info.validated_type.base))
            .map(|info| info.id.clone())
            .collect();
        return Err(UnexpectedTypeError::AmbiguousValidators {
            kind: kind.to_string(),
            value_type: element_type,
            candidates: names,
        }
        .into());
    }

    let winners: Vec<&ValidatorInfo> = candidates
        .iter()
        .copied()
        .filter(|info| info.validated_type.base == admitted[0])
        .collect();
    if winners.len() > 1 {
        return Err(UnexpectedTypeError::AmbiguousValidators {
            kind: kind.to_string(),
            value_type: element_type,
            candidates: winners.iter().map(|info| info.id.clone()).collect(),
        }
        .into());
    }

    Ok(winners[0])
}

/// A validator's declared validated type must be raw or all-wildcard.
fn check_validated_type_shape(info: &ValidatorInfo) -> Result<(), DefinitionError> {
    if info.validated_type.is_raw_or_wildcarded() {
        Ok(())
    } else {
        Err(DefinitionError::ValidatorTypeArguments {
            validator: info.id.clone(),
        })
    }
}
