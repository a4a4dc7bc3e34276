// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validator registry: constraint kind → validator implementations.

use std::fmt;

use indexmap::IndexMap;

use crate::traits::ConstraintValidator;
use crate::value::TypeUse;

/// What a validator implementation can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationTarget {
    /// The annotated element's own value.
    AnnotatedElement,
    /// The parameter array of an executable.
    Parameters,
}

/// One registered validator implementation for a constraint kind.
pub struct ValidatorInfo {
    /// Registry-unique implementation id, e.g. `"Size.Text"`.
    pub id: String,
    pub targets: Vec<ValidationTarget>,
    /// The declared validated type; must be raw or all-wildcard.
    pub validated_type: TypeUse,
    pub factory: fn() -> Box<dyn ConstraintValidator>,
}

impl ValidatorInfo {
    pub fn new(
        id: impl Into<String>,
        validated_type: TypeUse,
        factory: fn() -> Box<dyn ConstraintValidator>,
    ) -> Self {
        ValidatorInfo {
            id: id.into(),
            targets: vec![ValidationTarget::AnnotatedElement],
            validated_type,
            factory,
        }
    }

    /// Mark this validator as cross-parameter capable (replacing the
    /// default annotated-element target).
    pub fn cross_parameter(mut self) -> Self {
        self.targets = vec![ValidationTarget::Parameters];
        self
    }

    pub fn with_target(mut self, target: ValidationTarget) -> Self {
        if !self.targets.contains(&target) {
            self.targets.push(target);
        }
        self
    }

    pub fn supports(&self, target: ValidationTarget) -> bool {
        self.targets.contains(&target)
    }

    pub fn instantiate(&self) -> Box<dyn ConstraintValidator> {
        (self.factory)()
    }
}

impl fmt::Debug for ValidatorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorInfo")
            .field("id", &self.id)
            .field("targets", &self.targets)
            .field("validated_type", &self.validated_type)
            .finish()
    }
}

/// Maps constraint kinds to their validator implementations, in
/// registration order.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    by_kind: IndexMap<String, Vec<ValidatorInfo>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: impl Into<String>, info: ValidatorInfo) {
        self.by_kind.entry(kind.into()).or_default().push(info);
    }

    /// All validators registered for a kind; empty when none are.
    pub fn infos(&self, kind: &str) -> &[ValidatorInfo] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of the validators registered for a kind, in registration order.
    pub fn ids(&self, kind: &str) -> Vec<String> {
        self.infos(kind).iter().map(|info| info.id.clone()).collect()
    }

    /// Whether a kind has any validator supporting the given target.
    pub fn supports_target(&self, kind: &str, target: ValidationTarget) -> bool {
        self.infos(kind).iter().any(|info| info.supports(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ConstraintContext;
    use crate::traits::{CollaboratorError, ValueRef};
    use crate::value::ValueType;

    struct AlwaysValid;

    impl ConstraintValidator for AlwaysValid {
        fn is_valid(
            &self,
            _value: ValueRef<'_>,
            _ctx: &mut ConstraintContext<'_>,
        ) -> Result<bool, CollaboratorError> {
            Ok(true)
        }
    }

    fn always_valid() -> Box<dyn ConstraintValidator> {
        Box::new(AlwaysValid)
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = ValidatorRegistry::new();
        registry.register(
            "Size",
            ValidatorInfo::new("Size.Text", TypeUse::raw(ValueType::Text), always_valid),
        );
        registry.register(
            "Size",
            ValidatorInfo::new("Size.Sequence", TypeUse::raw(ValueType::Sequence), always_valid),
        );

        assert_eq!(registry.ids("Size"), vec!["Size.Text", "Size.Sequence"]);
        assert!(registry.infos("Min").is_empty());
    }

    #[test]
    fn test_target_support() {
        let mut registry = ValidatorRegistry::new();
        registry.register(
            "Consistent",
            ValidatorInfo::new(
                "Consistent.Params",
                TypeUse::raw(ValueType::ParameterArray),
                always_valid,
            )
            .cross_parameter(),
        );

        assert!(registry.supports_target("Consistent", ValidationTarget::Parameters));
        assert!(!registry.supports_target("Consistent", ValidationTarget::AnnotatedElement));
    }
}
