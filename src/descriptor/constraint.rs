// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Immutable constraint descriptors.
//!
//! A [`ConstraintDescriptor`] is the built form of one constraint
//! occurrence: attributes fully defaulted, groups closed over the default
//! group, composing constraints recursively built with their attribute
//! overrides applied. Descriptors never change after the build returns;
//! everything a job reads from one is shared read-only.

use crate::config::consts::DEFAULT_GROUP;
use crate::constraint::{
    AttributeMap, CompositionCache, ConstraintCatalog, ConstraintDeclaration, ConstraintTarget,
    SKIP_PAYLOAD, UNWRAP_PAYLOAD,
};
use crate::errors::DefinitionError;
use crate::registry::ValidatorRegistry;

/// The kind of element a constraint was declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Type,
    Field,
    Getter,
    Parameter,
    CrossParameter,
    Method,
    Constructor,
    ReturnValue,
    ContainerElement,
}

/// Whether a constraint was declared on the element itself or inherited
/// through the type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationScope {
    LocalElement,
    Hierarchy,
}

/// Everything a constraint-descriptor build needs to consult.
pub(crate) struct ConstraintBuildContext<'a> {
    pub catalog: &'a ConstraintCatalog,
    pub validators: &'a ValidatorRegistry,
    pub composition: &'a CompositionCache,
}

/// One built constraint occurrence, immutable after build.
#[derive(Debug, Clone)]
pub struct ConstraintDescriptor {
    pub kind: String,
    /// Fully defaulted attributes, in the kind's declaration order.
    pub attributes: AttributeMap,
    /// Effective groups; never empty.
    pub groups: Vec<String>,
    pub payloads: Vec<String>,
    /// Validator implementation ids, in registration order.
    pub validators: Vec<String>,
    /// Composing constraints with overrides applied, in declaration order.
    pub composing: Vec<ConstraintDescriptor>,
    pub report_as_single_violation: bool,
    pub validation_applies_to: ConstraintTarget,
    pub scope: DeclarationScope,
    pub declared_on: ElementKind,
    message_template: String,
}

impl ConstraintDescriptor {
    /// Build a descriptor from a declaration.
    pub(crate) fn build(
        ctx: &ConstraintBuildContext<'_>,
        declaration: &ConstraintDeclaration,
        declared_on: ElementKind,
        scope: DeclarationScope,
    ) -> Result<ConstraintDescriptor, DefinitionError> {
        let mut visiting = Vec::new();
        Self::build_inner(ctx, declaration, declared_on, scope, &mut visiting)
    }

    fn build_inner(
        ctx: &ConstraintBuildContext<'_>,
        declaration: &ConstraintDeclaration,
        declared_on: ElementKind,
        scope: DeclarationScope,
        visiting: &mut Vec<String>,
    ) -> Result<ConstraintDescriptor, DefinitionError> {
        let definition = ctx.catalog.definition(&declaration.kind).ok_or_else(|| {
            DefinitionError::UnknownConstraint {
                kind: declaration.kind.clone(),
            }
        })?;

        if visiting.iter().any(|kind| kind == &declaration.kind) {
            return Err(DefinitionError::CompositionCycle {
                kind: declaration.kind.clone(),
            });
        }

        let unwrap = declaration.payloads.iter().any(|p| p == UNWRAP_PAYLOAD);
        let skip = declaration.payloads.iter().any(|p| p == SKIP_PAYLOAD);
        if unwrap && skip {
            return Err(DefinitionError::ConflictingPayloads {
                kind: declaration.kind.clone(),
            });
        }

        // Reject attributes the kind does not declare before defaulting.
        for name in declaration.attributes.keys() {
            if !definition.attributes.contains_key(name) {
                return Err(DefinitionError::UnknownAttribute {
                    kind: declaration.kind.clone(),
                    attribute: name.clone(),
                });
            }
        }

        let mut attributes = AttributeMap::new();
        for (name, default) in &definition.attributes {
            match declaration.attributes.get(name) {
                Some(value) => {
                    attributes.insert(name.clone(), value.clone());
                }
                None => match default {
                    Some(value) => {
                        attributes.insert(name.clone(), value.clone());
                    }
                    None => {
                        return Err(DefinitionError::MissingAttribute {
                            kind: declaration.kind.clone(),
                            attribute: name.clone(),
                        })
                    }
                },
            }
        }

        // Groups closure: declaring no group means the default group.
        let groups = if declaration.groups.is_empty() {
            vec![DEFAULT_GROUP.to_string()]
        } else {
            declaration.groups.clone()
        };

        let message_template = declaration
            .message
            .clone()
            .unwrap_or_else(|| definition.message_template.clone());

        let plan = ctx
            .composition
            .plan(ctx.catalog, ctx.validators, &declaration.kind)?;
        let composed_declarations =
            plan.instantiate(&attributes, &groups, &declaration.payloads);

        visiting.push(declaration.kind.clone());
        let mut composing = Vec::with_capacity(composed_declarations.len());
        for composed in &composed_declarations {
            composing.push(Self::build_inner(
                ctx,
                composed,
                declared_on,
                scope,
                visiting,
            )?);
        }
        visiting.pop();

        Ok(ConstraintDescriptor {
            kind: declaration.kind.clone(),
            attributes,
            groups,
            payloads: declaration.payloads.clone(),
            validators: ctx.validators.ids(&declaration.kind),
            composing,
            report_as_single_violation: definition.report_as_single_violation,
            validation_applies_to: declaration.applies_to,
            scope,
            declared_on,
            message_template,
        })
    }

    /// The declared message template: the occurrence's `message` value,
    /// falling back to the kind's default template.
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// Whether this constraint belongs to `group` as declared (before any
    /// default redirection).
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Whether the `Unwrap` payload is present.
    pub fn unwraps(&self) -> bool {
        self.payloads.iter().any(|p| p == UNWRAP_PAYLOAD)
    }

    /// A constraint with no validators of its own but composing constraints
    /// evaluates through its composition alone.
    pub fn is_composed_only(&self) -> bool {
        self.validators.is_empty() && !self.composing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{AttributeValue, ConstraintDefinition, OverrideDeclaration};

    fn build_ctx<'a>(
        catalog: &'a ConstraintCatalog,
        validators: &'a ValidatorRegistry,
        composition: &'a CompositionCache,
    ) -> ConstraintBuildContext<'a> {
        ConstraintBuildContext {
            catalog,
            validators,
            composition,
        }
    }

    #[test]
    fn test_empty_groups_rewritten_to_default() {
        let mut catalog = ConstraintCatalog::new();
        catalog.register(ConstraintDefinition::new("NotNull"));
        let validators = ValidatorRegistry::new();
        let composition = CompositionCache::new(8);
        let ctx = build_ctx(&catalog, &validators, &composition);

        let descriptor = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("NotNull"),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap();

        assert_eq!(descriptor.groups, vec![DEFAULT_GROUP]);
        assert!(descriptor.in_group(DEFAULT_GROUP));
        assert!(!descriptor.in_group("Extended"));
    }

    #[test]
    fn test_attributes_are_defaulted_in_definition_order() {
        let mut catalog = ConstraintCatalog::new();
        catalog.register(
            ConstraintDefinition::new("Size")
                .attribute("min", AttributeValue::Int(0))
                .attribute("max", AttributeValue::Int(i64::MAX)),
        );
        let validators = ValidatorRegistry::new();
        let composition = CompositionCache::new(8);
        let ctx = build_ctx(&catalog, &validators, &composition);

        let descriptor = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("Size").with_attribute("max", AttributeValue::Int(10)),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap();

        let entries: Vec<(&str, &AttributeValue)> = descriptor
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("min", &AttributeValue::Int(0)),
                ("max", &AttributeValue::Int(10)),
            ]
        );
    }

    #[test]
    fn test_missing_required_attribute_rejected() {
        let mut catalog = ConstraintCatalog::new();
        catalog.register(ConstraintDefinition::new("Pattern").required_attribute("regexp"));
        let validators = ValidatorRegistry::new();
        let composition = CompositionCache::new(8);
        let ctx = build_ctx(&catalog, &validators, &composition);

        let err = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("Pattern"),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::MissingAttribute { .. }));
    }

    #[test]
    fn test_unwrap_and_skip_together_rejected() {
        let mut catalog = ConstraintCatalog::new();
        catalog.register(ConstraintDefinition::new("NotNull"));
        let validators = ValidatorRegistry::new();
        let composition = CompositionCache::new(8);
        let ctx = build_ctx(&catalog, &validators, &composition);

        let err = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("NotNull")
                .with_payload(UNWRAP_PAYLOAD)
                .with_payload(SKIP_PAYLOAD),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::ConflictingPayloads { .. }));
    }

    #[test]
    fn test_composing_descriptors_carry_overridden_attributes() {
        let mut catalog = ConstraintCatalog::new();
        catalog.register(ConstraintDefinition::new("NotNull"));
        catalog.register(ConstraintDefinition::new("Pattern").required_attribute("regexp"));
        catalog.register(
            ConstraintDefinition::new("Email")
                .attribute("regexp", AttributeValue::text(".*"))
                .composed_of(
                    ConstraintDeclaration::new("Pattern")
                        .with_attribute("regexp", AttributeValue::text(".*")),
                )
                .composed_of(ConstraintDeclaration::new("NotNull"))
                .with_override(OverrideDeclaration::new("regexp", "Pattern"))
                .report_as_single(),
        );
        let validators = ValidatorRegistry::new();
        let composition = CompositionCache::new(8);
        let ctx = build_ctx(&catalog, &validators, &composition);

        let descriptor = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("Email")
                .with_attribute("regexp", AttributeValue::text("^a+$"))
                .with_group("Signup"),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap();

        assert!(descriptor.report_as_single_violation);
        assert!(descriptor.is_composed_only());
        assert_eq!(descriptor.composing.len(), 2);

        let pattern = &descriptor.composing[0];
        assert_eq!(pattern.kind, "Pattern");
        assert_eq!(
            pattern.attributes.get("regexp"),
            Some(&AttributeValue::text("^a+$"))
        );
        // Composing constraints inherit the composed occurrence's groups.
        assert_eq!(pattern.groups, vec!["Signup"]);
        assert_eq!(descriptor.composing[1].kind, "NotNull");
    }

    #[test]
    fn test_self_composition_rejected() {
        let mut catalog = ConstraintCatalog::new();
        catalog.register(
            ConstraintDefinition::new("Loop")
                .composed_of(ConstraintDeclaration::new("Loop")),
        );
        let validators = ValidatorRegistry::new();
        let composition = CompositionCache::new(8);
        let ctx = build_ctx(&catalog, &validators, &composition);

        let err = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("Loop"),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::CompositionCycle { .. }));
    }

    #[test]
    fn test_declared_message_wins_over_kind_template() {
        let mut catalog = ConstraintCatalog::new();
        catalog.register(ConstraintDefinition::new("NotNull"));
        let validators = ValidatorRegistry::new();
        let composition = CompositionCache::new(8);
        let ctx = build_ctx(&catalog, &validators, &composition);

        let defaulted = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("NotNull"),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap();
        assert_eq!(defaulted.message_template(), "{NotNull.message}");

        let custom = ConstraintDescriptor::build(
            &ctx,
            &ConstraintDeclaration::new("NotNull").with_message("must be present"),
            ElementKind::Field,
            DeclarationScope::LocalElement,
        )
        .unwrap();
        assert_eq!(custom.message_template(), "must be present");
    }
}
