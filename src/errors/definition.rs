// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Constraint-definition errors.
//!
//! A definition error means the declared constraint metadata itself is
//! broken: a descriptor graph cannot be built from it and no job may run
//! against it. These errors are raised during descriptor builds, during
//! composition-plan resolution, and when a validator rejects its own
//! configuration at `initialize` time. They are never caught internally.

use thiserror::Error;

use crate::traits::CollaboratorError;

/// Errors in the declared constraint metadata.
///
/// Raised while building descriptors or composition plans. Fatal to the
/// descriptor build or the job that triggered it.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// A declaration names a constraint kind the catalog does not know.
    #[error("Unknown constraint kind: '{kind}'")]
    UnknownConstraint { kind: String },

    /// A declaration or request names a group the group catalog does not know.
    #[error("Unknown group: '{group}'")]
    UnknownGroup { group: String },

    /// Group-sequence expansion revisited a sequence that is already being expanded.
    #[error("Group sequence '{group}' expands to itself")]
    GroupSequenceCycle { group: String },

    /// A declaration sets an attribute the constraint kind does not declare.
    #[error("Constraint '{kind}' has no attribute '{attribute}'")]
    UnknownAttribute { kind: String, attribute: String },

    /// A required attribute has neither a declared value nor a default.
    #[error("Constraint '{kind}' is missing required attribute '{attribute}'")]
    MissingAttribute { kind: String, attribute: String },

    /// A constraint carries both the `Unwrap` and `Skip` payload markers.
    #[error("Constraint '{kind}' carries both the Unwrap and Skip payloads")]
    ConflictingPayloads { kind: String },

    /// A composing constraint shares no validation target with the composed kind.
    #[error("Composing constraint '{composing}' shares no validation target with '{composed}'")]
    IncompatibleComposingTarget { composed: String, composing: String },

    /// A constraint kind composes itself, directly or through intermediates.
    #[error("Constraint '{kind}' composes itself")]
    CompositionCycle { kind: String },

    /// Two attribute overrides map to the same (target kind, index, attribute) slot.
    #[error(
        "Constraint '{kind}' declares conflicting overrides for attribute '{attribute}' \
         of composing '{target_kind}' at index {index}"
    )]
    OverrideConflict {
        kind: String,
        target_kind: String,
        index: usize,
        attribute: String,
    },

    /// An override names a composing kind that does not appear among the composing constraints.
    #[error("Constraint '{kind}' overrides attribute of '{target_kind}' but declares no such composing constraint")]
    OverrideTargetMissing { kind: String, target_kind: String },

    /// An override left the constraint index unspecified but the composing kind appears more than once.
    #[error(
        "Constraint '{kind}' overrides '{target_kind}' without an index, \
         but {count} composing constraints of that kind are declared"
    )]
    OverrideTargetAmbiguous {
        kind: String,
        target_kind: String,
        count: usize,
    },

    /// An override points at an attribute the composing kind does not declare.
    #[error("Override targets attribute '{attribute}' which '{target_kind}' does not declare")]
    OverrideAttributeUnknown {
        target_kind: String,
        attribute: String,
    },

    /// A validator declares a parameterised validated type with non-wildcard arguments.
    #[error("Validator '{validator}' declares a validated type with non-wildcard type arguments")]
    ValidatorTypeArguments { validator: String },

    /// A validator rejected its own attribute configuration.
    #[error("Validator '{validator}' failed to initialize for constraint '{kind}': {source}")]
    InitializeFailed {
        kind: String,
        validator: String,
        #[source]
        source: CollaboratorError,
    },

    /// A constraint with both generic and cross-parameter validators was declared on an
    /// executable without an explicit validation target.
    #[error("Constraint '{kind}' on an executable needs an explicit validation target")]
    ImplicitTargetAmbiguous { kind: String },

    /// A group conversion was declared on an element that does not cascade.
    #[error("Group conversion on '{element}' of '{type_name}', which is not marked for cascading")]
    ConversionOnNonCascadable { type_name: String, element: String },

    /// Two group conversions on one element share the same source group.
    #[error("Duplicate group conversion from '{from}' on '{element}'")]
    DuplicateConversion { element: String, from: String },

    /// A container-element descriptor has no extractor bound for its key.
    #[error("No value extractor registered for {container} type argument {index}")]
    MissingExtractor { container: String, index: usize },

    /// Metadata references an entity type the type registry does not know.
    #[error("Unknown entity type: '{type_name}'")]
    UnknownType { type_name: String },

    /// Metadata references a property the entity shape does not declare.
    #[error("Entity '{type_name}' declares no property '{property}'")]
    UnknownProperty { type_name: String, property: String },

    /// Metadata references an executable signature the entity shape does not declare.
    #[error("Entity '{type_name}' declares no executable '{signature}'")]
    UnknownExecutable { type_name: String, signature: String },

    /// Sibling metadata sources disagree on the mapping behavior for one type.
    #[error("Metadata sources disagree on mapping behavior for '{type_name}'")]
    InconsistentBehavior { type_name: String },
}
