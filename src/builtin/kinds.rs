// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in constraint kind definitions.

use crate::constraint::{
    AttributeValue, ConstraintCatalog, ConstraintDeclaration, ConstraintDefinition,
    OverrideDeclaration,
};

/// Default regular expression of the `Email` constraint.
pub(crate) const EMAIL_REGEXP: &str = "^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+$";

/// Register the built-in constraint kinds into a catalog.
pub fn register_builtin_constraints(catalog: &mut ConstraintCatalog) {
    catalog.register(ConstraintDefinition::new("NotNull"));
    catalog.register(ConstraintDefinition::new("AssertTrue"));
    catalog.register(ConstraintDefinition::new("NotBlank"));
    catalog.register(ConstraintDefinition::new("NotEmpty"));
    catalog.register(
        ConstraintDefinition::new("Size")
            .attribute("min", AttributeValue::Int(0))
            .attribute("max", AttributeValue::Int(i64::MAX)),
    );
    catalog.register(ConstraintDefinition::new("Min").required_attribute("value"));
    catalog.register(ConstraintDefinition::new("Max").required_attribute("value"));
    catalog.register(ConstraintDefinition::new("Pattern").required_attribute("regexp"));

    // Email is composed-only: a failing component reports one Email
    // violation, and the regexp attribute flows down onto Pattern.
    catalog.register(
        ConstraintDefinition::new("Email")
            .attribute("regexp", AttributeValue::text(EMAIL_REGEXP))
            .composed_of(
                ConstraintDeclaration::new("Pattern")
                    .with_attribute("regexp", AttributeValue::text(EMAIL_REGEXP)),
            )
            .composed_of(ConstraintDeclaration::new("NotNull"))
            .with_override(OverrideDeclaration::new("regexp", "Pattern"))
            .report_as_single(),
    );
}
