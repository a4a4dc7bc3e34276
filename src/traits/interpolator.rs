// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::constraint::AttributeMap;
use crate::value::FieldValue;

/// What an interpolator may see of the violation being rendered.
pub struct InterpolationContext<'a> {
    /// The violated constraint's kind name.
    pub kind: &'a str,
    /// The occurrence's fully defaulted attributes.
    pub attributes: &'a AttributeMap,
    /// The value that failed, when one exists at the leaf.
    pub invalid_value: Option<&'a FieldValue>,
}

/// Renders a message template into the final violation message.
///
/// Interpolation is applied by the violation collector after a job
/// finishes evaluating a constraint — validators only ever queue
/// templates.
pub trait MessageInterpolator: Send + Sync {
    fn interpolate(&self, template: &str, ctx: &InterpolationContext<'_>) -> String;
}

/// Pass-through interpolator: the template is the message.
#[derive(Debug, Default)]
pub struct LiteralInterpolator;

impl MessageInterpolator for LiteralInterpolator {
    fn interpolate(&self, template: &str, _ctx: &InterpolationContext<'_>) -> String {
        template.to_string()
    }
}
