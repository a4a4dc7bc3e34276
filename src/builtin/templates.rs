// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Default message bundle and interpolator.

use std::collections::HashMap;

use crate::traits::{InterpolationContext, MessageInterpolator};

/// Default message texts, by bundle key.
const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("NotNull.message", "must not be null"),
    ("AssertTrue.message", "must be true"),
    ("NotBlank.message", "must not be blank"),
    ("NotEmpty.message", "must not be empty"),
    ("Size.message", "size must be between {min} and {max}"),
    ("Min.message", "must be greater than or equal to {value}"),
    ("Max.message", "must be less than or equal to {value}"),
    ("Pattern.message", "must match \"{regexp}\""),
    ("Email.message", "must be a well-formed email address"),
];

/// Resolves `{Kind.message}` bundle keys, then substitutes `{attribute}`
/// parameters from the constraint's attributes.
pub struct DefaultInterpolator {
    bundle: HashMap<String, String>,
}

impl DefaultInterpolator {
    pub fn new() -> Self {
        let bundle = DEFAULT_TEMPLATES
            .iter()
            .map(|(key, text)| (key.to_string(), text.to_string()))
            .collect();
        DefaultInterpolator { bundle }
    }

    /// Add or replace a bundle entry, e.g. for custom constraint kinds.
    pub fn with_template(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.bundle.insert(key.into(), text.into());
        self
    }
}

impl Default for DefaultInterpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageInterpolator for DefaultInterpolator {
    fn interpolate(&self, template: &str, ctx: &InterpolationContext<'_>) -> String {
        // One level of bundle indirection: "{Key}" resolves to the bundle
        // text when present, otherwise the template is taken literally.
        let mut message = if template.starts_with('{') && template.ends_with('}') {
            let key = &template[1..template.len() - 1];
            self.bundle
                .get(key)
                .cloned()
                .unwrap_or_else(|| template.to_string())
        } else {
            template.to_string()
        };

        for (name, value) in ctx.attributes {
            let placeholder = format!("{{{}}}", name);
            if message.contains(&placeholder) {
                message = message.replace(&placeholder, &value.to_string());
            }
        }
        message
    }
}
