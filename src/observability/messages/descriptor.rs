// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for descriptor builds and composition-cache events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// A per-type descriptor finished building and was published to the cache.
///
/// # Log Level
/// `debug!` - routine lifecycle event
pub struct DescriptorBuilt<'a> {
    pub type_name: &'a str,
    pub property_count: usize,
    pub executable_count: usize,
}

impl Display for DescriptorBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built descriptor for '{}' with {} constrained properties and {} executables",
            self.type_name, self.property_count, self.executable_count
        )
    }
}

impl StructuredLog for DescriptorBuilt<'_> {
    fn log(&self) {
        tracing::debug!(
            type_name = self.type_name,
            property_count = self.property_count,
            executable_count = self.executable_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            type_name = self.type_name,
            property_count = self.property_count,
            executable_count = self.executable_count,
        )
    }
}

/// A composition plan was evicted from the bounded cache.
///
/// Eviction is correctness-neutral; the plan is recomputed on next use.
///
/// # Log Level
/// `debug!` - routine cache event
pub struct CompositionPlanEvicted<'a> {
    pub kind: &'a str,
}

impl Display for CompositionPlanEvicted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Evicted composition plan for constraint '{}'", self.kind)
    }
}

impl StructuredLog for CompositionPlanEvicted<'_> {
    fn log(&self) {
        tracing::debug!(kind = self.kind, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            kind = self.kind,
        )
    }
}
