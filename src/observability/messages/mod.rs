// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging and tracing.
//!
//! Each message type implements:
//!
//! * `Display` - human-readable output
//! * [`StructuredLog`] - machine-readable fields + span creation

use tracing::Span;

pub mod descriptor;
pub mod engine;

/// Dual-purpose logging: human-readable `Display` plus structured fields.
pub trait StructuredLog: std::fmt::Display {
    /// Emit this message at its intrinsic level with structured fields.
    fn log(&self);

    /// Create a tracing span carrying this message's fields.
    fn span(&self, name: &str) -> Span;
}
