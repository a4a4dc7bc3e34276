// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Centralized message types for all diagnostic and operational logging in
//! the engine. Message types are structs implementing `Display` plus the
//! [`messages::StructuredLog`] trait, so call sites never carry inline
//! format strings and structured fields stay consistent:
//!
//! * `messages::descriptor` - descriptor builds and composition-cache events
//! * `messages::engine` - validation-job lifecycle events

pub mod messages;
