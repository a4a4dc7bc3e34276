// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for validation-job lifecycle events.

use std::fmt::{Display, Formatter};

use tracing::Span;

use crate::observability::messages::StructuredLog;

/// A validation job started walking its root.
///
/// # Log Level
/// `debug!` - routine lifecycle event
pub struct JobStarted<'a> {
    pub root_type: &'a str,
    pub simple_group_count: usize,
    pub sequence_count: usize,
}

impl Display for JobStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting validation of '{}' with {} groups and {} sequences",
            self.root_type, self.simple_group_count, self.sequence_count
        )
    }
}

impl StructuredLog for JobStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            root_type = self.root_type,
            simple_group_count = self.simple_group_count,
            sequence_count = self.sequence_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            root_type = self.root_type,
            simple_group_count = self.simple_group_count,
            sequence_count = self.sequence_count,
        )
    }
}

/// A validation job finished and realised its result set.
///
/// # Log Level
/// `debug!` - routine lifecycle event
pub struct JobCompleted<'a> {
    pub root_type: &'a str,
    pub violation_count: usize,
}

impl Display for JobCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Validation of '{}' produced {} violations",
            self.root_type, self.violation_count
        )
    }
}

impl StructuredLog for JobCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            root_type = self.root_type,
            violation_count = self.violation_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            root_type = self.root_type,
            violation_count = self.violation_count,
        )
    }
}

/// A group sequence stopped early because a group produced violations.
///
/// # Log Level
/// `debug!` - expected short-circuit behavior
pub struct SequenceShortCircuited<'a> {
    pub group: &'a str,
    pub position: usize,
    pub sequence_length: usize,
}

impl Display for SequenceShortCircuited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Group sequence short-circuited at '{}' (position {} of {})",
            self.group, self.position, self.sequence_length
        )
    }
}

impl StructuredLog for SequenceShortCircuited<'_> {
    fn log(&self) {
        tracing::debug!(
            group = self.group,
            position = self.position,
            sequence_length = self.sequence_length,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            group = self.group,
            position = self.position,
            sequence_length = self.sequence_length,
        )
    }
}
