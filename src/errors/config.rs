// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while loading engine options or mapping documents.

use thiserror::Error;

/// A configuration or mapping document could not be loaded.
///
/// Any of these is a startup failure: an engine is never built over a
/// half-read configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid YAML or does not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// `constraints.cache.size` must be a positive integer.
    #[error("constraints.cache.size must be a positive integer, got {value}")]
    InvalidCacheSize { value: usize },

    /// A mapping document entry could not be converted to a constraint declaration.
    #[error("Invalid mapping for '{type_name}': {detail}")]
    InvalidMapping { type_name: String, detail: String },
}
