// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Evaluation-time failures.
//!
//! A collaborator (traversable resolver, value extractor, validator runtime)
//! failed while a job was walking the object graph. The failure is wrapped
//! with the path that was being evaluated and aborts the job.

use thiserror::Error;

use crate::path::Path;
use crate::traits::CollaboratorError;
use crate::value::ValueType;

/// A collaborator failed during graph traversal.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// The traversable resolver raised while deciding reachability or cascadability.
    #[error("Traversable resolver failed at '{path}': {source}")]
    TraversableResolver {
        path: Path,
        #[source]
        source: CollaboratorError,
    },

    /// A value extractor raised while yielding container elements.
    #[error("Value extractor for {container} failed at '{path}': {source}")]
    ValueExtractor {
        path: Path,
        container: ValueType,
        #[source]
        source: CollaboratorError,
    },

    /// A validator raised at `is_valid` time.
    #[error("Validator for constraint '{kind}' failed at '{path}': {source}")]
    ValidatorRuntime {
        kind: String,
        path: Path,
        #[source]
        source: CollaboratorError,
    },

    /// A validator disabled the default violation but queued no custom one.
    #[error("Constraint '{kind}' at '{path}' disabled the default violation without adding one")]
    MissingCustomViolation { kind: String, path: Path },
}
