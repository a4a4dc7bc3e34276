// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod definition;
mod evaluation;
mod resolution;

pub use config::ConfigError;
pub use definition::DefinitionError;
pub use evaluation::EvaluationError;
pub use resolution::UnexpectedTypeError;

use thiserror::Error;

/// Job-boundary sum of everything that can abort a validation request.
///
/// Definition and unexpected-type errors are never caught internally;
/// evaluation errors wrap collaborator failures with path context at the
/// call site that observed them.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    UnexpectedType(#[from] UnexpectedTypeError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
