// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod extractors;
mod resolution;
mod validators;

pub use extractors::{ContainerKey, ExtractorBinding, ExtractorRegistry};
pub use resolution::resolve_validator;
pub use validators::{ValidationTarget, ValidatorInfo, ValidatorRegistry};
