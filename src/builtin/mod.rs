// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod kinds;
mod templates;
mod validators;

pub use kinds::register_builtin_constraints;
pub use templates::DefaultInterpolator;
pub use validators::register_builtin_validators;
