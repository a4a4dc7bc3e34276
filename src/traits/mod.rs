// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod extractor;
pub mod interpolator;
pub mod providers;
pub mod traversable;
pub mod validator;

pub use extractor::{ExtractedValueReceiver, ValueExtractor};
pub use interpolator::{InterpolationContext, LiteralInterpolator, MessageInterpolator};
pub use providers::{ClockProvider, IndexedParameterNames, ParameterNameProvider, SystemClock};
pub use traversable::{TraversableResolver, TraverseAll};
pub use validator::{CollaboratorError, ConstraintValidator, ValueRef};
