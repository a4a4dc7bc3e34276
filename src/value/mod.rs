// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod graph;
mod types;

pub use graph::{FieldValue, InstanceId, ObjectGraph};
pub use types::{
    EntityShape, ExecutableShape, ParameterShape, TypeArg, TypeRegistry, TypeUse, ValueType,
};
