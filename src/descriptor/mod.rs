// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod cache;
mod constraint;
mod entity;

pub use cache::DescriptorCache;
pub use constraint::{ConstraintDescriptor, DeclarationScope, ElementKind};
pub(crate) use constraint::ConstraintBuildContext;
pub use entity::{
    ContainerElementDescriptor, ContainerElementKey, ElementDescriptor, EntityDescriptor,
    ExecutableDescriptor, ExecutableKind, ParameterDescriptor, PropertyDescriptor,
};
