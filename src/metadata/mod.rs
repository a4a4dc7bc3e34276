// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod declared;
pub(crate) mod hierarchy;
mod mapping;
mod merge;
mod pipeline;
mod raw;

pub use declared::DeclaredSource;
pub use mapping::{load_mapping, MappingSource};
pub use pipeline::MetadataPipeline;
pub use raw::{MappingBehavior, MetadataSource, RawElement, RawEntity, RawExecutable};
