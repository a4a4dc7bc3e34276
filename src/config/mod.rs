// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod consts;
mod loader;

pub use loader::{
    load_and_validate_config, load_config, CacheConfig, ConstraintsConfig, EngineConfig,
};
