// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine-wide constants and configuration defaults.

/// The group every constraint belongs to when it declares none.
pub const DEFAULT_GROUP: &str = "Default";

/// Default capacity of the composition-plan cache
/// (`constraints.cache.size`).
pub const DEFAULT_COMPOSITION_CACHE_SIZE: usize = 512;
