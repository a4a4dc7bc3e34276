// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::SystemTime;

/// Reference clock exposed to validators through the constraint context.
///
/// Time-based validators must read the clock from here rather than the
/// system directly, so callers can pin "now" for testing or batch runs.
pub trait ClockProvider: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Default clock: the system clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockProvider for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Resolves parameter names for executable path nodes.
///
/// Consulted only for parameters whose metadata declares no name.
pub trait ParameterNameProvider: Send + Sync {
    fn parameter_names(&self, signature: &str, arity: usize) -> Vec<String>;
}

/// Default provider: positional `arg0..argN` names.
#[derive(Debug, Default)]
pub struct IndexedParameterNames;

impl ParameterNameProvider for IndexedParameterNames {
    fn parameter_names(&self, _signature: &str, arity: usize) -> Vec<String> {
        (0..arity).map(|i| format!("arg{}", i)).collect()
    }
}
