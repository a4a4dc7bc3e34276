// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Group computer.
//!
//! Groups are open-ended kind-tags; only *sequences* need registering.
//! Computing a plan from a requested group tuple expands every sequence
//! kind into its ordered component list (recursively, with cycle
//! detection) and splits the request into plain groups — evaluated first,
//! deduplicated in request order — and sequences, each evaluated
//! left-to-right with short-circuit on violation.

use indexmap::IndexMap;

use crate::config::consts::DEFAULT_GROUP;
use crate::errors::DefinitionError;

/// Registered group sequences, by sequence kind name.
#[derive(Debug, Default)]
pub struct GroupCatalog {
    sequences: IndexMap<String, Vec<String>>,
}

impl GroupCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_sequence(&mut self, name: impl Into<String>, groups: Vec<String>) {
        self.sequences.insert(name.into(), groups);
    }

    pub fn is_sequence(&self, name: &str) -> bool {
        self.sequences.contains_key(name)
    }

    pub fn sequence(&self, name: &str) -> Option<&[String]> {
        self.sequences.get(name).map(Vec::as_slice)
    }
}

/// The computed evaluation plan for one validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    /// Plain groups, in request order, deduplicated.
    pub simple: Vec<String>,
    /// Expanded sequences, each evaluated with short-circuit.
    pub sequences: Vec<Vec<String>>,
}

/// Compute the plan for a requested group tuple.
///
/// An empty request means the default group.
pub fn compute_plan(
    catalog: &GroupCatalog,
    requested: &[&str],
) -> Result<GroupPlan, DefinitionError> {
    let mut simple: Vec<String> = Vec::new();
    let mut sequences: Vec<Vec<String>> = Vec::new();

    if requested.is_empty() {
        simple.push(DEFAULT_GROUP.to_string());
        return Ok(GroupPlan { simple, sequences });
    }

    for group in requested {
        if catalog.is_sequence(group) {
            let mut expanded = Vec::new();
            let mut visiting = Vec::new();
            expand_sequence(catalog, group, &mut visiting, &mut expanded)?;
            sequences.push(expanded);
        } else if !simple.iter().any(|g| g == group) {
            simple.push((*group).to_string());
        }
    }

    Ok(GroupPlan { simple, sequences })
}

fn expand_sequence(
    catalog: &GroupCatalog,
    name: &str,
    visiting: &mut Vec<String>,
    out: &mut Vec<String>,
) -> Result<(), DefinitionError> {
    if visiting.iter().any(|g| g == name) {
        return Err(DefinitionError::GroupSequenceCycle {
            group: name.to_string(),
        });
    }
    visiting.push(name.to_string());

    let members = catalog
        .sequence(name)
        .ok_or_else(|| DefinitionError::UnknownGroup {
            group: name.to_string(),
        })?;
    for member in members {
        if catalog.is_sequence(member) {
            expand_sequence(catalog, member, visiting, out)?;
        } else if !out.iter().any(|g| g == member) {
            out.push(member.clone());
        }
    }

    visiting.pop();
    Ok(())
}
