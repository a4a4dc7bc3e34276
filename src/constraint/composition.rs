// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Composing-constraint resolution.
//!
//! A constraint kind may be defined in terms of other constraints, with
//! attribute overrides copying values from the composed occurrence onto its
//! composing occurrences. Resolving those overrides is pure but not free,
//! so the per-kind result — a [`CompositionPlan`] — is cached in a bounded
//! LRU. Eviction only costs recomputation.
//!
//! Resolution validates the definition as it goes: overrides must point at
//! exactly one composing constraint and at attributes both sides declare,
//! two overrides may not write the same slot, and every composing kind must
//! share at least one validation target with the composed kind.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use crate::constraint::catalog::ConstraintCatalog;
use crate::constraint::declaration::{AttributeMap, ConstraintDeclaration};
use crate::errors::DefinitionError;
use crate::observability::messages::descriptor::CompositionPlanEvicted;
use crate::observability::messages::StructuredLog;
use crate::registry::{ValidationTarget, ValidatorRegistry};

/// One composing constraint of a plan, with its resolved override slots.
#[derive(Debug, Clone)]
pub struct ComposedMember {
    /// The composing declaration as written on the composed kind.
    pub declaration: ConstraintDeclaration,
    /// `(target attribute, source attribute)` pairs applied at instantiation.
    pub overrides: Vec<(String, String)>,
}

/// The validated composition of one constraint kind.
#[derive(Debug, Clone)]
pub struct CompositionPlan {
    pub kind: String,
    pub members: Vec<ComposedMember>,
}

impl CompositionPlan {
    /// Build fresh composing declarations for one source occurrence.
    ///
    /// Each member is rebuilt with overridden attribute values copied from
    /// the source attributes; groups and payloads are inherited from the
    /// composed occurrence.
    pub fn instantiate(
        &self,
        source_attributes: &AttributeMap,
        groups: &[String],
        payloads: &[String],
    ) -> Vec<ConstraintDeclaration> {
        self.members
            .iter()
            .map(|member| {
                let mut declaration = member.declaration.clone();
                for (to, from) in &member.overrides {
                    if let Some(value) = source_attributes.get(from) {
                        declaration.attributes.insert(to.clone(), value.clone());
                    }
                }
                declaration.groups = groups.to_vec();
                declaration.payloads = payloads.to_vec();
                declaration
            })
            .collect()
    }
}

/// Supported validation targets of a kind: the union over its registered
/// validators, falling back to the union over its composing kinds for
/// composed-only constraints.
fn supported_targets(
    catalog: &ConstraintCatalog,
    registry: &ValidatorRegistry,
    kind: &str,
    visited: &mut BTreeSet<String>,
) -> BTreeSet<ValidationTarget> {
    let mut targets: BTreeSet<ValidationTarget> = registry
        .infos(kind)
        .iter()
        .flat_map(|info| info.targets.iter().copied())
        .collect();

    if targets.is_empty() && visited.insert(kind.to_string()) {
        if let Some(definition) = catalog.definition(kind) {
            for composing in &definition.composing {
                targets.extend(supported_targets(catalog, registry, &composing.kind, visited));
            }
        }
    }

    targets
}

/// Resolve the composition plan of one constraint kind.
pub fn resolve_composition(
    catalog: &ConstraintCatalog,
    registry: &ValidatorRegistry,
    kind: &str,
) -> Result<CompositionPlan, DefinitionError> {
    let definition = catalog
        .definition(kind)
        .ok_or_else(|| DefinitionError::UnknownConstraint { kind: kind.to_string() })?;

    let own_targets = supported_targets(catalog, registry, kind, &mut BTreeSet::new());

    let mut members: Vec<ComposedMember> = Vec::with_capacity(definition.composing.len());
    for composing in &definition.composing {
        if !catalog.contains(&composing.kind) {
            return Err(DefinitionError::UnknownConstraint {
                kind: composing.kind.clone(),
            });
        }

        // Every composing kind must be usable for at least one target the
        // composed kind supports; empty sets on either side are vacuous.
        let composing_targets =
            supported_targets(catalog, registry, &composing.kind, &mut BTreeSet::new());
        if !own_targets.is_empty()
            && !composing_targets.is_empty()
            && own_targets.is_disjoint(&composing_targets)
        {
            return Err(DefinitionError::IncompatibleComposingTarget {
                composed: kind.to_string(),
                composing: composing.kind.clone(),
            });
        }

        members.push(ComposedMember {
            declaration: composing.clone(),
            overrides: Vec::new(),
        });
    }

    // Resolve override declarations onto member slots.
    let mut taken: BTreeSet<(usize, String)> = BTreeSet::new();
    for declared_override in &definition.overrides {
        if !definition.attributes.contains_key(&declared_override.from) {
            return Err(DefinitionError::UnknownAttribute {
                kind: kind.to_string(),
                attribute: declared_override.from.clone(),
            });
        }

        let of_kind: Vec<usize> = members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.declaration.kind == declared_override.target_kind)
            .map(|(i, _)| i)
            .collect();
        if of_kind.is_empty() {
            return Err(DefinitionError::OverrideTargetMissing {
                kind: kind.to_string(),
                target_kind: declared_override.target_kind.clone(),
            });
        }

        let member_index = match declared_override.constraint_index {
            None => {
                if of_kind.len() != 1 {
                    return Err(DefinitionError::OverrideTargetAmbiguous {
                        kind: kind.to_string(),
                        target_kind: declared_override.target_kind.clone(),
                        count: of_kind.len(),
                    });
                }
                of_kind[0]
            }
            Some(index) => match of_kind.get(index) {
                Some(member_index) => *member_index,
                None => {
                    return Err(DefinitionError::OverrideTargetMissing {
                        kind: kind.to_string(),
                        target_kind: declared_override.target_kind.clone(),
                    })
                }
            },
        };

        let to = declared_override.target_attribute().to_string();
        let target_definition = catalog
            .definition(&declared_override.target_kind)
            .ok_or_else(|| DefinitionError::UnknownConstraint {
                kind: declared_override.target_kind.clone(),
            })?;
        if !target_definition.attributes.contains_key(&to) {
            return Err(DefinitionError::OverrideAttributeUnknown {
                target_kind: declared_override.target_kind.clone(),
                attribute: to,
            });
        }

        if !taken.insert((member_index, to.clone())) {
            return Err(DefinitionError::OverrideConflict {
                kind: kind.to_string(),
                target_kind: declared_override.target_kind.clone(),
                index: member_index,
                attribute: to,
            });
        }

        members[member_index]
            .overrides
            .push((to, declared_override.from.clone()));
    }

    Ok(CompositionPlan {
        kind: kind.to_string(),
        members,
    })
}

/// Bounded, process-wide cache of composition plans.
pub struct CompositionCache {
    plans: Mutex<LruCache<String, Arc<CompositionPlan>>>,
}

impl CompositionCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = match NonZeroUsize::new(capacity) {
            Some(capacity) => capacity,
            None => NonZeroUsize::MIN,
        };
        CompositionCache {
            plans: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fetch the plan for a kind, resolving and caching it on first use.
    pub fn plan(
        &self,
        catalog: &ConstraintCatalog,
        registry: &ValidatorRegistry,
        kind: &str,
    ) -> Result<Arc<CompositionPlan>, DefinitionError> {
        let mut plans = self.plans.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(plan) = plans.get(kind) {
            return Ok(Arc::clone(plan));
        }
        drop(plans);

        // Resolve outside the lock; plans are pure so racing threads may
        // redo the work and publish identical results.
        let plan = Arc::new(resolve_composition(catalog, registry, kind)?);

        let mut plans = self.plans.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((evicted, _)) = plans.push(kind.to_string(), Arc::clone(&plan)) {
            if evicted != kind {
                CompositionPlanEvicted { kind: &evicted }.log();
            }
        }
        Ok(plan)
    }
}
