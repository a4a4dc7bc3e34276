// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Source merging for one hierarchy level.
//!
//! Two merge shapes exist per level: the *composite* merge reduces the
//! sibling custom sources (mapping documents, programmatic overlays) into
//! one raw entity under a consensus behavior, and the *parallel* merge
//! combines that result with the primary declared metadata, honouring the
//! behavior: `override` replaces the declared metadata, everything else
//! unions with it.

use crate::errors::DefinitionError;
use crate::metadata::raw::{MappingBehavior, RawEntity};

/// Consensus rule for sibling sources: every non-abstaining source must
/// agree on the behavior; no opinion at all means abstain.
pub(crate) fn consensus_behavior(
    type_name: &str,
    behaviors: &[MappingBehavior],
) -> Result<MappingBehavior, DefinitionError> {
    let mut consensus = MappingBehavior::Abstain;
    for behavior in behaviors {
        match (consensus, *behavior) {
            (_, MappingBehavior::Abstain) => {}
            (MappingBehavior::Abstain, opinion) => consensus = opinion,
            (current, opinion) if current == opinion => {}
            _ => {
                return Err(DefinitionError::InconsistentBehavior {
                    type_name: type_name.to_string(),
                })
            }
        }
    }
    Ok(consensus)
}

/// Reduce sibling custom entities for one type into a single raw entity.
pub(crate) fn composite_merge(
    type_name: &str,
    entities: Vec<RawEntity>,
) -> Result<Option<RawEntity>, DefinitionError> {
    if entities.is_empty() {
        return Ok(None);
    }

    let behaviors: Vec<MappingBehavior> = entities.iter().map(|e| e.behavior).collect();
    let consensus = consensus_behavior(type_name, &behaviors)?;

    let mut iter = entities.into_iter();
    let mut merged = match iter.next() {
        Some(first) => first,
        None => return Ok(None),
    };
    for entity in iter {
        merged.merge(entity);
    }
    merged.behavior = consensus;
    Ok(Some(merged))
}

/// Combine the primary declared metadata with the merged custom metadata.
pub(crate) fn parallel_merge(
    primary: Option<RawEntity>,
    custom: Option<RawEntity>,
) -> Option<RawEntity> {
    match (primary, custom) {
        (None, None) => None,
        (Some(primary), None) => Some(primary),
        (None, Some(custom)) => Some(custom),
        (Some(primary), Some(custom)) => {
            if custom.behavior == MappingBehavior::Override {
                // Declared metadata is replaced wholesale.
                return Some(custom);
            }
            let behavior = custom.behavior;
            let mut merged = primary;
            merged.merge(custom);
            merged.behavior = behavior;
            Some(merged)
        }
    }
}
