// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::CollaboratorError;
use crate::value::FieldValue;

/// Receives the sub-values a [`ValueExtractor`] yields from a container.
///
/// The three receivers mirror the path-node shapes: keyed pairs become
/// `[key]` nodes, indexed pairs become `[index]` nodes, and bare values
/// become plain container-element nodes. Extraction is push-style so
/// extractors stay lazy: nothing is materialised beyond the pair currently
/// being visited.
pub trait ExtractedValueReceiver {
    /// A sub-value with no position, e.g. an optional's payload.
    fn value(&mut self, node_name: &str, value: &FieldValue);

    /// A sub-value at an iterable position.
    fn indexed(&mut self, node_name: &str, index: usize, value: &FieldValue);

    /// A sub-value at a map position.
    fn keyed(&mut self, node_name: &str, key: &str, value: &FieldValue);
}

/// Strategy exposing the sub-values of one container type argument.
///
/// An extractor is bound to a `(container kind, type-arg index)` pair in
/// the extractor registry; the engine locates it by walking the registry
/// scope chain when it meets a container-element descriptor.
pub trait ValueExtractor: Send + Sync {
    fn extract(
        &self,
        container: &FieldValue,
        receiver: &mut dyn ExtractedValueReceiver,
    ) -> Result<(), CollaboratorError>;
}
