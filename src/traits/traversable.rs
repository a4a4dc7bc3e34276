// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::descriptor::ElementKind;
use crate::path::{Path, PathNode};
use crate::traits::CollaboratorError;
use crate::value::{InstanceId, ObjectGraph};

/// External policy deciding whether the engine may read or cascade into an
/// element. Both calls may fail; failures abort the job wrapped with the
/// element's path.
pub trait TraversableResolver: Send + Sync {
    /// Whether the property behind `node` on `host` may be read at all.
    fn is_reachable(
        &self,
        graph: &ObjectGraph,
        host: InstanceId,
        node: &PathNode,
        root_type: &str,
        path_to_host: &Path,
        element: ElementKind,
    ) -> Result<bool, CollaboratorError>;

    /// Whether a reachable, cascaded property may be recursed into.
    fn is_cascadable(
        &self,
        graph: &ObjectGraph,
        host: InstanceId,
        node: &PathNode,
        root_type: &str,
        path_to_host: &Path,
        element: ElementKind,
    ) -> Result<bool, CollaboratorError>;
}

/// Default resolver: everything is reachable and cascadable.
#[derive(Debug, Default)]
pub struct TraverseAll;

impl TraversableResolver for TraverseAll {
    fn is_reachable(
        &self,
        _graph: &ObjectGraph,
        _host: InstanceId,
        _node: &PathNode,
        _root_type: &str,
        _path_to_host: &Path,
        _element: ElementKind,
    ) -> Result<bool, CollaboratorError> {
        Ok(true)
    }

    fn is_cascadable(
        &self,
        _graph: &ObjectGraph,
        _host: InstanceId,
        _node: &PathNode,
        _root_type: &str,
        _path_to_host: &Path,
        _element: ElementKind,
    ) -> Result<bool, CollaboratorError> {
        Ok(true)
    }
}
