// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The context a validator sees, and its fluent violation builder.
//!
//! The builder is a state machine over the partial path being assembled:
//! [`ViolationBuilder`] has no open node, [`NodeBuilder`] has one open node
//! whose position (`at_index` / `at_key`) may still change. Both states
//! terminate with `add()`, which queues the violation on the context; the
//! job combines queued paths with the constraint location when it collects
//! them.

use crate::path::PathNode;
use crate::traits::ClockProvider;
use crate::value::{ObjectGraph, ValueType};

/// A custom violation queued by a validator.
#[derive(Debug, Clone)]
pub(crate) struct PendingViolation {
    pub template: String,
    /// Nodes appended below the constraint location; empty means the
    /// violation sits at the constraint location itself.
    pub nodes: Vec<PathNode>,
}

/// What a validator may observe and do while evaluating one value.
pub struct ConstraintContext<'a> {
    graph: &'a ObjectGraph,
    clock: &'a dyn ClockProvider,
    default_disabled: bool,
    pending: Vec<PendingViolation>,
}

impl<'a> ConstraintContext<'a> {
    pub(crate) fn new(graph: &'a ObjectGraph, clock: &'a dyn ClockProvider) -> Self {
        ConstraintContext {
            graph,
            clock,
            default_disabled: false,
            pending: Vec::new(),
        }
    }

    /// The object graph the job is walking; validators use it to follow
    /// entity edges in the value under test.
    pub fn graph(&self) -> &ObjectGraph {
        self.graph
    }

    /// The reference clock for time-based constraints.
    pub fn clock(&self) -> &dyn ClockProvider {
        self.clock
    }

    /// Suppress the constraint's default violation. At least one custom
    /// violation must then be added, or collection fails.
    pub fn disable_default_violation(&mut self) {
        self.default_disabled = true;
    }

    /// Start building a custom violation from a message template.
    pub fn violation_template(&mut self, template: impl Into<String>) -> ViolationBuilder<'_, 'a> {
        ViolationBuilder {
            ctx: self,
            template: template.into(),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn default_disabled(&self) -> bool {
        self.default_disabled
    }

    pub(crate) fn take_pending(&mut self) -> Vec<PendingViolation> {
        std::mem::take(&mut self.pending)
    }
}

/// Builder state with no open node.
pub struct ViolationBuilder<'c, 'a> {
    ctx: &'c mut ConstraintContext<'a>,
    template: String,
    nodes: Vec<PathNode>,
}

impl<'c, 'a> ViolationBuilder<'c, 'a> {
    /// Append a property node and open it for positioning.
    pub fn add_property_node(mut self, name: impl Into<String>) -> NodeBuilder<'c, 'a> {
        self.nodes.push(PathNode::property(name));
        NodeBuilder { inner: self }
    }

    /// Append an entity node and open it for positioning.
    pub fn add_entity_node(mut self) -> NodeBuilder<'c, 'a> {
        self.nodes.push(PathNode::entity());
        NodeBuilder { inner: self }
    }

    /// Append a container-element node and open it for positioning.
    pub fn add_container_element_node(
        mut self,
        name: impl Into<String>,
        container: ValueType,
        type_arg_index: usize,
    ) -> NodeBuilder<'c, 'a> {
        self.nodes.push(PathNode::ContainerElement {
            name: name.into(),
            container,
            type_arg_index,
            index: None,
            key: None,
        });
        NodeBuilder { inner: self }
    }

    /// Queue the violation at the assembled path.
    pub fn add(self) {
        self.ctx.pending.push(PendingViolation {
            template: self.template,
            nodes: self.nodes,
        });
    }
}

/// Builder state with one open node whose position may still change.
pub struct NodeBuilder<'c, 'a> {
    inner: ViolationBuilder<'c, 'a>,
}

impl<'c, 'a> NodeBuilder<'c, 'a> {
    /// Set the iterable position of the open node.
    pub fn at_index(mut self, index: usize) -> Self {
        if let Some(node) = self.inner.nodes.pop() {
            self.inner.nodes.push(node.with_index(index));
        }
        self
    }

    /// Set the map position of the open node.
    pub fn at_key(mut self, key: impl Into<String>) -> Self {
        if let Some(node) = self.inner.nodes.pop() {
            self.inner.nodes.push(node.with_key(key));
        }
        self
    }

    /// Close the open node and append a property node.
    pub fn add_property_node(self, name: impl Into<String>) -> NodeBuilder<'c, 'a> {
        self.inner.add_property_node(name)
    }

    /// Close the open node and append an entity node.
    pub fn add_entity_node(self) -> NodeBuilder<'c, 'a> {
        self.inner.add_entity_node()
    }

    /// Close the open node and append a container-element node.
    pub fn add_container_element_node(
        self,
        name: impl Into<String>,
        container: ValueType,
        type_arg_index: usize,
    ) -> NodeBuilder<'c, 'a> {
        self.inner
            .add_container_element_node(name, container, type_arg_index)
    }

    /// Queue the violation at the assembled path.
    pub fn add(self) {
        self.inner.add()
    }
}
