// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured property paths.
//!
//! A [`Path`] is an ordered sequence of [`PathNode`]s leading from the root
//! of a validation request to the element a violation points at. Node kinds
//! are tagged variants; iterable position (`index`) and map position
//! (`key`) ride on the node that sits inside the container.
//!
//! Rendering follows the conventional bracket form: a node's position
//! renders as a `[..]` suffix attached to the preceding segment, then the
//! node's own name after a dot. A cascaded entity node contributes its
//! position but no name, so a class-level violation on the second element
//! of `orders` renders as `orders[1]`, while a constraint on a map value
//! renders as `field[k].<map value>`.
//!
//! The job mutates its working path in place while walking (push on
//! descent, pop on return) and clones it whenever a violation escapes
//! outward.

use std::fmt;

use crate::value::ValueType;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// A cascaded entity; carries container position when extracted from one.
    Entity {
        index: Option<usize>,
        key: Option<String>,
    },
    /// A named property of an entity.
    Property {
        name: String,
        index: Option<usize>,
        key: Option<String>,
    },
    /// A value inside a container, e.g. `<map value>`.
    ContainerElement {
        name: String,
        container: ValueType,
        type_arg_index: usize,
        index: Option<usize>,
        key: Option<String>,
    },
    /// A single parameter of an executable.
    Parameter { name: String, index: usize },
    /// The whole parameter array of an executable.
    CrossParameter,
    Method { name: String },
    Constructor { name: String },
    ReturnValue,
}

impl PathNode {
    pub fn entity() -> Self {
        PathNode::Entity { index: None, key: None }
    }

    pub fn property(name: impl Into<String>) -> Self {
        PathNode::Property {
            name: name.into(),
            index: None,
            key: None,
        }
    }

    pub fn parameter(name: impl Into<String>, index: usize) -> Self {
        PathNode::Parameter { name: name.into(), index }
    }

    pub fn method(name: impl Into<String>) -> Self {
        PathNode::Method { name: name.into() }
    }

    pub fn constructor(name: impl Into<String>) -> Self {
        PathNode::Constructor { name: name.into() }
    }

    /// Attach an iterable position to this node.
    pub fn with_index(mut self, i: usize) -> Self {
        match &mut self {
            PathNode::Entity { index, .. }
            | PathNode::Property { index, .. }
            | PathNode::ContainerElement { index, .. } => *index = Some(i),
            _ => {}
        }
        self
    }

    /// Attach a map position to this node.
    pub fn with_key(mut self, k: impl Into<String>) -> Self {
        match &mut self {
            PathNode::Entity { key, .. }
            | PathNode::Property { key, .. }
            | PathNode::ContainerElement { key, .. } => *key = Some(k.into()),
            _ => {}
        }
        self
    }

    /// The rendered name of this node, if it has one.
    fn display_name(&self) -> Option<&str> {
        match self {
            PathNode::Entity { .. } => None,
            PathNode::Property { name, .. } => Some(name),
            PathNode::ContainerElement { name, .. } => Some(name),
            PathNode::Parameter { name, .. } => Some(name),
            PathNode::CrossParameter => Some("<cross-parameter>"),
            PathNode::Method { name } => Some(name),
            PathNode::Constructor { name } => Some(name),
            PathNode::ReturnValue => Some("<return value>"),
        }
    }

    fn position(&self) -> (Option<usize>, Option<&str>) {
        match self {
            PathNode::Entity { index, key }
            | PathNode::Property { index, key, .. }
            | PathNode::ContainerElement { index, key, .. } => (*index, key.as_deref()),
            _ => (None, None),
        }
    }
}

/// An ordered sequence of path nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<PathNode>,
}

impl Path {
    /// The empty path: the root of a validation request.
    pub fn root() -> Self {
        Path { nodes: Vec::new() }
    }

    pub fn from_nodes(nodes: Vec<PathNode>) -> Self {
        Path { nodes }
    }

    pub fn push(&mut self, node: PathNode) {
        self.nodes.push(node);
    }

    pub fn pop(&mut self) -> Option<PathNode> {
        self.nodes.pop()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The leaf node, when the path is not the root.
    pub fn leaf(&self) -> Option<&PathNode> {
        self.nodes.last()
    }

    /// A copy of this path without its leaf node.
    pub fn without_leaf(&self) -> Path {
        let mut nodes = self.nodes.clone();
        nodes.pop();
        Path { nodes }
    }

    /// A copy of this path with `node` appended.
    pub fn child(&self, node: PathNode) -> Path {
        let mut nodes = self.nodes.clone();
        nodes.push(node);
        Path { nodes }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = false;
        for node in &self.nodes {
            let (index, key) = node.position();
            if let Some(i) = index {
                write!(f, "[{}]", i)?;
                written = true;
            } else if let Some(k) = key {
                write!(f, "[{}]", k)?;
                written = true;
            }
            if let Some(name) = node.display_name() {
                if written {
                    write!(f, ".")?;
                }
                write!(f, "{}", name)?;
                written = true;
            }
        }
        Ok(())
    }
}
