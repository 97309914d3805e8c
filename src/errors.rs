//! Errors
//!
//! Custom error types used throughout the `sapling` crate.
use crate::builder::{BuildOperation, BuildState};
use crate::node::{NodeId, NodeKind};
use thiserror::Error;

/// Errors that can occur while building, querying or walking a tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SaplingError {
    /// A composite-only operation was called on a leaf.
    #[error("Tried to {operation} on a {kind} node, which isn't a composite.")]
    NotAComposite { operation: &'static str, kind: NodeKind },
    /// The builder's current state forbids the operation.
    #[error("Cannot {operation} the tree while the builder is {state}.")]
    InvalidBuildOperation { operation: BuildOperation, state: BuildState },
    /// A child assignment that would break single-parent ownership.
    #[error("Invalid child assignment: {0}")]
    InvalidAssignment(String),
    /// An id that names no node of the tree it was looked up in.
    #[error("Node {0} is not in this tree.")]
    UnknownNode(NodeId),
    /// `next_item` was called on a finished iterator.
    #[error("Tried to iterate on an exhausted iterator after {0} nodes.")]
    IteratorExhausted(usize),
    /// A decision node was asked for children it doesn't have yet.
    #[error("Decision node {0} doesn't have both children assigned.")]
    UnassignedChildren(NodeId),
    /// The split phase produced a tree that can't be handed on.
    #[error("Incomplete tree: {0}")]
    IncompleteTree(String),
    /// Structural mutation after the split phase.
    #[error("Tried to {0} on a sealed tree.")]
    Sealed(&'static str),
    /// Splitter configuration couldn't be parsed.
    #[error("Invalid splitter configuration: {0}")]
    InvalidConfig(String),
}
