//! Node
//!
//! The composite node hierarchy. A [`Node`] is either a [`DecisionNode`],
//! which owns two children and a split rule, or a [`LeafNode`], which owns
//! neither. Composite-only operations are infallible on `DecisionNode`, and
//! checked once at the generic `Node` boundary.
use crate::errors::SaplingError;
use crate::tree::Tree;
use crate::visitor::TreeVisitor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a node inside the [`Tree`] arena that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Index of the node in its arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Decision,
    Leaf,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeKind::Decision => write!(f, "decision"),
            NodeKind::Leaf => write!(f, "leaf"),
        }
    }
}

/// How a decision node divides its datapoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRule {
    /// Column the rule reads.
    pub column: String,
    /// Values below the threshold go left.
    pub threshold: f64,
}

impl SplitRule {
    pub fn new(column: impl Into<String>, threshold: f64) -> Self {
        SplitRule {
            column: column.into(),
            threshold,
        }
    }
}

impl fmt::Display for SplitRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} < {}", self.column, self.threshold)
    }
}

/// Composite node: two children and an optional split rule.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionNode<D> {
    id: NodeId,
    datapoints: Vec<D>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    split: Option<SplitRule>,
}

impl<D> DecisionNode<D> {
    pub(crate) fn new(id: NodeId, datapoints: Vec<D>) -> Self {
        DecisionNode {
            id,
            datapoints,
            left: None,
            right: None,
            split: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn datapoints(&self) -> &[D] {
        &self.datapoints
    }

    pub fn datapoint_count(&self) -> usize {
        self.datapoints.len()
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Both children, left first, once both slots are assigned.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.left.zip(self.right)
    }

    pub fn split_rule(&self) -> Option<&SplitRule> {
        self.split.as_ref()
    }

    pub fn set_split_rule(&mut self, rule: SplitRule) {
        self.split = Some(rule);
    }

    // Slot bookkeeping belongs to the arena, which checks ownership first.
    pub(crate) fn assign_left(&mut self, child: NodeId) {
        self.left = Some(child);
    }

    pub(crate) fn assign_right(&mut self, child: NodeId) {
        self.right = Some(child);
    }
}

/// Terminal node.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode<D> {
    id: NodeId,
    datapoints: Vec<D>,
}

impl<D> LeafNode<D> {
    pub(crate) fn new(id: NodeId, datapoints: Vec<D>) -> Self {
        LeafNode { id, datapoints }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn datapoints(&self) -> &[D] {
        &self.datapoints
    }

    pub fn datapoint_count(&self) -> usize {
        self.datapoints.len()
    }
}

/// A node of either kind, answering the uniform composite contract.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<D> {
    Decision(DecisionNode<D>),
    Leaf(LeafNode<D>),
}

impl<D> Node<D> {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Decision(n) => n.id(),
            Node::Leaf(n) => n.id(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Decision(_) => NodeKind::Decision,
            Node::Leaf(_) => NodeKind::Leaf,
        }
    }

    pub fn datapoints(&self) -> &[D] {
        match self {
            Node::Decision(n) => n.datapoints(),
            Node::Leaf(n) => n.datapoints(),
        }
    }

    pub fn datapoint_count(&self) -> usize {
        self.datapoints().len()
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Node::Decision(_))
    }

    pub fn as_decision(&self) -> Option<&DecisionNode<D>> {
        match self {
            Node::Decision(n) => Some(n),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<D>> {
        match self {
            Node::Decision(_) => None,
            Node::Leaf(n) => Some(n),
        }
    }

    /// Get both children, left first.
    ///
    /// Fails with [`SaplingError::NotAComposite`] on a leaf, and with
    /// [`SaplingError::UnassignedChildren`] on a decision node missing a child.
    pub fn children(&self) -> Result<(NodeId, NodeId), SaplingError> {
        let node = self.composite("get children")?;
        node.children().ok_or(SaplingError::UnassignedChildren(node.id()))
    }

    /// Get the split rule, `None` if the decision node hasn't got one yet.
    pub fn split_information(&self) -> Result<Option<&SplitRule>, SaplingError> {
        Ok(self.composite("get split information")?.split_rule())
    }

    pub fn set_split_information(&mut self, column: impl Into<String>, threshold: f64) -> Result<(), SaplingError> {
        self.composite_mut("set split information")?
            .set_split_rule(SplitRule::new(column, threshold));
        Ok(())
    }

    /// Dispatch to the visitor handler matching this node's variant.
    pub fn accept<V: TreeVisitor<D> + ?Sized>(&self, tree: &Tree<D>, visitor: &mut V) {
        match self {
            Node::Decision(n) => visitor.visit_decision_node(tree, n),
            Node::Leaf(n) => visitor.visit_leaf_node(tree, n),
        }
    }

    pub(crate) fn composite(&self, operation: &'static str) -> Result<&DecisionNode<D>, SaplingError> {
        match self {
            Node::Decision(n) => Ok(n),
            Node::Leaf(_) => Err(self.not_a_composite(operation)),
        }
    }

    pub(crate) fn composite_mut(&mut self, operation: &'static str) -> Result<&mut DecisionNode<D>, SaplingError> {
        let err = self.not_a_composite(operation);
        match self {
            Node::Decision(n) => Ok(n),
            Node::Leaf(_) => Err(err),
        }
    }

    fn not_a_composite(&self, operation: &'static str) -> SaplingError {
        SaplingError::NotAComposite {
            operation,
            kind: self.kind(),
        }
    }
}

fn slot(child: Option<NodeId>) -> String {
    child.map_or_else(|| "-".to_string(), |c| c.to_string())
}

impl<D> fmt::Display for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Leaf(n) => write!(f, "{}:leaf,count={}", n.id(), n.datapoint_count()),
            Node::Decision(n) => {
                let rule = n.split_rule().map_or_else(|| "?".to_string(), |r| r.to_string());
                write!(
                    f,
                    "{}:[{}] yes={},no={},count={}",
                    n.id(),
                    rule,
                    slot(n.left()),
                    slot(n.right()),
                    n.datapoint_count()
                )
            }
        }
    }
}
