//! Tree
//!
//! The arena that owns every node of a decision tree. Nodes refer to their
//! children by [`NodeId`], and the arena keeps a parent table alongside so
//! that every assignment can be checked for single-parent ownership and
//! acyclicity before it happens.
use crate::errors::SaplingError;
use crate::iterator::{BreadthFirstIter, DepthFirstIter};
use crate::node::{DecisionNode, LeafNode, Node, NodeId, SplitRule};
use crate::visitor::TreeVisitor;
use hashbrown::HashSet;
use std::fmt::{self, Display};
use std::ops::Index;

/// Caller hook computing the value of a leaf from its datapoints.
pub trait LeafValue<D> {
    fn leaf_value(&self, datapoints: &[D]) -> f64;
}

impl<D, F> LeafValue<D> for F
where
    F: Fn(&[D]) -> f64,
{
    fn leaf_value(&self, datapoints: &[D]) -> f64 {
        self(datapoints)
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Nodes are handed out by shared reference only. The structure changes
/// through the checked methods on the tree, never by writing a node:
///
/// ```compile_fail
/// let mut tree = sapling::Tree::<u8>::new();
/// let id = tree.add_leaf_node(vec![]).unwrap();
/// let _ = tree.node_mut(id);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tree<D> {
    nodes: Vec<Node<D>>,
    parents: Vec<Option<NodeId>>,
    root: Option<NodeId>,
    sealed: bool,
}

impl<D> Default for Tree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Tree<D> {
    pub fn new() -> Self {
        Tree {
            nodes: Vec::new(),
            parents: Vec::new(),
            root: None,
            sealed: false,
        }
    }

    /// Allocate a detached decision node.
    pub fn add_decision_node(&mut self, datapoints: Vec<D>) -> Result<NodeId, SaplingError> {
        self.check_unsealed("add a decision node")?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Decision(DecisionNode::new(id, datapoints)));
        self.parents.push(None);
        Ok(id)
    }

    /// Allocate a detached leaf node.
    pub fn add_leaf_node(&mut self, datapoints: Vec<D>) -> Result<NodeId, SaplingError> {
        self.check_unsealed("add a leaf node")?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::Leaf(LeafNode::new(id, datapoints)));
        self.parents.push(None);
        Ok(id)
    }

    pub fn set_left_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SaplingError> {
        self.attach(parent, child, Side::Left)
    }

    pub fn set_right_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SaplingError> {
        self.attach(parent, child, Side::Right)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, side: Side) -> Result<(), SaplingError> {
        let operation = match side {
            Side::Left => "set the left child",
            Side::Right => "set the right child",
        };
        self.check_unsealed(operation)?;
        let parent_node = self
            .get(parent)
            .ok_or_else(|| SaplingError::InvalidAssignment(format!("parent {} is not a node of this tree", parent)))?
            .composite(operation)?;
        let occupied = match side {
            Side::Left => parent_node.left(),
            Side::Right => parent_node.right(),
        };
        if let Some(existing) = occupied {
            return Err(SaplingError::InvalidAssignment(format!(
                "node {} already owns {} in that slot",
                parent, existing
            )));
        }
        self.check_detached(parent, child)?;

        self.parents[child.0] = Some(parent);
        let slot = self.nodes[parent.0].composite_mut(operation)?;
        match side {
            Side::Left => slot.assign_left(child),
            Side::Right => slot.assign_right(child),
        }
        Ok(())
    }

    // A child must be an unowned node of this arena that isn't the root and
    // doesn't sit above `parent`.
    fn check_detached(&self, parent: NodeId, child: NodeId) -> Result<(), SaplingError> {
        if self.get(child).is_none() {
            return Err(SaplingError::InvalidAssignment(format!(
                "child {} is not a node of this tree",
                child
            )));
        }
        if child == parent {
            return Err(SaplingError::InvalidAssignment(format!(
                "node {} can't be its own child",
                child
            )));
        }
        if let Some(owner) = self.parents[child.0] {
            return Err(SaplingError::InvalidAssignment(format!(
                "node {} is already a child of node {}",
                child, owner
            )));
        }
        if self.root == Some(child) {
            return Err(SaplingError::InvalidAssignment(format!(
                "node {} is the root of the tree",
                child
            )));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(SaplingError::InvalidAssignment(format!(
                "node {} would become its own ancestor",
                child
            )));
        }
        Ok(())
    }

    /// Designate the root. It must be a parentless node, and can only be set once.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), SaplingError> {
        self.check_unsealed("set the root")?;
        if let Some(root) = self.root {
            return Err(SaplingError::InvalidAssignment(format!("the root is already node {}", root)));
        }
        match self.parents.get(id.0) {
            None => Err(SaplingError::InvalidAssignment(format!("root {} is not a node of this tree", id))),
            Some(Some(owner)) => Err(SaplingError::InvalidAssignment(format!(
                "node {} is already a child of node {}",
                id, owner
            ))),
            Some(None) => {
                self.root = Some(id);
                Ok(())
            }
        }
    }

    pub fn set_split_information(
        &mut self,
        id: NodeId,
        column: impl Into<String>,
        threshold: f64,
    ) -> Result<(), SaplingError> {
        self.node_mut(id)?.set_split_information(column, threshold)
    }

    pub fn split_information(&self, id: NodeId) -> Result<Option<&SplitRule>, SaplingError> {
        self.checked(id)?.split_information()
    }

    /// Both children of a decision node, left first.
    pub fn children(&self, id: NodeId) -> Result<(&Node<D>, &Node<D>), SaplingError> {
        let (left, right) = self.checked(id)?.children()?;
        Ok((&self[left], &self[right]))
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root(&self) -> Option<&Node<D>> {
        self.root.map(|id| &self[id])
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<D>> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.0).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_composite()).count()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of edges between the node and the root of its subtree.
    pub fn node_depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Depth of the deepest node, 0 for a lone root or an empty tree.
    pub fn depth(&self) -> usize {
        self.levels().into_iter().map(|(_, level)| level).max().unwrap_or(0)
    }

    // Pre-order (node, level) pairs from the root, left before right.
    fn levels(&self) -> Vec<(NodeId, usize)> {
        let mut visited = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.root.into_iter().map(|r| (r, 0)).collect();
        while let Some((id, level)) = stack.pop() {
            visited.push((id, level));
            if let Node::Decision(n) = &self[id] {
                stack.extend(n.right().map(|c| (c, level + 1)));
                stack.extend(n.left().map(|c| (c, level + 1)));
            }
        }
        visited
    }

    /// Nodes above `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |p| self.parent(*p))
    }

    /// Aggregate value of a node.
    ///
    /// Leaves are valued by the hook. A decision node takes the mean of its
    /// assigned children weighted by their datapoint counts, and falls back
    /// to the hook over its own datapoints when it has no children yet.
    pub fn value<V: LeafValue<D> + ?Sized>(&self, id: NodeId, leaf_value: &V) -> f64 {
        match &self[id] {
            Node::Leaf(n) => leaf_value.leaf_value(n.datapoints()),
            Node::Decision(n) => {
                let children: Vec<NodeId> = n.left().into_iter().chain(n.right()).collect();
                if children.is_empty() {
                    return leaf_value.leaf_value(n.datapoints());
                }
                let values: Vec<(f64, f64)> = children
                    .iter()
                    .map(|c| (self.value(*c, leaf_value), self[*c].datapoint_count() as f64))
                    .collect();
                let total: f64 = values.iter().map(|(_, w)| w).sum();
                if total > 0.0 {
                    values.iter().map(|(v, w)| v * w).sum::<f64>() / total
                } else {
                    values.iter().map(|(v, _)| v).sum::<f64>() / values.len() as f64
                }
            }
        }
    }

    /// Check that the tree can leave the split phase, returning the root.
    pub fn validate(&self) -> Result<NodeId, SaplingError> {
        let root = self
            .root
            .ok_or_else(|| SaplingError::IncompleteTree("no root was set".to_string()))?;
        let mut reached = HashSet::with_capacity(self.nodes.len());
        for node in self.dfs() {
            if let Node::Decision(n) = node {
                if n.children().is_none() {
                    return Err(SaplingError::IncompleteTree(format!(
                        "decision node {} is missing a child",
                        n.id()
                    )));
                }
            }
            reached.insert(node.id());
        }
        if reached.len() != self.nodes.len() {
            return Err(SaplingError::IncompleteTree(format!(
                "{} nodes are not reachable from the root",
                self.nodes.len() - reached.len()
            )));
        }
        Ok(root)
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<D>, SaplingError> {
        self.nodes.get_mut(id.0).ok_or(SaplingError::UnknownNode(id))
    }

    fn checked(&self, id: NodeId) -> Result<&Node<D>, SaplingError> {
        self.get(id).ok_or(SaplingError::UnknownNode(id))
    }

    fn check_unsealed(&self, operation: &'static str) -> Result<(), SaplingError> {
        if self.sealed {
            Err(SaplingError::Sealed(operation))
        } else {
            Ok(())
        }
    }

    pub fn dfs(&self) -> DepthFirstIter<'_, D> {
        DepthFirstIter::new(self, self.root)
    }

    pub fn bfs(&self) -> BreadthFirstIter<'_, D> {
        BreadthFirstIter::new(self, self.root)
    }

    pub fn dfs_from(&self, id: NodeId) -> DepthFirstIter<'_, D> {
        DepthFirstIter::new(self, self.get(id).map(|n| n.id()))
    }

    pub fn bfs_from(&self, id: NodeId) -> BreadthFirstIter<'_, D> {
        BreadthFirstIter::new(self, self.get(id).map(|n| n.id()))
    }

    /// Run a visitor from the root. Does nothing on an empty tree.
    pub fn accept<V: TreeVisitor<D> + ?Sized>(&self, visitor: &mut V) {
        if let Some(root) = self.root() {
            root.accept(self, visitor);
        }
    }
}

impl<D> Index<NodeId> for Tree<D> {
    type Output = Node<D>;

    fn index(&self, id: NodeId) -> &Node<D> {
        &self.nodes[id.0]
    }
}

impl<D> Display for Tree<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut r = String::new();
        for (id, level) in self.levels() {
            r += format!("{}{}\n", "      ".repeat(level), self[id]).as_str();
        }
        write!(f, "{}", r)
    }
}
