//! Iterator
//!
//! Depth-first and breadth-first walks over a [`Tree`]. Both share one
//! walker, [`TreeIter`], and differ only in the [`Frontier`] holding the
//! nodes still to be visited: a stack gives pre-order, a queue gives level
//! order. In both cases the left child is visited before the right one.
use crate::errors::SaplingError;
use crate::node::{Node, NodeId};
use crate::tree::Tree;
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Pending work of a tree walk.
pub trait Frontier: Default {
    /// Add a node to the frontier.
    fn add_node(&mut self, node: NodeId);
    /// Add the children of the node just visited, so that left comes out first.
    fn add_children(&mut self, left: Option<NodeId>, right: Option<NodeId>);
    /// Take the next node to visit.
    fn get_next_node(&mut self) -> Option<NodeId>;
    /// Look at the next node without taking it.
    fn peek_next_node(&self) -> Option<NodeId>;
    /// Check if the frontier is empty.
    fn is_empty(&self) -> bool;
}

impl Frontier for Vec<NodeId> {
    fn add_node(&mut self, node: NodeId) {
        self.push(node);
    }

    fn add_children(&mut self, left: Option<NodeId>, right: Option<NodeId>) {
        self.extend(right);
        self.extend(left);
    }

    fn get_next_node(&mut self) -> Option<NodeId> {
        self.pop()
    }

    fn peek_next_node(&self) -> Option<NodeId> {
        self.last().copied()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

impl Frontier for VecDeque<NodeId> {
    fn add_node(&mut self, node: NodeId) {
        self.push_back(node);
    }

    fn add_children(&mut self, left: Option<NodeId>, right: Option<NodeId>) {
        self.extend(left);
        self.extend(right);
    }

    fn get_next_node(&mut self) -> Option<NodeId> {
        self.pop_front()
    }

    fn peek_next_node(&self) -> Option<NodeId> {
        self.front().copied()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

/// Single pass walk over the subtree below a start node.
#[derive(Debug, Clone)]
pub struct TreeIter<'a, D, F> {
    tree: &'a Tree<D>,
    start: Option<NodeId>,
    index: usize,
    frontier: F,
}

/// Pre-order walk, left before right.
pub type DepthFirstIter<'a, D> = TreeIter<'a, D, Vec<NodeId>>;

/// Level-order walk, left before right.
pub type BreadthFirstIter<'a, D> = TreeIter<'a, D, VecDeque<NodeId>>;

impl<'a, D, F: Frontier> TreeIter<'a, D, F> {
    /// Start a walk at `start`; `None` gives an iterator that is already finished.
    pub fn new(tree: &'a Tree<D>, start: Option<NodeId>) -> Self {
        let mut frontier = F::default();
        if let Some(node) = start {
            frontier.add_node(node);
        }
        TreeIter {
            tree,
            start,
            index: 0,
            frontier,
        }
    }

    /// The node the walk started from.
    pub fn start(&self) -> Option<&'a Node<D>> {
        self.start.map(|id| &self.tree[id])
    }

    /// Number of nodes yielded so far.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn finished(&self) -> bool {
        self.frontier.is_empty()
    }

    /// The node the next call to `next_item` will yield.
    pub fn current_item(&self) -> Option<&'a Node<D>> {
        self.frontier.peek_next_node().map(|id| &self.tree[id])
    }

    pub fn next_item(&mut self) -> Result<&'a Node<D>, SaplingError> {
        let id = self
            .frontier
            .get_next_node()
            .ok_or(SaplingError::IteratorExhausted(self.index))?;
        let node = &self.tree[id];
        if let Node::Decision(n) = node {
            self.frontier.add_children(n.left(), n.right());
        }
        self.index += 1;
        Ok(node)
    }
}

impl<'a, D, F: Frontier> Iterator for TreeIter<'a, D, F> {
    type Item = &'a Node<D>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().ok()
    }
}

impl<D, F: Frontier> FusedIterator for TreeIter<'_, D, F> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::error::Error;

    // root(A(A1, A2), B), labelled by datapoint.
    fn small_tree() -> Result<Tree<&'static str>, SaplingError> {
        let mut tree = Tree::new();
        let root = tree.add_decision_node(vec!["root"])?;
        let a = tree.add_decision_node(vec!["A"])?;
        let a1 = tree.add_leaf_node(vec!["A1"])?;
        let a2 = tree.add_leaf_node(vec!["A2"])?;
        let b = tree.add_leaf_node(vec!["B"])?;
        tree.set_left_child(a, a1)?;
        tree.set_right_child(a, a2)?;
        tree.set_left_child(root, a)?;
        tree.set_right_child(root, b)?;
        tree.set_root(root)?;
        Ok(tree)
    }

    fn drain<F: Frontier>(mut it: TreeIter<'_, &'static str, F>) -> Result<Vec<&'static str>, SaplingError> {
        let mut labels = Vec::new();
        while !it.finished() {
            labels.push(it.next_item()?.datapoints()[0]);
            assert_eq!(it.index(), labels.len());
        }
        assert_eq!(it.next_item().unwrap_err(), SaplingError::IteratorExhausted(labels.len()));
        Ok(labels)
    }

    #[test]
    fn test_depth_first_order() -> Result<(), Box<dyn Error>> {
        let tree = small_tree()?;
        assert_eq!(drain(tree.dfs())?, vec!["root", "A", "A1", "A2", "B"]);
        Ok(())
    }

    #[test]
    fn test_breadth_first_order() -> Result<(), Box<dyn Error>> {
        let tree = small_tree()?;
        assert_eq!(drain(tree.bfs())?, vec!["root", "A", "B", "A1", "A2"]);
        Ok(())
    }

    #[test]
    fn test_exhaustion_after_five() -> Result<(), Box<dyn Error>> {
        let tree = small_tree()?;
        let mut dfs = tree.dfs();
        let mut bfs = tree.bfs();
        for _ in 0..5 {
            assert!(!dfs.finished());
            assert!(!bfs.finished());
            dfs.next_item()?;
            bfs.next_item()?;
        }
        assert!(dfs.finished() && bfs.finished());
        assert!(matches!(dfs.next_item(), Err(SaplingError::IteratorExhausted(5))));
        assert!(matches!(bfs.next_item(), Err(SaplingError::IteratorExhausted(5))));
        // Failed calls don't advance the count.
        assert_eq!(dfs.index(), 5);
        assert!(dfs.current_item().is_none());
        assert!(dfs.next().is_none());
        Ok(())
    }

    #[test]
    fn test_current_item_peeks() -> Result<(), Box<dyn Error>> {
        let tree = small_tree()?;
        let mut it = tree.bfs();
        let first = it.current_item().unwrap();
        let again = it.current_item().unwrap();
        assert!(std::ptr::eq(first, again));
        assert_eq!(it.index(), 0);
        let taken = it.next_item()?;
        assert!(std::ptr::eq(first, taken));
        assert_eq!(it.current_item().unwrap().datapoints(), &["A"]);
        assert_eq!(it.start().unwrap().id(), tree.root_id().unwrap());
        Ok(())
    }

    #[test]
    fn test_walk_from_subtree() -> Result<(), Box<dyn Error>> {
        let tree = small_tree()?;
        let a = tree.children(tree.root_id().unwrap())?.0.id();
        let labels: Vec<_> = tree.dfs_from(a).map(|n| n.datapoints()[0]).collect();
        assert_eq!(labels, vec!["A", "A1", "A2"]);
        let leaf = tree.children(a)?.1.id();
        assert_eq!(tree.bfs_from(leaf).count(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::<u8>::new();
        let mut it = tree.dfs();
        assert!(it.finished());
        assert!(it.current_item().is_none());
        assert_eq!(it.next_item().unwrap_err(), SaplingError::IteratorExhausted(0));
        assert_eq!(tree.bfs().count(), 0);
    }

    #[test]
    fn test_random_chains_visit_every_node_once() -> Result<(), Box<dyn Error>> {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            // Random shape: at every step grow either side of the last decision node.
            let depth = rng.gen_range(0..30);
            let mut tree = Tree::new();
            let root = tree.add_decision_node(vec![0_usize])?;
            tree.set_root(root)?;
            let mut parent = root;
            for level in 1..=depth {
                let next = tree.add_decision_node(vec![level])?;
                let leaf = tree.add_leaf_node(vec![level])?;
                if rng.gen_bool(0.5) {
                    tree.set_left_child(parent, next)?;
                    tree.set_right_child(parent, leaf)?;
                } else {
                    tree.set_left_child(parent, leaf)?;
                    tree.set_right_child(parent, next)?;
                }
                parent = next;
            }
            let l = tree.add_leaf_node(vec![depth + 1])?;
            let r = tree.add_leaf_node(vec![depth + 1])?;
            tree.set_left_child(parent, l)?;
            tree.set_right_child(parent, r)?;
            tree.validate()?;

            let mut dfs: Vec<_> = tree.dfs().map(|n| n.id()).collect();
            let mut bfs: Vec<_> = tree.bfs().map(|n| n.id()).collect();
            assert_eq!(dfs.len(), tree.len());
            assert_eq!(dfs[0], root);
            assert_eq!(bfs[0], root);
            // Level order never goes back up a level.
            let levels: Vec<_> = bfs.iter().map(|id| tree.node_depth(*id)).collect();
            assert!(levels.windows(2).all(|w| w[0] <= w[1]));
            dfs.sort();
            bfs.sort();
            assert_eq!(dfs, bfs);
            dfs.dedup();
            assert_eq!(dfs.len(), tree.len());
        }
        Ok(())
    }
}
