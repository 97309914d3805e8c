//! Visitor
//!
//! Algorithms over a tree, dispatched once per node variant through
//! [`Node::accept`](crate::node::Node::accept). A visitor decides its own
//! recursion: a decision handler that doesn't call [`walk_children`] (or
//! `accept` on the children itself) stops there.
use crate::node::{DecisionNode, LeafNode, SplitRule};
use crate::tree::Tree;

pub trait TreeVisitor<D> {
    fn visit_decision_node(&mut self, tree: &Tree<D>, node: &DecisionNode<D>);
    fn visit_leaf_node(&mut self, tree: &Tree<D>, node: &LeafNode<D>);
}

/// Run `accept` on the assigned children of a decision node, left first.
pub fn walk_children<D, V: TreeVisitor<D> + ?Sized>(tree: &Tree<D>, node: &DecisionNode<D>, visitor: &mut V) {
    for child in node.left().into_iter().chain(node.right()) {
        tree[child].accept(tree, visitor);
    }
}

/// Counts the leaves below the node it is accepted on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeafCounter {
    leaf_count: usize,
}

impl LeafCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }
}

impl<D> TreeVisitor<D> for LeafCounter {
    fn visit_decision_node(&mut self, tree: &Tree<D>, node: &DecisionNode<D>) {
        log::debug!("Leaf counter descending below node {}", node.id());
        walk_children(tree, node, self);
    }

    fn visit_leaf_node(&mut self, _tree: &Tree<D>, _node: &LeafNode<D>) {
        self.leaf_count += 1;
    }
}

/// Collects split rules bottom-up: a node's rule comes after its children's.
#[derive(Debug, Default, Clone)]
pub struct SplitCollector {
    rules: Vec<SplitRule>,
}

impl SplitCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[SplitRule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<SplitRule> {
        self.rules
    }
}

impl<D> TreeVisitor<D> for SplitCollector {
    fn visit_decision_node(&mut self, tree: &Tree<D>, node: &DecisionNode<D>) {
        walk_children(tree, node, self);
        if let Some(rule) = node.split_rule() {
            self.rules.push(rule.clone());
        }
    }

    fn visit_leaf_node(&mut self, _tree: &Tree<D>, _node: &LeafNode<D>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SaplingError;
    use crate::node::NodeId;
    use std::error::Error;

    // root(A(A1, A2), B)
    fn small_tree() -> Result<(Tree<u8>, NodeId, NodeId), SaplingError> {
        let mut tree = Tree::new();
        let root = tree.add_decision_node(vec![])?;
        let a = tree.add_decision_node(vec![])?;
        let b = tree.add_leaf_node(vec![])?;
        let a1 = tree.add_leaf_node(vec![])?;
        let a2 = tree.add_leaf_node(vec![])?;
        tree.set_root(root)?;
        tree.set_left_child(root, a)?;
        tree.set_right_child(root, b)?;
        tree.set_left_child(a, a1)?;
        tree.set_right_child(a, a2)?;
        tree.set_split_information(root, "column_1", 9.0)?;
        tree.set_split_information(a, "column_2", 5.0)?;
        Ok((tree, root, a))
    }

    /// Records which handler ran, without recursing.
    #[derive(Default)]
    struct Dispatch {
        calls: Vec<&'static str>,
    }

    impl TreeVisitor<u8> for Dispatch {
        fn visit_decision_node(&mut self, _tree: &Tree<u8>, _node: &DecisionNode<u8>) {
            self.calls.push("decision");
        }

        fn visit_leaf_node(&mut self, _tree: &Tree<u8>, _node: &LeafNode<u8>) {
            self.calls.push("leaf");
        }
    }

    #[test]
    fn test_count_leaves() -> Result<(), Box<dyn Error>> {
        let (tree, _, a) = small_tree()?;
        let mut counter = LeafCounter::new();
        tree.accept(&mut counter);
        assert_eq!(counter.leaf_count(), 3);

        let mut below_a = LeafCounter::new();
        tree[a].accept(&tree, &mut below_a);
        assert_eq!(below_a.leaf_count(), 2);
        Ok(())
    }

    #[test]
    fn test_single_dispatch_step() -> Result<(), Box<dyn Error>> {
        let (tree, root, _) = small_tree()?;
        let mut dispatch = Dispatch::default();
        tree[root].accept(&tree, &mut dispatch);
        assert_eq!(dispatch.calls, vec!["decision"]);

        let (_, b) = tree.children(root)?;
        b.accept(&tree, &mut dispatch);
        assert_eq!(dispatch.calls, vec!["decision", "leaf"]);
        Ok(())
    }

    #[test]
    fn test_split_collector_order() -> Result<(), Box<dyn Error>> {
        let (tree, _, _) = small_tree()?;
        let mut collector = SplitCollector::new();
        tree.accept(&mut collector);
        let columns: Vec<_> = collector.rules().iter().map(|r| r.column.as_str()).collect();
        assert_eq!(columns, vec!["column_2", "column_1"]);
        assert_eq!(collector.into_rules().len(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_tree_visits_nothing() {
        let tree = Tree::<u8>::new();
        let mut counter = LeafCounter::new();
        tree.accept(&mut counter);
        assert_eq!(counter.leaf_count(), 0);
    }
}
