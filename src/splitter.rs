//! Splitter
//!
//! The split phase hook. A [`Splitter`] turns the builder's dataset into a
//! tree; [`ScaffoldSplitter`] is the configurable stand-in used until a real
//! splitting algorithm is plugged in.
use crate::errors::SaplingError;
use crate::node::{NodeId, SplitRule};
use crate::tree::Tree;
use log::debug;
use serde::{Deserialize, Serialize};

/// Trait for building the structure of a tree out of a dataset.
pub trait Splitter<D> {
    /// Allocate the nodes of a tree and wire them together.
    /// The returned tree must have a root and no incomplete decision nodes.
    fn split(&self, dataset: &[D]) -> Result<Tree<D>, SaplingError>;
}

impl<D, F> Splitter<D> for F
where
    F: Fn(&[D]) -> Result<Tree<D>, SaplingError>,
{
    fn split(&self, dataset: &[D]) -> Result<Tree<D>, SaplingError> {
        self(dataset)
    }
}

fn default_rules() -> Vec<SplitRule> {
    vec![
        SplitRule::new("column_1", 9.0),
        SplitRule::new("column_3", -42.0),
        SplitRule::new("column_2", 5.0),
    ]
}

/// Builds a left-leaning chain of decision nodes, one per rule from the top
/// down. Every decision node's right child is a leaf, and the deepest one
/// gets a leaf on both sides. Each node carries the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldSplitter {
    #[serde(default = "default_rules")]
    pub rules: Vec<SplitRule>,
}

impl Default for ScaffoldSplitter {
    fn default() -> Self {
        ScaffoldSplitter { rules: default_rules() }
    }
}

impl ScaffoldSplitter {
    pub fn new(rules: Vec<SplitRule>) -> Self {
        ScaffoldSplitter { rules }
    }

    /// Load the configuration from a JSON string, e.g.
    /// `{"rules": [{"column": "age", "threshold": 30.0}]}`.
    pub fn from_json(json_str: &str) -> Result<Self, SaplingError> {
        serde_json::from_str::<ScaffoldSplitter>(json_str).map_err(|e| SaplingError::InvalidConfig(e.to_string()))
    }

    pub fn json_dump(&self) -> Result<String, SaplingError> {
        serde_json::to_string(self).map_err(|e| SaplingError::InvalidConfig(e.to_string()))
    }

    /// Set the split rules, from the root down.
    pub fn set_rules(mut self, rules: Vec<SplitRule>) -> Self {
        self.rules = rules;
        self
    }
}

impl<D: Clone> Splitter<D> for ScaffoldSplitter {
    fn split(&self, dataset: &[D]) -> Result<Tree<D>, SaplingError> {
        let mut tree = Tree::new();
        // Grown bottom-up, so the deepest left leaf comes first.
        let mut below: NodeId = tree.add_leaf_node(dataset.to_vec())?;
        for rule in self.rules.iter().rev() {
            let node = tree.add_decision_node(dataset.to_vec())?;
            tree.set_split_information(node, rule.column.as_str(), rule.threshold)?;
            let leaf = tree.add_leaf_node(dataset.to_vec())?;
            tree.set_left_child(node, below)?;
            tree.set_right_child(node, leaf)?;
            debug!("Split node {} on {}", node, rule);
            below = node;
        }
        tree.set_root(below)?;
        Ok(tree)
    }
}
