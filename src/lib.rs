//! Scaffolding for decision tree learners.
//!
//! A [`TreeBuilder`] runs a split phase and a prune phase over a dataset and
//! yields a [`Tree`]: an arena of [`Node`]s, each either a decision node with
//! two children and a split rule or a leaf. Trees can be walked depth-first
//! or breadth-first, and processed with a [`TreeVisitor`].
//!
//! ```
//! use sapling::{LeafCounter, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new(vec!["datapoint_1", "datapoint_2", "datapoint_3"]);
//! builder.start_split().unwrap();
//! builder.start_prune().unwrap();
//! let tree = builder.finish().unwrap();
//!
//! let mut counter = LeafCounter::new();
//! tree.accept(&mut counter);
//! assert_eq!(counter.leaf_count(), 4);
//! assert_eq!(tree.dfs().count(), 7);
//! ```

// Modules
pub mod builder;
pub mod errors;
pub mod iterator;
pub mod node;
pub mod prune;
pub mod splitter;
pub mod tree;
pub mod visitor;

// Individual classes, and functions
pub use builder::{BuildOperation, BuildState, TreeBuilder};
pub use errors::SaplingError;
pub use iterator::{BreadthFirstIter, DepthFirstIter, Frontier, TreeIter};
pub use node::{DecisionNode, LeafNode, Node, NodeId, NodeKind, SplitRule};
pub use prune::{KeepAll, Pruner};
pub use splitter::{ScaffoldSplitter, Splitter};
pub use tree::{LeafValue, Tree};
pub use visitor::{walk_children, LeafCounter, SplitCollector, TreeVisitor};
