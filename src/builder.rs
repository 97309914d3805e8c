//! Builder
//!
//! [`TreeBuilder`] drives a tree through a fixed lifecycle: split, then
//! prune, then finished. Each phase runs once, in order. A call made in the
//! wrong state fails with [`SaplingError::InvalidBuildOperation`] and leaves
//! the builder exactly as it was.
use crate::errors::SaplingError;
use crate::node::Node;
use crate::prune::{KeepAll, Pruner};
use crate::splitter::{ScaffoldSplitter, Splitter};
use crate::tree::Tree;
use log::{info, warn};
use std::fmt;

/// Phase of a [`TreeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Splitting,
    Pruning,
    Finished,
}

/// Operations that move a builder between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOperation {
    Split,
    Prune,
    Finish,
}

impl BuildState {
    /// The state `operation` leads to from here.
    pub fn transition(self, operation: BuildOperation) -> Result<BuildState, SaplingError> {
        match (self, operation) {
            (BuildState::Splitting, BuildOperation::Split) => Ok(BuildState::Pruning),
            (BuildState::Pruning, BuildOperation::Prune) => Ok(BuildState::Finished),
            (BuildState::Finished, BuildOperation::Finish) => Ok(BuildState::Finished),
            (state, operation) => Err(SaplingError::InvalidBuildOperation { operation, state }),
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildState::Splitting => write!(f, "splitting"),
            BuildState::Pruning => write!(f, "pruning"),
            BuildState::Finished => write!(f, "finished"),
        }
    }
}

impl fmt::Display for BuildOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildOperation::Split => write!(f, "split"),
            BuildOperation::Prune => write!(f, "prune"),
            BuildOperation::Finish => write!(f, "finish"),
        }
    }
}

/// Single owner context of a tree under construction.
#[derive(Debug)]
pub struct TreeBuilder<D, S = ScaffoldSplitter, P = KeepAll> {
    dataset: Vec<D>,
    tree: Option<Tree<D>>,
    state: BuildState,
    splitter: S,
    pruner: P,
}

impl<D: Clone> TreeBuilder<D> {
    /// Builder over `dataset` with the scaffold splitter and no pruning.
    pub fn new(dataset: Vec<D>) -> Self {
        TreeBuilder::with_strategies(dataset, ScaffoldSplitter::default(), KeepAll)
    }
}

impl<D, S, P> TreeBuilder<D, S, P>
where
    D: Clone,
    S: Splitter<D>,
    P: Pruner<D>,
{
    pub fn with_strategies(dataset: Vec<D>, splitter: S, pruner: P) -> Self {
        TreeBuilder {
            dataset,
            tree: None,
            state: BuildState::Splitting,
            splitter,
            pruner,
        }
    }

    /// Set the splitter.
    pub fn set_splitter<T: Splitter<D>>(self, splitter: T) -> TreeBuilder<D, T, P> {
        TreeBuilder {
            dataset: self.dataset,
            tree: self.tree,
            state: self.state,
            splitter,
            pruner: self.pruner,
        }
    }

    /// Set the pruner.
    pub fn set_pruner<T: Pruner<D>>(self, pruner: T) -> TreeBuilder<D, S, T> {
        TreeBuilder {
            dataset: self.dataset,
            tree: self.tree,
            state: self.state,
            splitter: self.splitter,
            pruner,
        }
    }

    pub fn dataset(&self) -> &[D] {
        &self.dataset
    }

    /// The tree, absent until the split phase completes.
    pub fn tree(&self) -> Option<&Tree<D>> {
        self.tree.as_ref()
    }

    pub fn root(&self) -> Option<&Node<D>> {
        self.tree.as_ref().and_then(|t| t.root())
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Build the tree structure and move to the prune phase.
    ///
    /// The splitter's tree is validated and sealed before it is stored, so
    /// only a complete tree ever reaches the builder.
    pub fn start_split(&mut self) -> Result<&Tree<D>, SaplingError> {
        let next = self.checked_transition(BuildOperation::Split)?;
        info!("Splitting the tree over {} datapoints...", self.dataset.len());
        let mut tree = self.splitter.split(&self.dataset)?;
        let root = tree.validate()?;
        tree.seal();
        info!(
            "Split done: {} nodes, {} leaves, root {}.",
            tree.len(),
            tree.n_leaves(),
            root
        );
        self.state = next;
        Ok(&*self.tree.insert(tree))
    }

    /// Run the pruner and finish the tree.
    ///
    /// The pruner works on a copy that only replaces the stored tree once it
    /// succeeds.
    pub fn start_prune(&mut self) -> Result<&Tree<D>, SaplingError> {
        let next = self.checked_transition(BuildOperation::Prune)?;
        let Some(current) = self.tree.as_ref() else {
            return Err(SaplingError::IncompleteTree("the split phase left no tree".to_string()));
        };
        info!("Pruning the tree...");
        let mut pruned = current.clone();
        self.pruner.prune(&mut pruned)?;
        info!("Prune done: {} nodes, {} leaves.", pruned.len(), pruned.n_leaves());
        self.state = next;
        Ok(&*self.tree.insert(pruned))
    }

    /// Hand the finished tree over to the caller.
    pub fn finish(self) -> Result<Tree<D>, SaplingError> {
        self.checked_transition(BuildOperation::Finish)?;
        self.tree
            .ok_or_else(|| SaplingError::IncompleteTree("the split phase left no tree".to_string()))
    }

    fn checked_transition(&self, operation: BuildOperation) -> Result<BuildState, SaplingError> {
        self.state.transition(operation).inspect_err(|e| warn!("{}", e))
    }
}
