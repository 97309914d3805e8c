//! Prune
//!
//! The prune phase hook, run once on the sealed tree the split phase left.
use crate::errors::SaplingError;
use crate::tree::Tree;
use log::debug;

/// Trait for modifying a tree after it has been split.
///
/// The tree is sealed, so a pruner can edit node metadata but not the
/// structure. Returning an error aborts the phase; the builder then keeps
/// the tree it had before the pruner ran.
pub trait Pruner<D> {
    fn prune(&self, tree: &mut Tree<D>) -> Result<(), SaplingError>;
}

impl<D, F> Pruner<D> for F
where
    F: Fn(&mut Tree<D>) -> Result<(), SaplingError>,
{
    fn prune(&self, tree: &mut Tree<D>) -> Result<(), SaplingError> {
        self(tree)
    }
}

/// Leaves the tree as it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepAll;

impl<D> Pruner<D> for KeepAll {
    fn prune(&self, tree: &mut Tree<D>) -> Result<(), SaplingError> {
        debug!("Keeping all {} nodes", tree.len());
        Ok(())
    }
}
