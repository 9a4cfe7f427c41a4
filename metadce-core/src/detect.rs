//! Partitions the graph into live and removable entities.

use serde::{Deserialize, Serialize};

use crate::binder::LinkageTable;
use crate::graph::Reachability;
use crate::module::ModuleTables;
use crate::store::NodeStore;

/// What can be eliminated, each list sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DceReport {
    /// Module exports no reachable node needs.
    pub removable_exports: Vec<String>,
    /// Module imports (by internal id) no reachable node needs.
    pub removable_imports: Vec<String>,
    /// Unreachable nodes bound to no export or import; the host environment owns these.
    pub removable_external: Vec<String>,
}

impl DceReport {
    pub fn is_empty(&self) -> bool {
        self.removable_exports.is_empty()
            && self.removable_imports.is_empty()
            && self.removable_external.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removable_exports.len() + self.removable_imports.len() + self.removable_external.len()
    }
}

/// Compute the removable sets.
///
/// An export is removable when its bound node is unreachable, or when no node
/// claims it at all. Imports are only removable through a bound, unreachable
/// node: references from inside the module to an unclaimed import are not
/// visible here.
pub fn find_removable<M: ModuleTables + ?Sized>(
    store: &NodeStore,
    linkage: &LinkageTable,
    reachable: &Reachability,
    module: &M,
) -> DceReport {
    let mut removable_exports: Vec<String> = module
        .exports()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| match linkage.node_for_export(name) {
            Some(node) => !reachable.contains(node),
            None => true,
        })
        .collect();
    removable_exports.sort();
    removable_exports.dedup();

    // BTreeMap iteration is already sorted by internal id.
    let removable_imports: Vec<String> = linkage
        .import_to_node
        .iter()
        .filter(|(_, node)| !reachable.contains(node))
        .map(|(internal, _)| internal.clone())
        .collect();

    // A node that lost its export or import to a later claimant is bound to
    // nothing, so it is reported with the host's entities.
    let bound = linkage.bound_nodes();
    let mut removable_external: Vec<String> = store
        .iter()
        .filter(|node| !bound.contains(node.name.as_str()) && !reachable.contains(&node.name))
        .map(|node| node.name.clone())
        .collect();
    removable_external.sort();

    DceReport {
        removable_exports,
        removable_imports,
        removable_external,
    }
}
