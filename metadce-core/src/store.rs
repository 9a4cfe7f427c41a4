//! The abstract reachability graph: nodes, their edges, and the root sequence.
//!
//! Nodes are kept in a name-indexed map plus a first-insertion order list, so
//! every traversal and every diagnostic walks nodes in the order the graph
//! description declared them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A module-level import claimed by a node: `(module, base)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportSpec {
    pub module: String,
    pub base: String,
}

impl ImportSpec {
    pub fn new(module: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            base: base.into(),
        }
    }
}

impl std::fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module, self.base)
    }
}

/// One entity in the combined graph.
///
/// Linkage is carried as optional fields rather than node subtypes, so the
/// graph stays homogeneous for traversal. A node may carry an export, an
/// import, both, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DceNode {
    /// Unique, case-sensitive name.
    pub name: String,
    /// Names of the nodes this one reaches. Duplicates are allowed.
    pub reaches: Vec<String>,
    /// Whether this node is reachable unconditionally.
    pub root: bool,
    /// Module export symbol this node stands for.
    pub export: Option<String>,
    /// Module import this node stands for.
    pub import: Option<ImportSpec>,
}

impl DceNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Holds every loaded node plus the designated roots.
///
/// Roots and export/import claims are registered per record, like the root
/// sequence, so a node replaced by a later record of the same name keeps
/// its claims.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: HashMap<String, DceNode>,
    order: Vec<String>,
    roots: Vec<String>,
    export_claims: Vec<(String, String)>,
    import_claims: Vec<(String, ImportSpec)>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any existing node of the same name.
    ///
    /// Returns the replaced node. A replaced node keeps its original
    /// position in declaration order.
    pub fn add_node(&mut self, node: DceNode) -> Option<DceNode> {
        if !self.nodes.contains_key(&node.name) {
            self.order.push(node.name.clone());
        }
        self.nodes.insert(node.name.clone(), node)
    }

    /// Append a root name. Existence is checked later, by [`crate::graph::validate`].
    pub fn add_root(&mut self, name: impl Into<String>) {
        self.roots.push(name.into());
    }

    /// Record that `node` stands for module export `export`.
    pub fn add_export_claim(&mut self, node: impl Into<String>, export: impl Into<String>) {
        self.export_claims.push((node.into(), export.into()));
    }

    /// Record that `node` stands for module import `import`.
    pub fn add_import_claim(&mut self, node: impl Into<String>, import: ImportSpec) {
        self.import_claims.push((node.into(), import));
    }

    /// `(node, export)` claims in record order.
    pub fn export_claims(&self) -> &[(String, String)] {
        &self.export_claims
    }

    /// `(node, import)` claims in record order.
    pub fn import_claims(&self) -> &[(String, ImportSpec)] {
        &self.import_claims
    }

    pub fn get_node(&self, name: &str) -> Option<&DceNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Roots in registration order, duplicates included.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Nodes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DceNode> + '_ {
        self.order.iter().filter_map(|name| self.nodes.get(name))
    }

    /// Node names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of declared edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.reaches.len()).sum()
    }
}
