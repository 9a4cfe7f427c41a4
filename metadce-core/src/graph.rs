//! Graph construction and reachability analysis using BFS.
//!
//! Performance characteristics:
//! - Graph build: O(|V| + |E|) where V = nodes, E = `reaches` edges
//! - Multi-source reachability: O(|V| + |E|) single traversal
//!
//! `DiGraphMap` keeps nodes and edges in insertion order, and nodes are
//! inserted in declaration order, so the visit order is reproducible for a
//! given input. The reachable set itself does not depend on it.

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::error::{MetaDceError, MetaDceResult};
use crate::store::NodeStore;

/// Output of a reachability computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachability {
    /// Every node reachable from a root, roots included.
    pub reachable: BTreeSet<String>,
    /// Order in which nodes were first discovered.
    pub visit_order: Vec<String>,
}

impl Reachability {
    pub fn contains(&self, name: &str) -> bool {
        self.reachable.contains(name)
    }

    pub fn len(&self) -> usize {
        self.reachable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reachable.is_empty()
    }
}

/// Check that every edge target and every root names a loaded node.
///
/// Edges are checked in declaration order, then roots in registration order;
/// the first failure is reported.
pub fn validate(store: &NodeStore) -> MetaDceResult<()> {
    for node in store.iter() {
        if let Some(to) = node.reaches.iter().find(|to| !store.contains(to)) {
            return Err(MetaDceError::DanglingReference {
                from: node.name.clone(),
                to: to.clone(),
            });
        }
    }

    if let Some(root) = store.roots().iter().find(|r| !store.contains(r)) {
        return Err(MetaDceError::UnknownRoot { name: root.clone() });
    }

    Ok(())
}

/// Builds the reachability graph from the node store.
///
/// Fails with [`MetaDceError::DanglingReference`] on an edge to a name that
/// is not a node, rather than dropping the edge. Repeated edges collapse.
pub fn build_graph(store: &NodeStore) -> MetaDceResult<DiGraphMap<&str, ()>> {
    let mut g = DiGraphMap::new();

    // 1. Add all nodes
    for name in store.names() {
        g.add_node(name);
    }

    // 2. Add all edges
    for node in store.iter() {
        for to in &node.reaches {
            if !store.contains(to) {
                return Err(MetaDceError::DanglingReference {
                    from: node.name.clone(),
                    to: to.clone(),
                });
            }
            g.add_edge(node.name.as_str(), to.as_str(), ());
        }
    }

    Ok(g)
}

/// Performs multi-source BFS from all roots at once.
///
/// Each node is expanded at most once, so cycles terminate. A root that is
/// not in the graph is an error.
pub fn reachable_from_roots<'a>(
    g: &DiGraphMap<&'a str, ()>,
    roots: impl IntoIterator<Item = &'a str>,
) -> MetaDceResult<Reachability> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    for root in roots {
        if !g.contains_node(root) {
            return Err(MetaDceError::UnknownRoot {
                name: root.to_string(),
            });
        }
        if visited.insert(root) {
            order.push(root);
            queue.push_back(root);
        }
    }

    while let Some(node) = queue.pop_front() {
        for n in g.neighbors(node) {
            if visited.insert(n) {
                order.push(n);
                queue.push_back(n);
            }
        }
    }

    debug!(reachable = order.len(), total = g.node_count(), "reachability computed");

    Ok(Reachability {
        reachable: order.iter().map(|s| s.to_string()).collect(),
        visit_order: order.into_iter().map(String::from).collect(),
    })
}

/// Validate the store, then compute the set reachable from its roots.
pub fn compute(store: &NodeStore) -> MetaDceResult<Reachability> {
    validate(store)?;
    let g = build_graph(store)?;
    reachable_from_roots(&g, store.roots().iter().map(String::as_str))
}

/// Export the combined graph in visualizer-compatible JSON format.
///
/// ```json
/// {
///   "nodes": [{ "id": 0, "name": "n", "dead": false, "root": true, "export": null, "import": null }],
///   "edges": [{ "from": 0, "to": 1 }]
/// }
/// ```
pub fn graph_to_visualizer_json(store: &NodeStore, reachable: &Reachability) -> serde_json::Value {
    let names: Vec<&str> = store.names().collect();
    let id_of = |name: &str| names.iter().position(|n| *n == name);

    let nodes: Vec<serde_json::Value> = store
        .iter()
        .enumerate()
        .map(|(i, node)| {
            serde_json::json!({
                "id": i,
                "name": node.name,
                "dead": !reachable.contains(&node.name),
                "root": node.root,
                "export": node.export,
                "import": node.import.as_ref().map(|i| [&i.module, &i.base]),
            })
        })
        .collect();

    let mut seen = HashSet::new();
    let mut edges: Vec<serde_json::Value> = Vec::new();
    for (from_id, node) in store.iter().enumerate() {
        for to in &node.reaches {
            if let Some(to_id) = id_of(to) {
                if seen.insert((from_id, to_id)) {
                    edges.push(serde_json::json!({ "from": from_id, "to": to_id }));
                }
            }
        }
    }

    let dead_count = store.names().filter(|n| !reachable.contains(n)).count();

    serde_json::json!({
        "nodes": nodes,
        "edges": edges,
        "stats": {
            "total_nodes": store.len(),
            "total_edges": edges.len(),
            "dead_nodes": dead_count,
        }
    })
}
