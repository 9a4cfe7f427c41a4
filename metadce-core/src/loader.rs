//! Graph description loading.
//!
//! The description is a JSON array of node records:
//!
//! ```json
//! [
//!   { "name": "entity1", "reaches": ["entity2", "entity3"], "root": true },
//!   { "name": "entity2", "reaches": ["entity1", "entity4"] },
//!   { "name": "entity3", "reaches": ["entity1"], "export": "export1" },
//!   { "name": "entity4", "import": ["module", "import1"] }
//! ]
//! ```
//!
//! Records are validated in order and the first structural problem aborts the
//! whole load. Import linkage is only recorded here; resolving it against the
//! module is the binder's job.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{IoResultExt, MetaDceError, MetaDceResult};
use crate::store::{DceNode, ImportSpec, NodeStore};

const NAME: &str = "name";
const REACHES: &str = "reaches";
const ROOT: &str = "root";
const EXPORT: &str = "export";
const IMPORT: &str = "import";

/// Options controlling how records are turned into nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Reject a second record with an existing name instead of replacing it.
    pub strict_duplicates: bool,
}

/// A graph description file read from disk.
#[derive(Debug, Clone)]
pub struct GraphInput {
    /// Parsed JSON document.
    pub records: Value,
    /// SHA-256 of the raw file bytes.
    pub sha256: String,
}

/// Compute the SHA-256 hex digest of a graph description.
pub fn graph_digest(bytes: &[u8]) -> String {
    let mut sha = Sha256::new();
    sha.update(bytes);
    format!("{:x}", sha.finalize())
}

/// Read and parse a graph description file.
pub fn read_graph_file(path: &Path) -> MetaDceResult<GraphInput> {
    let bytes = fs::read(path).with_path(path)?;
    let records = serde_json::from_slice(&bytes).map_err(|e| {
        MetaDceError::malformed(format!("{} is not valid JSON: {}", path.display(), e))
    })?;
    Ok(GraphInput {
        records,
        sha256: graph_digest(&bytes),
    })
}

/// Load a parsed graph description into a fresh [`NodeStore`].
pub fn load_graph(input: &Value, options: LoadOptions) -> MetaDceResult<NodeStore> {
    let records = input.as_array().ok_or_else(|| {
        MetaDceError::malformed("input graph must be a JSON array of nodes")
    })?;

    let mut store = NodeStore::new();
    for (index, record) in records.iter().enumerate() {
        let node = parse_node(index, record)?;

        if store.contains(&node.name) {
            if options.strict_duplicates {
                return Err(MetaDceError::DuplicateNodeName { name: node.name });
            }
            warn!(node = %node.name, index, "duplicate node name, later record replaces earlier one");
        }

        if node.root {
            store.add_root(node.name.clone());
        }
        if let Some(export) = &node.export {
            store.add_export_claim(node.name.clone(), export.clone());
        }
        if let Some(import) = &node.import {
            store.add_import_claim(node.name.clone(), import.clone());
        }
        store.add_node(node);
    }

    debug!(
        nodes = store.len(),
        roots = store.roots().len(),
        edges = store.edge_count(),
        "graph loaded"
    );
    Ok(store)
}

/// Validate one record and build its node.
pub fn parse_node(index: usize, record: &Value) -> MetaDceResult<DceNode> {
    let obj = record.as_object().ok_or_else(|| {
        MetaDceError::malformed_at(index, "nodes in input graph must be JSON objects")
    })?;

    let name = match obj.get(NAME) {
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            return Err(MetaDceError::malformed_at(index, "node.name must be a string"));
        }
        None => {
            return Err(MetaDceError::malformed_at(
                index,
                "nodes in input graph must have a name",
            ));
        }
    };

    let mut node = DceNode::new(name);
    node.reaches = parse_reaches(index, obj)?;

    if let Some(root) = obj.get(ROOT) {
        if root != &Value::Bool(true) {
            return Err(MetaDceError::InvalidRootMarker { node: node.name });
        }
        node.root = true;
    }

    if let Some(exp) = obj.get(EXPORT) {
        let exp = exp.as_str().ok_or_else(|| {
            MetaDceError::malformed_at(index, "node.export, if it exists, must be a string")
        })?;
        node.export = Some(exp.to_string());
    }

    if let Some(imp) = obj.get(IMPORT) {
        node.import = Some(parse_import(index, imp)?);
    }

    Ok(node)
}

fn parse_reaches(index: usize, obj: &Map<String, Value>) -> MetaDceResult<Vec<String>> {
    let Some(reaches) = obj.get(REACHES) else {
        return Ok(Vec::new());
    };
    let items = reaches
        .as_array()
        .ok_or_else(|| MetaDceError::malformed_at(index, "node.reaches must be an array"))?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                MetaDceError::malformed_at(index, "node.reaches items must be strings")
            })
        })
        .collect()
}

fn parse_import(index: usize, imp: &Value) -> MetaDceResult<ImportSpec> {
    let bad = || {
        MetaDceError::malformed_at(
            index,
            "node.import, if it exists, must be an array of two strings",
        )
    };
    match imp.as_array().map(Vec::as_slice) {
        Some([Value::String(module), Value::String(base)]) => {
            Ok(ImportSpec::new(module.clone(), base.clone()))
        }
        _ => Err(bad()),
    }
}
