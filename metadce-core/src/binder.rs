//! Binds node linkage to the module's actual tables.
//!
//! Runs after loading because import resolution needs the module's import
//! table: the binder maps each `(module, base)` pair to the internal id the
//! module body uses. The node store is only read here.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::error::{MetaDceError, MetaDceResult};
use crate::module::ModuleTables;
use crate::store::NodeStore;

/// Name-indexed linkage between module symbols and graph nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkageTable {
    /// Exported name to the node that declared it.
    pub export_to_node: BTreeMap<String, String>,
    /// Internal import id to the node that declared it.
    pub import_to_node: BTreeMap<String, String>,
}

impl LinkageTable {
    /// Names of all nodes that carry a resolved export or import.
    pub fn bound_nodes(&self) -> HashSet<&str> {
        self.export_to_node
            .values()
            .chain(self.import_to_node.values())
            .map(String::as_str)
            .collect()
    }

    pub fn node_for_export(&self, export: &str) -> Option<&str> {
        self.export_to_node.get(export).map(String::as_str)
    }

    pub fn node_for_import(&self, internal: &str) -> Option<&str> {
        self.import_to_node.get(internal).map(String::as_str)
    }
}

/// Resolve every recorded export/import claim against `module`.
///
/// Claims come from the store's per-record list, so a node name declared
/// twice keeps the linkage of both records.
///
/// Fails on the first claim the module cannot satisfy, since that means the
/// graph description is stale relative to the module.
pub fn bind<M: ModuleTables + ?Sized>(store: &NodeStore, module: &M) -> MetaDceResult<LinkageTable> {
    let mut table = LinkageTable::default();

    for (node, export) in store.export_claims() {
        if !module.has_export(export) {
            return Err(MetaDceError::UnresolvedExport {
                node: node.clone(),
                export: export.clone(),
            });
        }
        if let Some(prev) = table.export_to_node.insert(export.clone(), node.clone()) {
            if &prev != node {
                warn!(export = %export, previous = %prev, node = %node, "export claimed by more than one node");
            }
        }
    }

    for (node, import) in store.import_claims() {
        let internal = module
            .resolve_import(&import.module, &import.base)
            .ok_or_else(|| MetaDceError::UnresolvedImport {
                node: node.clone(),
                module: import.module.clone(),
                base: import.base.clone(),
            })?;
        if let Some(prev) = table.import_to_node.insert(internal, node.clone()) {
            if &prev != node {
                warn!(import = %import, previous = %prev, node = %node, "import claimed by more than one node");
            }
        }
    }

    debug!(
        exports = table.export_to_node.len(),
        imports = table.import_to_node.len(),
        "linkage bound"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_graph, LoadOptions};
    use crate::module::{ExportEntry, ExternalKind, ImportEntry, ModuleManifest};
    use serde_json::json;

    fn module() -> ModuleManifest {
        ModuleManifest {
            imports: vec![ImportEntry {
                module: "env".into(),
                base: "log".into(),
                name: "fimport$0".into(),
                kind: ExternalKind::Function,
            }],
            exports: vec![
                ExportEntry {
                    name: "foo".into(),
                    kind: ExternalKind::Function,
                    value: "f0".into(),
                },
                ExportEntry {
                    name: "bar".into(),
                    kind: ExternalKind::Function,
                    value: "f1".into(),
                },
            ],
            debug_names: None,
        }
    }

    fn store(input: serde_json::Value) -> NodeStore {
        load_graph(&input, LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_bind_exports_and_imports() {
        let s = store(json!([
            { "name": "js_foo", "export": "foo" },
            { "name": "js_log", "import": ["env", "log"] },
            { "name": "plain" }
        ]));
        let table = bind(&s, &module()).unwrap();

        assert_eq!(table.node_for_export("foo"), Some("js_foo"));
        assert_eq!(table.node_for_export("bar"), None);
        assert_eq!(table.node_for_import("fimport$0"), Some("js_log"));

        let bound = table.bound_nodes();
        assert!(bound.contains("js_foo"));
        assert!(bound.contains("js_log"));
        assert!(!bound.contains("plain"));
    }

    #[test]
    fn test_unresolved_export() {
        let s = store(json!([{ "name": "n", "export": "missing" }]));
        let err = bind(&s, &module()).unwrap_err();
        assert!(matches!(
            err,
            MetaDceError::UnresolvedExport { ref node, ref export } if node == "n" && export == "missing"
        ));
    }

    #[test]
    fn test_unresolved_import() {
        let s = store(json!([{ "name": "n", "import": ["env", "missing"] }]));
        let err = bind(&s, &module()).unwrap_err();
        assert!(matches!(err, MetaDceError::UnresolvedImport { ref base, .. } if base == "missing"));
    }

    #[test]
    fn test_node_with_both_linkages() {
        let s = store(json!([{ "name": "both", "export": "bar", "import": ["env", "log"] }]));
        let table = bind(&s, &module()).unwrap();
        assert_eq!(table.node_for_export("bar"), Some("both"));
        assert_eq!(table.node_for_import("fimport$0"), Some("both"));
        assert_eq!(table.bound_nodes().len(), 1);
    }

    #[test]
    fn test_later_claim_wins() {
        let s = store(json!([
            { "name": "first", "export": "foo" },
            { "name": "second", "export": "foo" }
        ]));
        let table = bind(&s, &module()).unwrap();
        assert_eq!(table.node_for_export("foo"), Some("second"));
    }

    #[test]
    fn test_repeated_name_keeps_both_claims() {
        let s = store(json!([
            { "name": "a", "export": "foo" },
            { "name": "a", "export": "bar" }
        ]));
        let table = bind(&s, &module()).unwrap();
        assert_eq!(table.node_for_export("foo"), Some("a"));
        assert_eq!(table.node_for_export("bar"), Some("a"));
    }

    #[test]
    fn test_replaced_record_claim_still_resolved() {
        let s = store(json!([
            { "name": "a", "export": "missing" },
            { "name": "a" }
        ]));
        let err = bind(&s, &module()).unwrap_err();
        assert!(matches!(err, MetaDceError::UnresolvedExport { ref export, .. } if export == "missing"));
    }
}
