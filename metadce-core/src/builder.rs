//! Builder pattern API for running the whole pipeline.
//!
//! ```rust,ignore
//! use metadce_core::prelude::*;
//!
//! let mut module = ModuleManifest::load(Path::new("app.json"))?;
//! let graph = read_graph_file(Path::new("graph.json"))?;
//!
//! let outcome = MetaDce::new()
//!     .strict_duplicates(true)
//!     .run(&graph.records, &mut module)?;
//!
//! println!("Removable exports: {:?}", outcome.report.removable_exports);
//! ```

use tracing::{debug, info};

use crate::binder::bind;
use crate::detect::{find_removable, DceReport};
use crate::error::MetaDceResult;
use crate::fix::{apply_removals, FixResult};
use crate::graph::{compute, Reachability};
use crate::loader::{load_graph, LoadOptions};
use crate::module::ModuleTables;
use crate::store::NodeStore;

/// Builder for configuring a meta-DCE run.
#[derive(Debug, Clone, Default)]
pub struct MetaDce {
    /// Reject repeated node names
    strict_duplicates: bool,

    /// Roots added on top of those the graph marks
    extra_roots: Vec<String>,

    /// Compute the report without touching the module
    dry_run: bool,
}

impl MetaDce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat a repeated node name as an error instead of last-write-wins.
    pub fn strict_duplicates(mut self, enabled: bool) -> Self {
        self.strict_duplicates = enabled;
        self
    }

    /// Add root names. They must name nodes in the graph.
    pub fn extra_roots(mut self, roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_roots.extend(roots.into_iter().map(Into::into));
        self
    }

    /// Enable dry-run mode (no module modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Run load, bind, reachability, report and pruning, in that order.
    ///
    /// Every check completes before the module is mutated, so an error
    /// leaves `module` untouched.
    pub fn run<M: ModuleTables + ?Sized>(
        &self,
        records: &serde_json::Value,
        module: &mut M,
    ) -> MetaDceResult<DceOutcome> {
        // 1. Load
        let mut store = load_graph(
            records,
            LoadOptions {
                strict_duplicates: self.strict_duplicates,
            },
        )?;
        for root in &self.extra_roots {
            store.add_root(root.clone());
        }

        // 2. Bind against the module's tables
        let linkage = bind(&store, &*module)?;

        // 3. Validate and traverse
        let reachability = compute(&store)?;

        // 4. Partition
        let report = find_removable(&store, &linkage, &reachability, &*module);
        debug!(
            exports = report.removable_exports.len(),
            imports = report.removable_imports.len(),
            external = report.removable_external.len(),
            "report computed"
        );

        // 5. Prune
        let fix = apply_removals(&report, module, self.dry_run);

        info!(
            nodes = store.len(),
            reachable = reachability.len(),
            exports_removed = fix.exports_removed.len(),
            imports_removed = fix.imports_removed.len(),
            dry_run = self.dry_run,
            "meta-DCE complete"
        );

        Ok(DceOutcome {
            report,
            fix,
            store,
            reachability,
        })
    }
}

/// Result of a meta-DCE run.
#[derive(Debug, Clone)]
pub struct DceOutcome {
    /// Sorted removable sets
    pub report: DceReport,

    /// What was actually removed from the module
    pub fix: FixResult,

    /// The loaded graph
    pub store: NodeStore,

    /// Reachable set and discovery order
    pub reachability: Reachability,
}

impl DceOutcome {
    /// Check if anything can be removed.
    pub fn has_removals(&self) -> bool {
        !self.report.is_empty()
    }

    /// Total count of removable entries.
    pub fn removal_count(&self) -> usize {
        self.report.len()
    }

    /// Percentage of graph nodes that are unreachable.
    pub fn dead_percentage(&self) -> f64 {
        let total = self.store.len();
        if total == 0 {
            0.0
        } else {
            ((total - self.reachability.len()) as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetaDceError;
    use crate::module::{ExportEntry, ExternalKind, ModuleManifest};
    use serde_json::json;

    fn module(exports: &[&str]) -> ModuleManifest {
        ModuleManifest {
            exports: exports
                .iter()
                .map(|e| ExportEntry {
                    name: e.to_string(),
                    kind: ExternalKind::Function,
                    value: format!("${}", e),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_builder_basic() {
        let mut m = module(&["myExport", "unusedExport"]);
        let outcome = MetaDce::new()
            .run(
                &json!([
                    { "name": "e1", "reaches": ["e2"], "root": true },
                    { "name": "e2", "export": "myExport" },
                    { "name": "e3", "export": "unusedExport" }
                ]),
                &mut m,
            )
            .unwrap();

        assert_eq!(outcome.report.removable_exports, vec!["unusedExport"]);
        assert_eq!(
            outcome.reachability.reachable.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["e1", "e2"]
        );
        assert!(m.has_export("myExport"));
        assert!(!m.has_export("unusedExport"));
        assert!(outcome.has_removals());
        assert_eq!(outcome.removal_count(), 1);
    }

    #[test]
    fn test_builder_extra_roots() {
        let mut m = module(&["a", "b"]);
        let outcome = MetaDce::new()
            .extra_roots(["nb"])
            .run(
                &json!([
                    { "name": "na", "export": "a" },
                    { "name": "nb", "export": "b" }
                ]),
                &mut m,
            )
            .unwrap();
        assert_eq!(outcome.report.removable_exports, vec!["a"]);
    }

    #[test]
    fn test_builder_dry_run() {
        let mut m = module(&["a"]);
        let outcome = MetaDce::new()
            .dry_run(true)
            .run(&json!([{ "name": "na", "export": "a" }]), &mut m)
            .unwrap();
        assert_eq!(outcome.fix.exports_removed, vec!["a"]);
        assert!(m.has_export("a"));
    }

    #[test]
    fn test_error_leaves_module_untouched() {
        let mut m = module(&["a", "b"]);
        let err = MetaDce::new()
            .run(
                &json!([
                    { "name": "na", "export": "a", "root": true, "reaches": ["nowhere"] }
                ]),
                &mut m,
            )
            .unwrap_err();
        assert!(matches!(err, MetaDceError::DanglingReference { .. }));
        assert_eq!(m, module(&["a", "b"]));
    }

    #[test]
    fn test_dead_percentage() {
        let mut m = module(&[]);
        let outcome = MetaDce::new()
            .run(
                &json!([
                    { "name": "a", "root": true },
                    { "name": "b" },
                    { "name": "c" },
                    { "name": "d" }
                ]),
                &mut m,
            )
            .unwrap();
        assert!((outcome.dead_percentage() - 75.0).abs() < 0.01);
        assert_eq!(outcome.report.removable_external, vec!["b", "c", "d"]);
    }
}
