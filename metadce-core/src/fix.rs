//! Applies a report to the module's tables.
//!
//! Only table rows are removed. Module-internal code that becomes dead as a
//! result is left for a downstream optimizer.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detect::DceReport;
use crate::module::ModuleTables;

/// Result of a fix operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResult {
    pub exports_removed: Vec<String>,
    pub imports_removed: Vec<String>,
    /// Entries listed in the report that the module no longer had.
    pub missing: Vec<String>,
}

/// Remove every export and import the report lists.
///
/// In dry-run mode nothing is touched and the result lists what would go.
pub fn apply_removals<M: ModuleTables + ?Sized>(
    report: &DceReport,
    module: &mut M,
    dry_run: bool,
) -> FixResult {
    let mut result = FixResult::default();

    for name in &report.removable_exports {
        if dry_run || module.remove_export(name) {
            debug!(export = %name, dry_run, "removing export");
            result.exports_removed.push(name.clone());
        } else {
            warn!(export = %name, "export already absent from module");
            result.missing.push(name.clone());
        }
    }

    for internal in &report.removable_imports {
        if dry_run || module.remove_import(internal) {
            debug!(import = %internal, dry_run, "removing import");
            result.imports_removed.push(internal.clone());
        } else {
            warn!(import = %internal, "import already absent from module");
            result.missing.push(internal.clone());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ExportEntry, ExternalKind, ImportEntry, ModuleManifest};

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

    fn report() -> DceReport {
        DceReport {
            removable_exports: vec!["bar".into()],
            removable_imports: vec!["fimport$0".into()],
            removable_external: vec!["js_only".into()],
        }
    }

    #[test]
    fn test_apply_removals() {
        let mut m = module();
        let result = apply_removals(&report(), &mut m, false);

        assert_eq!(result.exports_removed, vec!["bar"]);
        assert_eq!(result.imports_removed, vec!["fimport$0"]);
        assert!(result.missing.is_empty());
        assert!(m.has_export("foo"));
        assert!(!m.has_export("bar"));
        assert!(m.imports.is_empty());
    }

    #[test]
    fn test_dry_run_leaves_module_alone() {
        let mut m = module();
        let result = apply_removals(&report(), &mut m, true);
        assert_eq!(result.exports_removed, vec!["bar"]);
        assert_eq!(m, module());
    }

    #[test]
    fn test_missing_entries_reported() {
        let mut m = module();
        apply_removals(&report(), &mut m, false);
        let again = apply_removals(&report(), &mut m, false);
        assert!(again.exports_removed.is_empty());
        assert_eq!(again.missing, vec!["bar", "fimport$0"]);
    }
}
