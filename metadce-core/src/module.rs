//! The module boundary.
//!
//! The pipeline only ever touches a module's import and export tables, through
//! [`ModuleTables`]. [`ModuleManifest`] is the concrete table description the
//! surrounding toolchain hands over; decoding a real binary module into it is
//! that toolchain's concern.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, MetaDceError, MetaDceResult};

/// Read and write access to a module's import/export tables.
pub trait ModuleTables {
    /// All exports as `(exported name, internal id of the exported entity)`.
    fn exports(&self) -> Vec<(String, String)>;

    /// Internal id of the import matching `(module, base)`, if any.
    fn resolve_import(&self, module: &str, base: &str) -> Option<String>;

    /// Remove an export by exported name. Returns whether it existed.
    fn remove_export(&mut self, name: &str) -> bool;

    /// Remove an import by internal id. Returns whether it existed.
    fn remove_import(&mut self, internal: &str) -> bool;

    fn has_export(&self, name: &str) -> bool {
        self.exports().iter().any(|(n, _)| n == name)
    }
}

/// Kind of entity an import or export refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalKind {
    Function,
    Table,
    Memory,
    Global,
    Tag,
}

/// One row of the import table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub module: String,
    pub base: String,
    /// Internal id the module body uses for this import.
    pub name: String,
    pub kind: ExternalKind,
}

/// One row of the export table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Exported symbol.
    pub name: String,
    pub kind: ExternalKind,
    /// Internal id of the exported entity.
    pub value: String,
}

/// Options for serializing a manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Pretty-printed text instead of compact output.
    pub emit_text: bool,
    /// Keep the debug names table.
    pub debug_info: bool,
}

/// Import/export tables of a compiled module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
    #[serde(default)]
    pub imports: Vec<ImportEntry>,
    #[serde(default)]
    pub exports: Vec<ExportEntry>,
    /// Internal id to human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_names: Option<BTreeMap<String, String>>,
}

impl ModuleManifest {
    pub fn from_json_str(s: &str) -> MetaDceResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| MetaDceError::module_format(format!("error in parsing module input: {}", e)))
    }

    pub fn load(path: &Path) -> MetaDceResult<Self> {
        let content = fs::read_to_string(path).with_path(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize the manifest, dropping debug names unless requested.
    pub fn to_json(&self, options: WriteOptions) -> MetaDceResult<String> {
        let stripped;
        let out = if options.debug_info || self.debug_names.is_none() {
            self
        } else {
            stripped = Self {
                debug_names: None,
                ..self.clone()
            };
            &stripped
        };

        let result = if options.emit_text {
            serde_json::to_string_pretty(out)
        } else {
            serde_json::to_string(out)
        };
        result.map_err(|e| MetaDceError::module_format(e.to_string()))
    }

    pub fn write(&self, path: &Path, options: WriteOptions) -> MetaDceResult<()> {
        let json = self.to_json(options)?;
        fs::write(path, json).with_path(path)
    }
}

impl ModuleTables for ModuleManifest {
    fn exports(&self) -> Vec<(String, String)> {
        self.exports
            .iter()
            .map(|e| (e.name.clone(), e.value.clone()))
            .collect()
    }

    fn resolve_import(&self, module: &str, base: &str) -> Option<String> {
        self.imports
            .iter()
            .find(|i| i.module == module && i.base == base)
            .map(|i| i.name.clone())
    }

    fn remove_export(&mut self, name: &str) -> bool {
        let before = self.exports.len();
        self.exports.retain(|e| e.name != name);
        self.exports.len() != before
    }

    fn remove_import(&mut self, internal: &str) -> bool {
        match self.imports.iter().position(|i| i.name == internal) {
            Some(pos) => {
                self.imports.remove(pos);
                true
            }
            None => false,
        }
    }

    fn has_export(&self, name: &str) -> bool {
        self.exports.iter().any(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModuleManifest {
        ModuleManifest::from_json_str(
            r#"{
                "imports": [
                    { "module": "env", "base": "log", "name": "fimport$0", "kind": "function" },
                    { "module": "env", "base": "memory", "name": "mimport$0", "kind": "memory" }
                ],
                "exports": [
                    { "name": "main", "kind": "function", "value": "f0" },
                    { "name": "helper", "kind": "function", "value": "f1" }
                ],
                "debug_names": { "f0": "main", "f1": "helper" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_exports_and_has_export() {
        let m = sample();
        assert_eq!(
            m.exports(),
            vec![
                ("main".to_string(), "f0".to_string()),
                ("helper".to_string(), "f1".to_string())
            ]
        );
        assert!(m.has_export("helper"));
        assert!(!m.has_export("f1"));
    }

    #[test]
    fn test_resolve_import_uses_internal_name() {
        let m = sample();
        assert_eq!(m.resolve_import("env", "log").as_deref(), Some("fimport$0"));
        assert_eq!(m.resolve_import("env", "nope"), None);
        assert_eq!(m.resolve_import("other", "log"), None);
    }

    #[test]
    fn test_remove_tables() {
        let mut m = sample();
        assert!(m.remove_export("helper"));
        assert!(!m.remove_export("helper"));
        assert!(m.remove_import("mimport$0"));
        assert!(!m.remove_import("mimport$0"));
        assert_eq!(m.exports.len(), 1);
        assert_eq!(m.imports.len(), 1);
    }

    #[test]
    fn test_debug_names_stripped_without_debug_info() {
        let m = sample();
        let compact = m.to_json(WriteOptions::default()).unwrap();
        assert!(!compact.contains("debug_names"));
        assert!(!compact.contains('\n'));

        let text = m
            .to_json(WriteOptions {
                emit_text: true,
                debug_info: true,
            })
            .unwrap();
        assert!(text.contains("debug_names"));
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_invalid_manifest() {
        let err = ModuleManifest::from_json_str("{ \"exports\": 3 }").unwrap_err();
        assert!(matches!(err, MetaDceError::ModuleFormat { .. }));
    }

    #[test]
    fn test_missing_tables_default_to_empty() {
        let m = ModuleManifest::from_json_str("{}").unwrap();
        assert!(m.imports.is_empty());
        assert!(m.exports.is_empty());
    }
}
