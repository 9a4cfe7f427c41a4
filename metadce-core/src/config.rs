//! Configuration loading from metadce.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Name of the config file looked up next to the graph description.
pub const CONFIG_FILE: &str = "metadce.toml";

/// Main configuration structure for metadce.toml.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct MetaDceConfig {
    /// Treat a repeated node name as an error instead of replacing the node.
    pub strict_duplicates: Option<bool>,
    /// Extra root node names, appended after the graph's own roots.
    pub roots: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl MetaDceConfig {
    /// True if the configured report format is JSON.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from `metadce.toml` in `dir` if it exists.
pub fn load_config(dir: &Path) -> Result<Option<MetaDceConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit path.
pub fn load_config_file(path: &Path) -> Result<MetaDceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("metadce_config_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = temp_dir("missing");
        assert!(load_config(&dir).unwrap().is_none());
    }

    #[test]
    fn test_load_config() {
        let dir = temp_dir("full");
        fs::write(
            dir.join(CONFIG_FILE),
            "strict_duplicates = true\nroots = [\"keep_me\"]\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(cfg.strict_duplicates, Some(true));
        assert_eq!(cfg.roots, Some(vec!["keep_me".to_string()]));
        assert!(cfg.wants_json());
    }

    #[test]
    fn test_invalid_config() {
        let dir = temp_dir("invalid");
        fs::write(dir.join(CONFIG_FILE), "strict_duplicates = \"yes\"").unwrap();
        assert!(load_config(&dir).is_err());
    }

    #[test]
    fn test_default_is_plain() {
        assert!(!MetaDceConfig::default().wants_json());
    }
}
