//! Typed error handling for metadce.
//!
//! Every error raised by the pipeline is a fatal configuration error: the
//! graph description is structurally invalid or disagrees with the module it
//! describes. Nothing is downgraded to a warning, because an under-approximated
//! reachable set would remove live exports.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for metadce operations.
#[derive(Error, Debug)]
pub enum MetaDceError {
    /// The graph description does not have the expected shape.
    ///
    /// `index` is the position of the offending record, when the problem is
    /// local to one record.
    #[error("malformed graph input{}: {message}", fmt_index(.index))]
    MalformedGraphInput {
        index: Option<usize>,
        message: String,
    },

    /// A `root` field is present but is not literally `true`.
    #[error("node '{node}': node.root, if it exists, must be true")]
    InvalidRootMarker { node: String },

    /// A node claims an export the module does not have.
    #[error("node '{node}' claims export '{export}', which the module does not export")]
    UnresolvedExport { node: String, export: String },

    /// A node claims an import the module does not have.
    #[error("node '{node}' claims import '{module}'.'{base}', which the module does not import")]
    UnresolvedImport {
        node: String,
        module: String,
        base: String,
    },

    /// A `reaches` target names no loaded node.
    #[error("node '{from}' reaches '{to}', which is not a node in the graph")]
    DanglingReference { from: String, to: String },

    /// A root names no loaded node.
    #[error("root '{name}' is not a node in the graph")]
    UnknownRoot { name: String },

    /// Two records share a name (strict mode only).
    #[error("duplicate node name '{name}'")]
    DuplicateNodeName { name: String },

    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// The module manifest could not be read or written.
    #[error("Module format error: {message}")]
    ModuleFormat { message: String },
}

fn fmt_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at node #{}", i),
        None => String::new(),
    }
}

impl MetaDceError {
    /// Create a malformed-input error for a specific record.
    pub fn malformed_at(index: usize, message: impl Into<String>) -> Self {
        Self::MalformedGraphInput {
            index: Some(index),
            message: message.into(),
        }
    }

    /// Create a malformed-input error for the document as a whole.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedGraphInput {
            index: None,
            message: message.into(),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a module format error.
    pub fn module_format(message: impl Into<String>) -> Self {
        Self::ModuleFormat {
            message: message.into(),
        }
    }

    /// True for errors that mean the graph description is invalid or stale
    /// relative to the module, as opposed to environment failures.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedGraphInput { .. }
                | Self::InvalidRootMarker { .. }
                | Self::UnresolvedExport { .. }
                | Self::UnresolvedImport { .. }
                | Self::DanglingReference { .. }
                | Self::UnknownRoot { .. }
                | Self::DuplicateNodeName { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for metadce results.
pub type MetaDceResult<T> = Result<T, MetaDceError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> MetaDceResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> MetaDceResult<T> {
        self.map_err(|e| MetaDceError::io(path, e))
    }
}
