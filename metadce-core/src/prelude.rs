//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use metadce_core::prelude::*;
//! ```

pub use crate::error::{MetaDceError, MetaDceResult};
pub use crate::store::{DceNode, ImportSpec, NodeStore};

pub use crate::loader::{load_graph, read_graph_file, LoadOptions};
pub use crate::module::{ModuleManifest, ModuleTables, WriteOptions};
pub use crate::binder::{bind, LinkageTable};
pub use crate::graph::{compute, Reachability};
pub use crate::detect::{find_removable, DceReport};
pub use crate::fix::{apply_removals, FixResult};

pub use crate::config::{load_config, MetaDceConfig};
pub use crate::builder::{DceOutcome, MetaDce};
