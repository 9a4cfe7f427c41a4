//! metadce-core: dead code elimination across a module and its host environment.
//!
//! A module's imports and exports are ordinary nodes in a larger reachability
//! graph that also describes the surrounding environment (for example the JS
//! glue that calls into a wasm module). Computing reachability over the whole
//! graph finds exports and imports that module-local optimizers cannot prove
//! dead, and external entities the host can drop.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use metadce_core::prelude::*;
//!
//! let mut module = ModuleManifest::load(Path::new("app.json"))?;
//! let graph = read_graph_file(Path::new("graph.json"))?;
//! let outcome = MetaDce::new().run(&graph.records, &mut module)?;
//!
//! for export in &outcome.report.removable_exports {
//!     println!("Dead export: {}", export);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`store`]: nodes, edges and roots
//! - [`loader`]: graph description validation and loading
//! - [`module`]: the module boundary and the manifest implementation
//! - [`binder`]: export/import linkage resolution
//! - [`graph`]: validation and multi-source reachability
//! - [`detect`]: removable exports, imports and external nodes
//! - [`fix`]: export/import table surgery
//! - [`builder`]: fluent pipeline API
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `dot` (default): Graphviz rendering of the combined graph

pub mod binder;
pub mod builder;
pub mod config;
pub mod detect;
pub mod error;
pub mod fix;
pub mod graph;
pub mod loader;
pub mod logging;
pub mod module;
pub mod prelude;
pub mod report;
pub mod store;

#[cfg(feature = "dot")]
pub mod visualize;

// Error types
pub use error::{IoResultExt, MetaDceError, MetaDceResult};

// Node store
pub use store::{DceNode, ImportSpec, NodeStore};

// Loading
pub use loader::{graph_digest, load_graph, parse_node, read_graph_file, GraphInput, LoadOptions};

// Module boundary
pub use module::{ExportEntry, ExternalKind, ImportEntry, ModuleManifest, ModuleTables, WriteOptions};

// Binding
pub use binder::{bind, LinkageTable};

// Reachability
pub use graph::{
    build_graph, compute, graph_to_visualizer_json, reachable_from_roots, validate, Reachability,
};

// Pruning
pub use detect::{find_removable, DceReport};
pub use fix::{apply_removals, FixResult};

// Builder API
pub use builder::{DceOutcome, MetaDce};

// Configuration
pub use config::{load_config, load_config_file, MetaDceConfig, OutputConfig};

// Logging
pub use logging::init_structured_logging;

// Reporting
pub use report::{format_plain, print_json, print_plain, report_to_json};

#[cfg(feature = "dot")]
pub use visualize::generate_dot;
