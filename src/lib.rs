//! Metadata extraction for versioned workflow directories and templates.
//!
//! ```no_run
//! use std::path::Path;
//! use workflowalizer::{ExtractionConfig, extract_workflow};
//!
//! let config = ExtractionConfig::builder().read_nodes().read_connections().build()?;
//! let metadata = extract_workflow(Path::new("Sales Report"), &config)?;
//! for node in metadata.nodes()? {
//!     println!("{} {}", node.id(), node.node_type());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod archive;
pub mod audit;
pub mod builder;
pub mod config;
pub mod error;
mod flatten;
pub mod metadata;
pub mod parse;
pub mod side_files;
pub mod tree;
pub mod version;
mod walk;

pub use builder::IncompleteMetadata;
pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ErrorKind, Result, WorkflowalizerError};
pub use metadata::*;
pub use version::{Era, FormatVersion};
pub use walk::{extract_template, extract_workflow};
