//! Query-facing engine for arbordb
//!
//! This crate sits on top of the node identity layer and the stores:
//! - Configuration: `arbor.toml` loading
//! - Handle pool: reuse of node handles across evaluations
//! - Node sets: document-ordered, duplicate-free results
//! - Evaluation context and built-in functions
//!
//! Stores are reached only through [`arbor_core::NodeStore`]; nothing in
//! here depends on a particular store implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod functions;
pub mod node_set;
pub mod pool;

pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use context::{EvalContext, Subject, DBA_ROLE};
pub use functions::{read_binary, BinaryValue};
pub use node_set::NodeSet;
pub use pool::{NodeHandlePool, PoolStats};
