//! Storage layer for arbordb
//!
//! This crate implements the reference node store:
//! - DocumentBuilder: Pre-order recorder for document trees
//! - MemoryStore: DashMap-backed `NodeStore` with paged addresses
//! - StoredNode: Per-node storage record
//!
//! Identifiers are assigned once, when a document is stored, and are
//! never recomputed. Addresses can change (compaction); identifiers cannot.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod memory;
pub mod stored_node;

pub use builder::DocumentBuilder;
pub use memory::{MemoryStore, StoredDocument, DEFAULT_SLOTS_PER_PAGE};
pub use stored_node::StoredNode;
