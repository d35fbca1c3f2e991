//! Core types and traits for arbordb
//!
//! This crate defines node identity, addressing and document order:
//! - DocumentId / DocumentHandle: Process-unique document references
//! - NodeId: Pre-order node numbering; numeric order is document order
//! - StorageAddress / NodeType: Cached resolution hints
//! - MatchAnnotation / Matches: Full-text hits attached to nodes
//! - NodeHandle: The proxy passed around by query evaluation
//! - DocumentOrder: The total order node sets are sorted and merged by
//! - NodeStore: The storage/broker boundary
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod handle;
pub mod matches;
pub mod order;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use handle::{HandleDisplay, NodeHandle};
pub use matches::{MatchAnnotation, Matches, TermOffset};
pub use order::{compare, sort_document_order, validate, DocumentOrder, TotalOrder};
pub use traits::{NodeContent, NodeStore};
pub use types::{DocumentHandle, DocumentId, NodeId, NodeType, StorageAddress, StoreKind};
