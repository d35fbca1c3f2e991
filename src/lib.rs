//! arbordb - node identity for a native XML database
//!
//! Every node the database hands to a query is a lightweight
//! [`NodeHandle`]: a document, a node identifier, a cached storage
//! address and any full-text matches found on the node. Handles compare
//! in document order without touching storage, so node sets can be
//! sorted, merged and deduplicated cheaply.
//!
//! # Quick Start
//!
//! ```
//! use arbordb::{DocumentBuilder, MemoryStore, NodeSet};
//!
//! let store = MemoryStore::new();
//! let mut doc = DocumentBuilder::new();
//! doc.start_element("PLAY")
//!     .start_element("TITLE").text("Hamlet").end_element()
//!     .end_element();
//! let play = store.store_document("hamlet.xml", doc).unwrap();
//!
//! let mut handles = store.find_elements(play, "TITLE").unwrap();
//! handles.extend(store.find_elements(play, "PLAY").unwrap());
//! let set = NodeSet::from_handles(handles).unwrap();
//!
//! assert_eq!(set.as_slice()[1].node_value(&store).unwrap(), "Hamlet");
//! ```
//!
//! # Architecture
//!
//! - `arbor-core`: identifiers, handles, match annotations, document order
//! - `arbor-storage`: the in-memory node store
//! - `arbor-engine`: configuration, the handle pool, node sets and the
//!   evaluation context

pub use arbor_core::*;
pub use arbor_engine::{
    read_binary, BinaryValue, EngineConfig, EvalContext, NodeHandlePool, NodeSet, PoolStats,
    Subject, CONFIG_FILE_NAME, DBA_ROLE,
};
pub use arbor_storage::{DocumentBuilder, MemoryStore, StoredDocument, StoredNode};
