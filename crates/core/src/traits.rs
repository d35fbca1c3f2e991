//! Core traits for the storage/broker boundary
//!
//! This module defines the NodeStore trait that node handles use to
//! resolve storage locations and materialize node content. Neither
//! comparison nor equality ever calls into a store.

use crate::error::Result;
use crate::types::{DocumentHandle, NodeId, NodeType, StorageAddress, StoreKind};

/// Materialized content of a single node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeContent {
    /// Node type, read from the store (authoritative)
    pub node_type: NodeType,
    /// Qualified name for elements, attributes and processing instructions
    pub name: Option<String>,
    /// XPath string value
    pub value: String,
}

impl NodeContent {
    /// Content for a node with a name
    pub fn named(node_type: NodeType, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            node_type,
            name: Some(name.into()),
            value: value.into(),
        }
    }

    /// Content for an anonymous node (text, comment, document)
    pub fn anonymous(node_type: NodeType, value: impl Into<String>) -> Self {
        Self {
            node_type,
            name: None,
            value: value.into(),
        }
    }
}

/// Storage abstraction consumed by node handles
///
/// Implementations own the persisted documents. A store answers only for
/// documents of its own [`StoreKind`]; asked about a foreign handle it
/// returns `Error::InvalidComparison`.
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait NodeStore: Send + Sync {
    /// Implementation tag stamped on every document this store registers
    fn kind(&self) -> StoreKind;

    /// Look up the current storage address and type of a node
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` or `NodeNotFound` if the node does not
    /// exist, `InvalidComparison` for a document of another store kind.
    fn resolve(&self, document: DocumentHandle, node: NodeId) -> Result<(StorageAddress, NodeType)>;

    /// Load the content of a node
    ///
    /// # Errors
    ///
    /// Same as [`NodeStore::resolve`].
    fn materialize(&self, document: DocumentHandle, node: NodeId) -> Result<NodeContent>;

    /// String value of a node
    ///
    /// The default implementation materializes the node.
    fn node_value(&self, document: DocumentHandle, node: NodeId) -> Result<String> {
        Ok(self.materialize(document, node)?.value)
    }
}
