//! Storage-layer node record
//!
//! `NodeContent` is the contract type handed to callers; `StoredNode` is
//! what the store keeps per node, including tree structure and the
//! current physical address.

use arbor_core::{NodeContent, NodeId, NodeType, StorageAddress};

/// A persisted node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNode {
    node_type: NodeType,
    name: Option<Box<str>>,
    value: Box<str>,
    parent: Option<NodeId>,
    /// First identifier after this node's subtree (exclusive bound)
    subtree_end: NodeId,
    address: StorageAddress,
}

impl StoredNode {
    pub(crate) fn new(
        node_type: NodeType,
        name: Option<String>,
        value: String,
        parent: Option<NodeId>,
        subtree_end: NodeId,
        address: StorageAddress,
    ) -> Self {
        StoredNode {
            node_type,
            name: name.map(String::into_boxed_str),
            value: value.into_boxed_str(),
            parent,
            subtree_end,
            address,
        }
    }

    /// Node type
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Qualified name, if the node type has one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Own character content (text, attribute value, comment, PI data)
    pub fn raw_value(&self) -> &str {
        &self.value
    }

    /// Parent node, `None` for the document node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Exclusive upper bound of this node's subtree in pre-order
    pub fn subtree_end(&self) -> NodeId {
        self.subtree_end
    }

    /// Current physical address
    pub fn address(&self) -> StorageAddress {
        self.address
    }

    pub(crate) fn relocate(&mut self, address: StorageAddress) {
        self.address = address;
    }

    /// Convert to the contract type given the node's string value
    pub fn to_content(&self, value: String) -> NodeContent {
        NodeContent {
            node_type: self.node_type,
            name: self.name.as_deref().map(str::to_string),
            value,
        }
    }
}
