//! In-memory node store
//!
//! Keeps every registered document as a pre-order array of [`StoredNode`]s.
//! Because identifiers are assigned in pre-order, a node's identifier is
//! its array position plus one, and a subtree is a contiguous range.
//!
//! # Design
//!
//! - DashMap: sharded document table, lock-free reads
//! - FxHasher: fast non-crypto hash for `DocumentId` keys
//! - AtomicU64: document id and page counters
//!
//! # Addresses
//!
//! Nodes are laid out in fixed-capacity pages. [`MemoryStore::compact_document`]
//! moves a document to fresh pages, which makes every previously handed out
//! address stale. The store does not track outstanding handles; callers
//! re-resolve (see `NodeHandle::refresh`).

use crate::builder::{DocumentBuilder, PendingNode};
use crate::stored_node::StoredNode;
use arbor_core::{
    DocumentHandle, DocumentId, Error, NodeContent, NodeHandle, NodeId, NodeStore, NodeType,
    Result, StorageAddress, StoreKind,
};
use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Default number of node slots per page
pub const DEFAULT_SLOTS_PER_PAGE: u16 = 512;

type FxBuild = BuildHasherDefault<FxHasher>;

/// A registered document
#[derive(Debug)]
pub struct StoredDocument {
    handle: DocumentHandle,
    name: String,
    nodes: Vec<StoredNode>,
}

impl StoredDocument {
    /// Handle of this document
    pub fn handle(&self) -> DocumentHandle {
        self.handle
    }

    /// Name the document was stored under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes, document node included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node by identifier
    pub fn node(&self, id: NodeId) -> Option<&StoredNode> {
        if id.is_undefined() {
            return None;
        }
        self.nodes.get(id.as_u64() as usize - 1)
    }

    /// XPath string value of a node
    ///
    /// Containers concatenate the character data of their subtree in
    /// document order; every other node yields its own content.
    pub fn string_value(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        if !node.node_type().is_container() {
            return Some(node.raw_value().to_string());
        }
        let start = id.as_u64() as usize;
        let end = node.subtree_end().as_u64() as usize - 1;
        let mut value = String::new();
        for child in &self.nodes[start..end] {
            if child.node_type().is_character_data() {
                value.push_str(child.raw_value());
            }
        }
        Some(value)
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..=self.nodes.len() as u64).map(NodeId::new)
    }
}

/// In-memory implementation of [`NodeStore`]
#[derive(Debug)]
pub struct MemoryStore {
    documents: DashMap<DocumentId, StoredDocument, FxBuild>,
    names: DashMap<String, DocumentId, FxBuild>,
    next_document: AtomicU64,
    next_page: AtomicU64,
    slots_per_page: u16,
}

impl MemoryStore {
    /// Empty store with the default page capacity
    pub fn new() -> Self {
        Self::build(DEFAULT_SLOTS_PER_PAGE)
    }

    /// Empty store with `slots_per_page` nodes per page
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if `slots_per_page` is zero.
    pub fn with_page_capacity(slots_per_page: u16) -> Result<Self> {
        if slots_per_page == 0 {
            return Err(Error::invalid_operation("page capacity must be at least one slot"));
        }
        Ok(Self::build(slots_per_page))
    }

    fn build(slots_per_page: u16) -> Self {
        MemoryStore {
            documents: DashMap::with_hasher(FxBuild::default()),
            names: DashMap::with_hasher(FxBuild::default()),
            next_document: AtomicU64::new(1),
            next_page: AtomicU64::new(1),
            slots_per_page,
        }
    }

    // =========================================================================
    // Document lifecycle
    // =========================================================================

    /// Persist a document and assign its identifiers
    ///
    /// The document receives a fresh id; nodes are numbered in pre-order
    /// from [`NodeId::FIRST`]. Storing under an existing name replaces that
    /// document, whose id is retired.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the builder recorded an unbalanced tree.
    pub fn store_document(&self, name: &str, builder: DocumentBuilder) -> Result<DocumentHandle> {
        let pending = builder.finish()?;
        let id = DocumentId::new(self.next_document.fetch_add(1, Ordering::SeqCst));
        let handle = DocumentHandle::new(id, self.kind());
        let addresses = self.allocate(pending.len());
        let nodes = pending
            .into_iter()
            .zip(addresses)
            .map(|(node, address)| Self::persist(node, address))
            .collect::<Vec<_>>();
        let node_count = nodes.len();

        self.documents.insert(
            id,
            StoredDocument {
                handle,
                name: name.to_string(),
                nodes,
            },
        );
        if let Some(previous) = self.names.insert(name.to_string(), id) {
            self.documents.remove(&previous);
            debug!(target: "arbor::store", name, retired = %previous, "replaced document");
        }
        debug!(target: "arbor::store", document = %handle, name, nodes = node_count, "stored document");
        Ok(handle)
    }

    /// Remove a document; its id is never handed out again
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` if the id is not registered.
    pub fn remove_document(&self, id: DocumentId) -> Result<()> {
        let Some((_, doc)) = self.documents.remove(&id) else {
            return Err(Error::DocumentNotFound(id));
        };
        self.names.remove_if(&doc.name, |_, current| *current == id);
        debug!(target: "arbor::store", document = %doc.handle, name = %doc.name, "removed document");
        Ok(())
    }

    /// Move every node of a document to new pages
    ///
    /// Identifiers are unchanged; every storage address changes. Returns
    /// the number of relocated nodes.
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` if the id is not registered.
    pub fn compact_document(&self, id: DocumentId) -> Result<usize> {
        let Some(mut doc) = self.documents.get_mut(&id) else {
            return Err(Error::DocumentNotFound(id));
        };
        let addresses = self.allocate(doc.nodes.len());
        for (node, address) in doc.nodes.iter_mut().zip(addresses) {
            node.relocate(address);
        }
        let relocated = doc.nodes.len();
        debug!(target: "arbor::store", document = %doc.handle, relocated, "compacted document");
        Ok(relocated)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Handle of a registered document
    pub fn document(&self, id: DocumentId) -> Option<DocumentHandle> {
        self.documents.get(&id).map(|doc| doc.handle)
    }

    /// Handle of the document stored under `name`
    pub fn document_by_name(&self, name: &str) -> Option<DocumentHandle> {
        let id = *self.names.get(name)?;
        self.document(id)
    }

    /// Name of a registered document
    pub fn document_name(&self, id: DocumentId) -> Option<String> {
        self.documents.get(&id).map(|doc| doc.name.clone())
    }

    /// Number of registered documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// All node identifiers of a document in document order
    pub fn node_ids(&self, document: DocumentHandle) -> Result<Vec<NodeId>> {
        let doc = self.lookup(document)?;
        Ok(doc.ids().collect())
    }

    /// Resolved handles for every element named `name`, in document order
    pub fn find_elements(&self, document: DocumentHandle, name: &str) -> Result<Vec<NodeHandle>> {
        let doc = self.lookup(document)?;
        Ok(doc
            .ids()
            .zip(doc.nodes.iter())
            .filter(|(_, node)| node.node_type() == NodeType::Element && node.name() == Some(name))
            .map(|(id, node)| {
                NodeHandle::new_with_address(document, id, node.node_type(), node.address())
            })
            .collect())
    }

    /// Parent of a node, `None` for the document node
    pub fn parent(&self, document: DocumentHandle, node: NodeId) -> Result<Option<NodeId>> {
        let doc = self.lookup(document)?;
        Ok(Self::node_in(&doc, node)?.parent())
    }

    /// Direct children of a node in document order, attributes excluded
    pub fn children(&self, document: DocumentHandle, node: NodeId) -> Result<Vec<NodeId>> {
        let doc = self.lookup(document)?;
        let parent = Self::node_in(&doc, node)?;
        let mut children = Vec::new();
        let mut next = node.next();
        while next < parent.subtree_end() {
            let child = &doc.nodes[next.as_u64() as usize - 1];
            if child.node_type() != NodeType::Attribute {
                children.push(next);
            }
            next = child.subtree_end();
        }
        Ok(children)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lookup(&self, document: DocumentHandle) -> Result<Ref<'_, DocumentId, StoredDocument, FxBuild>> {
        if document.kind() != self.kind() {
            warn!(target: "arbor::store", document = %document, "handle from a foreign store");
            return Err(Error::incompatible_kinds(self.kind(), document.kind()));
        }
        self.documents
            .get(&document.id())
            .ok_or(Error::DocumentNotFound(document.id()))
    }

    fn node_in(doc: &StoredDocument, node: NodeId) -> Result<&StoredNode> {
        doc.node(node).ok_or(Error::NodeNotFound {
            document: doc.handle.id(),
            node,
        })
    }

    /// Reserve consecutive slots on fresh pages
    fn allocate(&self, count: usize) -> Vec<StorageAddress> {
        let per_page = self.slots_per_page as usize;
        let pages = count.div_ceil(per_page) as u64;
        let first_page = self.next_page.fetch_add(pages, Ordering::SeqCst);
        (0..count)
            .map(|i| StorageAddress::new(first_page + (i / per_page) as u64, (i % per_page) as u16))
            .collect()
    }

    fn persist(node: PendingNode, address: StorageAddress) -> StoredNode {
        // Builder positions are zero-based; identifiers start at one
        let to_id = |idx: usize| NodeId::new(idx as u64 + 1);
        StoredNode::new(
            node.node_type,
            node.name,
            node.value,
            node.parent.map(to_id),
            to_id(node.subtree_end),
            address,
        )
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    fn resolve(&self, document: DocumentHandle, node: NodeId) -> Result<(StorageAddress, NodeType)> {
        let doc = self.lookup(document)?;
        let stored = Self::node_in(&doc, node)?;
        Ok((stored.address(), stored.node_type()))
    }

    fn materialize(&self, document: DocumentHandle, node: NodeId) -> Result<NodeContent> {
        let doc = self.lookup(document)?;
        let stored = Self::node_in(&doc, node)?;
        let value = doc.string_value(node).unwrap_or_default();
        Ok(stored.to_content(value))
    }

    fn node_value(&self, document: DocumentHandle, node: NodeId) -> Result<String> {
        let doc = self.lookup(document)?;
        doc.string_value(node).ok_or(Error::NodeNotFound {
            document: document.id(),
            node,
        })
    }
}
