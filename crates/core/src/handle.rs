//! Node handles
//!
//! A [`NodeHandle`] stands in for "node N of document D" while a query is
//! evaluated. It is much cheaper to pass around than the node itself: the
//! store is only consulted when a caller explicitly asks for a location or
//! for content.
//!
//! `(document, identifier)` is the identity of the handle. The cached
//! storage address and node type are hints: they are never authoritative,
//! and a cached address goes stale as soon as the store relocates the node.
//! The store does not invalidate handles; callers that keep handles across
//! structural mutations must [`NodeHandle::refresh`] them.

use crate::error::{Error, Result};
use crate::matches::{MatchAnnotation, Matches};
use crate::traits::NodeStore;
use crate::types::{DocumentHandle, DocumentId, NodeId, NodeType, StorageAddress};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Lightweight, reusable reference to a persisted node
///
/// The default value is the unresolved handle: no document, the sentinel
/// identifier, no cached address or type, and no matches. [`NodeHandle::reset`]
/// returns any handle to exactly that state.
#[derive(Debug, Clone, Default)]
pub struct NodeHandle {
    document: Option<DocumentHandle>,
    identifier: NodeId,
    address: Option<StorageAddress>,
    node_type: Option<NodeType>,
    matches: Matches,
}

impl NodeHandle {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Handle for `identifier` in `document`, unresolved
    ///
    /// # Panics
    ///
    /// Panics if `identifier` is [`NodeId::UNDEFINED`].
    pub fn new(document: DocumentHandle, identifier: NodeId) -> Self {
        assert!(
            identifier.is_defined(),
            "NodeHandle::new called with the undefined node identifier"
        );
        NodeHandle {
            document: Some(document),
            identifier,
            address: None,
            node_type: None,
            matches: Matches::new(),
        }
    }

    /// Handle carrying a node type hint, address unresolved
    pub fn with_type_hint(document: DocumentHandle, identifier: NodeId, node_type: NodeType) -> Self {
        let mut handle = Self::new(document, identifier);
        handle.node_type = Some(node_type);
        handle
    }

    /// Handle built right after a store lookup, fully resolved
    pub fn new_with_address(
        document: DocumentHandle,
        identifier: NodeId,
        node_type: NodeType,
        address: StorageAddress,
    ) -> Self {
        let mut handle = Self::new(document, identifier);
        handle.node_type = Some(node_type);
        handle.address = Some(address);
        handle
    }

    /// Independent copy of `other`
    ///
    /// The match list is copied shallowly: both handles share the same
    /// annotation values, but appending to one list does not affect the
    /// other.
    pub fn copy_of(other: &NodeHandle) -> Self {
        other.clone()
    }

    // =========================================================================
    // Reuse
    // =========================================================================

    /// Return to the unresolved default state
    ///
    /// The match list keeps its allocation for the next use.
    pub fn reset(&mut self) {
        self.document = None;
        self.identifier = NodeId::UNDEFINED;
        self.address = None;
        self.node_type = None;
        self.matches.clear();
    }

    /// Point this handle at a different node
    ///
    /// Cached resolution data and matches belong to the previous node and
    /// are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `identifier` is [`NodeId::UNDEFINED`].
    pub fn reassign(&mut self, document: DocumentHandle, identifier: NodeId) {
        assert!(
            identifier.is_defined(),
            "NodeHandle::reassign called with the undefined node identifier"
        );
        self.reset();
        self.document = Some(document);
        self.identifier = identifier;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Owning document, `None` for an unresolved handle
    #[inline]
    pub fn document(&self) -> Option<DocumentHandle> {
        self.document
    }

    /// Id of the owning document
    #[inline]
    pub fn document_id(&self) -> Option<DocumentId> {
        self.document.map(|d| d.id())
    }

    /// Node identifier, [`NodeId::UNDEFINED`] for an unresolved handle
    #[inline]
    pub fn identifier(&self) -> NodeId {
        self.identifier
    }

    /// True if the handle denotes a node
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.document.is_some() && self.identifier.is_defined()
    }

    /// Cached storage address, `None` if not resolved yet
    #[inline]
    pub fn storage_address(&self) -> Option<StorageAddress> {
        self.address
    }

    /// Cached node type hint, `None` if unknown
    #[inline]
    pub fn node_type(&self) -> Option<NodeType> {
        self.node_type
    }

    /// Attached match annotations in insertion order
    #[inline]
    pub fn matches(&self) -> &[MatchAnnotation] {
        self.matches.as_slice()
    }

    /// True if any match annotation is attached
    #[inline]
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Document-order key of a defined handle
    ///
    /// Only meaningful once all handles being ordered are known to share a
    /// store kind.
    #[inline]
    pub fn sort_key(&self) -> Option<(DocumentId, NodeId)> {
        match self.document {
            Some(doc) if self.identifier.is_defined() => Some((doc.id(), self.identifier)),
            _ => None,
        }
    }

    // =========================================================================
    // Match annotations
    // =========================================================================

    /// Append one annotation after the existing ones
    pub fn add_match(&mut self, m: MatchAnnotation) {
        self.matches.push(m);
    }

    /// Append a batch after the existing annotations, keeping batch order
    ///
    /// An empty batch leaves the handle untouched.
    pub fn add_matches(&mut self, ms: &[MatchAnnotation]) {
        self.matches.extend_from_slice(ms);
    }

    /// Move all annotations of `other` to the end of this handle's list
    pub fn absorb_matches(&mut self, other: &mut NodeHandle) {
        self.matches.append(&mut other.matches);
    }

    /// Diagnostic listing of the matched terms, `"<id>: term term "`
    pub fn matches_summary(&self) -> String {
        let mut buf = format!("{}: ", self.identifier);
        for m in &self.matches {
            buf.push_str(m.term());
            buf.push(' ');
        }
        buf
    }

    // =========================================================================
    // Store interaction
    // =========================================================================

    /// Cache a resolution computed by the caller
    pub fn resolve_with(&mut self, address: StorageAddress, node_type: NodeType) {
        self.address = Some(address);
        self.node_type = Some(node_type);
    }

    /// Resolve address and type, asking the store only if not cached
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for an unresolved handle, otherwise whatever the
    /// store reports.
    pub fn resolve(&mut self, store: &dyn NodeStore) -> Result<(StorageAddress, NodeType)> {
        if let (Some(address), Some(node_type)) = (self.address, self.node_type) {
            return Ok((address, node_type));
        }
        self.refresh(store)
    }

    /// Re-resolve from the store, replacing any cached values
    ///
    /// # Errors
    ///
    /// Same as [`NodeHandle::resolve`].
    pub fn refresh(&mut self, store: &dyn NodeStore) -> Result<(StorageAddress, NodeType)> {
        let document = self.require_document()?;
        let (address, node_type) = store.resolve(document, self.identifier)?;
        trace!(
            target: "arbor::handle",
            document = %document,
            node = %self.identifier,
            address = %address,
            "resolved node handle"
        );
        self.resolve_with(address, node_type);
        Ok((address, node_type))
    }

    /// String value of the node, read from the store on every call
    pub fn node_value(&self, store: &dyn NodeStore) -> Result<String> {
        let document = self.require_document()?;
        store.node_value(document, self.identifier)
    }

    /// Display adapter that renders the node's current value via `store`
    pub fn display<'a>(&'a self, store: &'a dyn NodeStore) -> HandleDisplay<'a> {
        HandleDisplay {
            handle: self,
            store,
        }
    }

    fn require_document(&self) -> Result<DocumentHandle> {
        match self.document {
            Some(doc) if self.identifier.is_defined() => Ok(doc),
            _ => Err(Error::invalid_operation("node handle is not assigned to a node")),
        }
    }

    // =========================================================================
    // Equality
    // =========================================================================

    /// Identity comparison
    ///
    /// Two handles are equal iff they name the same document id and node
    /// identifier.
    ///
    /// # Errors
    ///
    /// `InvalidComparison` if either handle is undefined or the handles
    /// come from different store kinds.
    pub fn try_eq(&self, other: &NodeHandle) -> Result<bool> {
        match (self.document, other.document) {
            (Some(a), Some(b)) if self.identifier.is_defined() && other.identifier.is_defined() => {
                if !a.is_compatible(&b) {
                    return Err(Error::incompatible_kinds(a.kind(), b.kind()));
                }
                Ok(a.id() == b.id() && self.identifier == other.identifier)
            }
            _ => Err(Error::undefined_operand()),
        }
    }
}

/// Equality panics when either handle is undefined or the handles come
/// from different store kinds
///
/// Use [`NodeHandle::try_eq`] to get an error instead.
impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        match self.try_eq(other) {
            Ok(eq) => eq,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Eq for NodeHandle {}

impl Hash for NodeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document_id().hash(state);
        self.identifier.hash(state);
    }
}

/// Renders a handle through its store; see [`NodeHandle::display`]
pub struct HandleDisplay<'a> {
    handle: &'a NodeHandle,
    store: &'a dyn NodeStore,
}

impl fmt::Display for HandleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle.node_value(self.store) {
            Ok(value) => f.write_str(&value),
            Err(e) => write!(f, "<{}>", e),
        }
    }
}
