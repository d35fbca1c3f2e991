//! Core identifier types for arbordb
//!
//! This module defines the foundational value types:
//! - DocumentId: Process-unique document identifier
//! - StoreKind: Which store implementation produced a document
//! - DocumentHandle: Document id tagged with its store kind
//! - NodeId: Document-local node identifier in pre-order numbering
//! - NodeType: DOM node type hint
//! - StorageAddress: Opaque physical location of a persisted node
//!
//! All of these are immutable `Copy` values and can be shared across
//! threads without synchronization.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Unique identifier for a stored document
///
/// Assigned by the store when a document is registered. Ids increase
/// monotonically and are never reused for a different document, so
/// comparing two ids gives a deterministic cross-document order
/// (document creation order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Create a DocumentId from its raw value
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc:{}", self.0)
    }
}

/// Store implementation tag
///
/// Handles produced by different store implementations live in unrelated
/// id spaces. Comparing them is a caller bug.
///
/// These values are part of the on-disk format and MUST NOT change:
/// - Native = 0x01
/// - Memory = 0x02
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StoreKind {
    /// Paged on-disk broker
    Native = 0x01,
    /// In-memory store
    Memory = 0x02,
}

impl StoreKind {
    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(StoreKind::Native),
            0x02 => Some(StoreKind::Memory),
            _ => None,
        }
    }

    /// Lowercase name, used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Native => "native",
            StoreKind::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a stored document
///
/// Many node handles point at the same document; the handle is a small
/// `Copy` value so sharing it costs nothing. The document itself is owned
/// by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHandle {
    id: DocumentId,
    kind: StoreKind,
}

impl DocumentHandle {
    /// Create a handle for document `id` owned by a store of `kind`
    pub const fn new(id: DocumentId, kind: StoreKind) -> Self {
        Self { id, kind }
    }

    /// Document id
    #[inline]
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    /// Store implementation that owns the document
    #[inline]
    pub const fn kind(&self) -> StoreKind {
        self.kind
    }

    /// True if both documents come from the same store implementation
    #[inline]
    pub fn is_compatible(&self, other: &DocumentHandle) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.kind)
    }
}

/// Document-local node identifier
///
/// Identifiers are assigned once, when a node is persisted, by numbering
/// the document tree in pre-order starting at [`NodeId::FIRST`]. Numeric
/// order is therefore document order, and the order of two nodes can be
/// decided without visiting the tree.
///
/// [`NodeId::UNDEFINED`] marks a handle with no node assigned. It is not
/// part of the order: passing it to [`NodeId::compare`] panics.
///
/// The derived `Ord` is the raw numeric order and is only meaningful for
/// defined identifiers; it exists so validated handles can be sorted by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Sentinel: no node assigned
    pub const UNDEFINED: NodeId = NodeId(0);

    /// Identifier of the first node (the document node) of every document
    pub const FIRST: NodeId = NodeId(1);

    /// Create a NodeId from its raw value
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// True for the sentinel
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        self.0 == 0
    }

    /// True for any real identifier
    #[inline]
    pub const fn is_defined(&self) -> bool {
        self.0 != 0
    }

    /// Identifier of the node that follows this one in pre-order
    #[inline]
    pub const fn next(&self) -> NodeId {
        NodeId(self.0 + 1)
    }

    /// Document order of two identifiers of the same document
    ///
    /// # Panics
    ///
    /// Panics if either identifier is [`NodeId::UNDEFINED`].
    #[inline]
    pub fn compare(&self, other: &NodeId) -> Ordering {
        assert!(
            self.is_defined() && other.is_defined(),
            "undefined node identifier passed to NodeId::compare"
        );
        self.0.cmp(&other.0)
    }

    /// True if this node precedes `other` in document order
    ///
    /// # Panics
    ///
    /// Panics if either identifier is [`NodeId::UNDEFINED`].
    #[inline]
    pub fn precedes(&self, other: &NodeId) -> bool {
        self.compare(other) == Ordering::Less
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::UNDEFINED
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            f.write_str("undefined")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Node type hint
///
/// Values are the DOM node type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    /// Element node
    Element = 1,
    /// Attribute node
    Attribute = 2,
    /// Text content
    Text = 3,
    /// CDATA section
    CData = 4,
    /// Processing instruction
    ProcessingInstruction = 7,
    /// Comment
    Comment = 8,
    /// Document node
    Document = 9,
}

impl NodeType {
    /// DOM type code
    pub fn as_code(&self) -> u8 {
        *self as u8
    }

    /// Try to create from a DOM type code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CData),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            _ => None,
        }
    }

    /// True for text and CDATA nodes, whose value contributes to string values
    #[inline]
    pub fn is_character_data(&self) -> bool {
        matches!(self, NodeType::Text | NodeType::CData)
    }

    /// True for node types that may have children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Element | NodeType::Document)
    }
}

/// Physical location of a persisted node
///
/// Packs a page number and a slot within the page as `page << 16 | slot`.
/// The value is opaque outside the store layer and may go stale when the
/// store relocates nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageAddress(u64);

impl StorageAddress {
    /// Number of bits used for the slot
    pub const SLOT_BITS: u32 = 16;

    /// Create an address from page and slot
    pub const fn new(page: u64, slot: u16) -> Self {
        Self((page << Self::SLOT_BITS) | slot as u64)
    }

    /// Create from the packed representation
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Packed representation
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Page number
    #[inline]
    pub const fn page(&self) -> u64 {
        self.0 >> Self::SLOT_BITS
    }

    /// Slot within the page
    #[inline]
    pub const fn slot(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

impl fmt::Display for StorageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page(), self.slot())
    }
}
