//! Full-text match annotations
//!
//! Search evaluation attaches zero or more hits to a node as it produces
//! it. Most nodes carry none or one, so [`Matches`] stores a single
//! annotation inline and only goes to the heap for the second one.
//!
//! ## Ordering convention
//!
//! New annotations are always appended after the existing ones, both for
//! single pushes and for batches. No deduplication is performed.

use crate::types::NodeId;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Position of a matched token inside the node's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermOffset {
    /// Character offset of the token
    pub offset: u32,
    /// Token length in characters
    pub length: u32,
}

impl TermOffset {
    /// Create an offset entry
    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }
}

#[derive(Debug, PartialEq)]
struct MatchInner {
    term: Box<str>,
    node: NodeId,
    offsets: Vec<TermOffset>,
    score: f32,
}

/// One search hit recorded against a node
///
/// Annotations are immutable once built. Cloning shares the underlying
/// value, so copying a handle's match list never deep-copies terms or
/// offsets.
#[derive(Clone, PartialEq)]
pub struct MatchAnnotation(Arc<MatchInner>);

impl MatchAnnotation {
    /// Hit for `term` on `node` with no positional data
    pub fn new(term: impl Into<String>, node: NodeId) -> Self {
        Self::with_offsets(term, node, Vec::new(), 0.0)
    }

    /// Hit carrying token positions and a score
    pub fn with_offsets(
        term: impl Into<String>,
        node: NodeId,
        offsets: Vec<TermOffset>,
        score: f32,
    ) -> Self {
        MatchAnnotation(Arc::new(MatchInner {
            term: term.into().into_boxed_str(),
            node,
            offsets,
            score,
        }))
    }

    /// Matching term
    pub fn term(&self) -> &str {
        &self.0.term
    }

    /// Node the term matched in
    pub fn node(&self) -> NodeId {
        self.0.node
    }

    /// Token positions, possibly empty
    pub fn offsets(&self) -> &[TermOffset] {
        &self.0.offsets
    }

    /// Relevance score; opaque to this crate
    pub fn score(&self) -> f32 {
        self.0.score
    }

    /// True if both values share the same allocation
    pub fn ptr_eq(&self, other: &MatchAnnotation) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MatchAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchAnnotation")
            .field("term", &self.term())
            .field("node", &self.node())
            .field("offsets", &self.offsets().len())
            .field("score", &self.score())
            .finish()
    }
}

/// Insertion-ordered sequence of annotations owned by a node handle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matches(SmallVec<[MatchAnnotation; 1]>);

impl Matches {
    /// Empty sequence; does not allocate
    pub fn new() -> Self {
        Matches(SmallVec::new())
    }

    /// Append one annotation
    #[inline]
    pub fn push(&mut self, m: MatchAnnotation) {
        self.0.push(m);
    }

    /// Append a batch, preserving its order, after the existing entries
    ///
    /// Reserves once for the whole batch. An empty batch is a no-op.
    pub fn extend_from_slice(&mut self, ms: &[MatchAnnotation]) {
        if ms.is_empty() {
            return;
        }
        self.0.reserve(ms.len());
        self.0.extend(ms.iter().cloned());
    }

    /// Move every annotation of `other` to the end of `self`
    pub fn append(&mut self, other: &mut Matches) {
        if other.0.is_empty() {
            return;
        }
        if self.0.is_empty() {
            std::mem::swap(&mut self.0, &mut other.0);
            return;
        }
        self.0.reserve(other.0.len());
        self.0.extend(other.0.drain(..));
    }

    /// Annotations in insertion order
    #[inline]
    pub fn as_slice(&self) -> &[MatchAnnotation] {
        &self.0
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, MatchAnnotation> {
        self.0.iter()
    }

    /// Number of annotations
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no annotations
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove all annotations
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// True once the sequence has outgrown its inline slot
    pub fn spilled(&self) -> bool {
        self.0.spilled()
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a MatchAnnotation;
    type IntoIter = std::slice::Iter<'a, MatchAnnotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
