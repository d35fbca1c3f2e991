//! Document-ordered node sets
//!
//! A [`NodeSet`] is the result type of path expressions: duplicate-free
//! and sorted in document order. Construction validates every handle once
//! and then works on plain `(document, node)` keys, so set operations are
//! linear merges.
//!
//! When the same node shows up more than once, the occurrences collapse
//! into one handle carrying all match annotations, earlier occurrences
//! first.

use crate::config::EngineConfig;
use crate::pool::NodeHandlePool;
use arbor_core::{validate, DocumentHandle, Error, NodeHandle, Result, StoreKind};
use rayon::slice::ParallelSliceMut;
use std::cmp::Ordering;
use tracing::warn;

/// Duplicate-free sequence of node handles in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSet {
    nodes: Vec<NodeHandle>,
    kind: Option<StoreKind>,
}

impl NodeSet {
    /// Empty set
    pub fn new() -> Self {
        NodeSet {
            nodes: Vec::new(),
            kind: None,
        }
    }

    /// Normalize arbitrary handles into a node set
    ///
    /// # Errors
    ///
    /// `InvalidComparison` if a handle is unresolved or the handles come
    /// from different store kinds.
    pub fn from_handles(handles: Vec<NodeHandle>) -> Result<Self> {
        Self::from_handles_with(handles, &EngineConfig::default())
    }

    /// Like [`NodeSet::from_handles`], sorting in parallel above the
    /// configured threshold
    pub fn from_handles_with(mut handles: Vec<NodeHandle>, config: &EngineConfig) -> Result<Self> {
        let kind = validate(handles.iter()).inspect_err(|e| {
            warn!(target: "arbor::nodeset", error = %e, "rejected node set input");
        })?;
        if handles.len() >= config.parallel_sort_threshold {
            handles.par_sort_by_key(|h| h.sort_key());
        } else {
            handles.sort_by_key(|h| h.sort_key());
        }
        // `later` is removed when it duplicates `earlier`
        handles.dedup_by(|later, earlier| {
            if later.sort_key() == earlier.sort_key() {
                earlier.absorb_matches(later);
                true
            } else {
                false
            }
        });
        Ok(NodeSet { nodes: handles, kind })
    }

    /// Store kind shared by all members, `None` when empty
    pub fn kind(&self) -> Option<StoreKind> {
        self.kind
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the set has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at position `index` in document order
    pub fn get(&self, index: usize) -> Option<&NodeHandle> {
        self.nodes.get(index)
    }

    /// Iterate in document order
    pub fn iter(&self) -> std::slice::Iter<'_, NodeHandle> {
        self.nodes.iter()
    }

    /// Members in document order
    pub fn as_slice(&self) -> &[NodeHandle] {
        &self.nodes
    }

    /// Take the members
    pub fn into_vec(self) -> Vec<NodeHandle> {
        self.nodes
    }

    /// Distinct documents, in document-id order
    pub fn documents(&self) -> Vec<DocumentHandle> {
        let mut docs: Vec<DocumentHandle> = Vec::new();
        for doc in self.nodes.iter().filter_map(|h| h.document()) {
            if docs.last() != Some(&doc) {
                docs.push(doc);
            }
        }
        docs
    }

    /// Membership test by binary search
    ///
    /// # Errors
    ///
    /// `InvalidComparison` if `handle` is unresolved or of another store kind.
    pub fn contains(&self, handle: &NodeHandle) -> Result<bool> {
        let kind = validate(std::iter::once(handle))?;
        self.check_kind(kind)?;
        let key = handle.sort_key();
        Ok(self.nodes.binary_search_by_key(&key, |h| h.sort_key()).is_ok())
    }

    /// Nodes in either set
    ///
    /// A node present in both keeps this set's handle with the other
    /// set's matches appended.
    pub fn union(&self, other: &NodeSet) -> Result<NodeSet> {
        let kind = self.check_kind(other.kind)?;
        let mut out = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.nodes.len() && j < other.nodes.len() {
            let (a, b) = (&self.nodes[i], &other.nodes[j]);
            match a.sort_key().cmp(&b.sort_key()) {
                Ordering::Less => {
                    out.push(a.clone());
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(b.clone());
                    j += 1;
                }
                Ordering::Equal => {
                    let mut merged = a.clone();
                    merged.add_matches(b.matches());
                    out.push(merged);
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&self.nodes[i..]);
        out.extend_from_slice(&other.nodes[j..]);
        Ok(NodeSet { nodes: out, kind })
    }

    /// Nodes in both sets, carrying the matches of both sides
    pub fn intersection(&self, other: &NodeSet) -> Result<NodeSet> {
        let kind = self.check_kind(other.kind)?;
        let mut out = Vec::with_capacity(self.len().min(other.len()));
        let (mut i, mut j) = (0, 0);
        while i < self.nodes.len() && j < other.nodes.len() {
            let (a, b) = (&self.nodes[i], &other.nodes[j]);
            match a.sort_key().cmp(&b.sort_key()) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    let mut merged = a.clone();
                    merged.add_matches(b.matches());
                    out.push(merged);
                    i += 1;
                    j += 1;
                }
            }
        }
        let kind = if out.is_empty() { None } else { kind };
        Ok(NodeSet { nodes: out, kind })
    }

    /// Nodes of this set that are not in `other`
    pub fn difference(&self, other: &NodeSet) -> Result<NodeSet> {
        self.check_kind(other.kind)?;
        let mut out = Vec::with_capacity(self.len());
        let mut j = 0;
        for a in &self.nodes {
            while j < other.nodes.len() && other.nodes[j].sort_key() < a.sort_key() {
                j += 1;
            }
            if j < other.nodes.len() && other.nodes[j].sort_key() == a.sort_key() {
                continue;
            }
            out.push(a.clone());
        }
        let kind = if out.is_empty() { None } else { self.kind };
        Ok(NodeSet { nodes: out, kind })
    }

    /// Hand every member back to `pool`
    pub fn recycle(self, pool: &NodeHandlePool) {
        pool.release_all(self.nodes);
    }

    fn check_kind(&self, other: Option<StoreKind>) -> Result<Option<StoreKind>> {
        match (self.kind, other) {
            (Some(a), Some(b)) if a != b => Err(Error::incompatible_kinds(a, b)),
            (a, b) => Ok(a.or(b)),
        }
    }
}

impl IntoIterator for NodeSet {
    type Item = NodeHandle;
    type IntoIter = std::vec::IntoIter<NodeHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a NodeHandle;
    type IntoIter = std::slice::Iter<'a, NodeHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
