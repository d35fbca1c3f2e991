//! Document order over node handles
//!
//! Node-set union, intersection and normalization all sort and merge by
//! this order, so it must be a strict total order:
//!
//! 1. Handles of the same document are ordered by node identifier
//!    (pre-order numbering, i.e. document order).
//! 2. Handles of different documents are ordered by document id.
//! 3. Unresolved handles (no document, sentinel identifier) cannot be
//!    ordered and produce `InvalidComparison`.
//! 4. Handles from different store kinds cannot be ordered and produce
//!    `InvalidComparison`.
//!
//! The comparator holds no state and never touches a store.

use crate::error::{Error, Result};
use crate::handle::NodeHandle;
use crate::types::StoreKind;
use std::cmp::Ordering;

/// A checked total order over `T`
pub trait TotalOrder<T: ?Sized> {
    /// Order `a` relative to `b`
    ///
    /// # Errors
    ///
    /// Returns an error if the operands cannot be ordered.
    fn compare(&self, a: &T, b: &T) -> Result<Ordering>;
}

/// Document order comparator
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentOrder;

impl TotalOrder<NodeHandle> for DocumentOrder {
    #[inline]
    fn compare(&self, a: &NodeHandle, b: &NodeHandle) -> Result<Ordering> {
        compare(a, b)
    }
}

/// Document order of two handles
///
/// # Errors
///
/// `InvalidComparison` if either handle is unresolved or the handles come
/// from different store kinds.
pub fn compare(a: &NodeHandle, b: &NodeHandle) -> Result<Ordering> {
    let (Some(da), Some(db)) = (a.document(), b.document()) else {
        return Err(Error::undefined_operand());
    };
    if a.identifier().is_undefined() || b.identifier().is_undefined() {
        return Err(Error::undefined_operand());
    }
    if !da.is_compatible(&db) {
        return Err(Error::incompatible_kinds(da.kind(), db.kind()));
    }
    if da.id() == db.id() {
        Ok(a.identifier().compare(&b.identifier()))
    } else {
        Ok(da.id().cmp(&db.id()))
    }
}

/// Check that every handle can take part in one ordering
///
/// Returns the shared store kind, or `None` for an empty slice.
///
/// # Errors
///
/// `InvalidComparison` on the first unresolved handle or kind mismatch.
pub fn validate<'a, I>(handles: I) -> Result<Option<StoreKind>>
where
    I: IntoIterator<Item = &'a NodeHandle>,
{
    let mut kind: Option<StoreKind> = None;
    for handle in handles {
        let Some(doc) = handle.document() else {
            return Err(Error::undefined_operand());
        };
        if handle.identifier().is_undefined() {
            return Err(Error::undefined_operand());
        }
        match kind {
            None => kind = Some(doc.kind()),
            Some(k) if k != doc.kind() => return Err(Error::incompatible_kinds(k, doc.kind())),
            Some(_) => {}
        }
    }
    Ok(kind)
}

/// Sort handles into document order
///
/// All handles are validated first; once they are known to be comparable
/// the sort runs on the plain `(document, node)` key. The sort is stable,
/// so duplicates keep their relative input order.
///
/// # Errors
///
/// Same as [`validate`]; the slice is left untouched on error.
pub fn sort_document_order(handles: &mut [NodeHandle]) -> Result<()> {
    validate(handles.iter())?;
    handles.sort_by_key(|h| h.sort_key());
    Ok(())
}

/// Ordering panics on handles that cannot be compared
///
/// Use [`compare`] to get an error instead.
impl Ord for NodeHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        match compare(self, other) {
            Ok(ord) => ord,
            Err(e) => panic!("{}", e),
        }
    }
}

impl PartialOrd for NodeHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
