//! Node handle pool
//!
//! Query evaluation creates and discards node handles at a very high rate.
//! The pool keeps released handles on a free list so their match storage
//! can be reused instead of reallocated.
//!
//! # Locking
//!
//! Only checkout and checkin take the lock. A handle that has been
//! acquired is owned by the caller; no two evaluation contexts can hold
//! the same pooled instance, so comparison and annotation never
//! synchronize.

use crate::config::EngineConfig;
use arbor_core::{DocumentHandle, NodeHandle, NodeId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Pool counters snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Handles handed out by `acquire`
    pub acquired: u64,
    /// Acquisitions served from the free list
    pub reused: u64,
    /// Handles taken back onto the free list
    pub released: u64,
    /// Released handles dropped because the free list was full
    pub dropped: u64,
}

/// Bounded free list of reset node handles
///
/// # Example
///
/// ```
/// use arbor_core::{DocumentHandle, DocumentId, NodeId, StoreKind};
/// use arbor_engine::NodeHandlePool;
///
/// let pool = NodeHandlePool::new(8);
/// let doc = DocumentHandle::new(DocumentId::new(1), StoreKind::Memory);
///
/// let handle = pool.acquire_for(doc, NodeId::new(3));
/// // ... use the handle ...
/// pool.release(handle);
/// assert_eq!(pool.len(), 1);
/// ```
#[derive(Debug)]
pub struct NodeHandlePool {
    free: Mutex<Vec<NodeHandle>>,
    capacity: usize,
    acquired: AtomicU64,
    reused: AtomicU64,
    released: AtomicU64,
    dropped: AtomicU64,
}

impl NodeHandlePool {
    /// Empty pool keeping at most `capacity` idle handles
    pub fn new(capacity: usize) -> Self {
        NodeHandlePool {
            free: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            acquired: AtomicU64::new(0),
            reused: AtomicU64::new(0),
            released: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Pool sized and pre-warmed per configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        let pool = Self::new(config.pool_capacity);
        pool.warmup(config.pool_warmup);
        pool
    }

    /// Take an unresolved handle
    ///
    /// Returns a pooled handle if available, a new default one otherwise.
    /// Either way the handle is indistinguishable from `NodeHandle::default()`.
    pub fn acquire(&self) -> NodeHandle {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        let pooled = self.free.lock().pop();
        match pooled {
            Some(handle) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                handle
            }
            None => NodeHandle::default(),
        }
    }

    /// Take a handle already pointing at `identifier` in `document`
    pub fn acquire_for(&self, document: DocumentHandle, identifier: NodeId) -> NodeHandle {
        let mut handle = self.acquire();
        handle.reassign(document, identifier);
        handle
    }

    /// Return a handle for reuse
    ///
    /// The handle is reset before it goes back on the free list. If the
    /// pool is full it is dropped instead.
    pub fn release(&self, mut handle: NodeHandle) {
        handle.reset();
        let mut free = self.free.lock();
        if free.len() < self.capacity {
            free.push(handle);
            self.released.fetch_add(1, Ordering::Relaxed);
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Return every handle of `handles` for reuse
    pub fn release_all(&self, handles: impl IntoIterator<Item = NodeHandle>) {
        for handle in handles {
            self.release(handle);
        }
    }

    /// Fill the free list up to `count` handles (capped at capacity)
    pub fn warmup(&self, count: usize) {
        let count = count.min(self.capacity);
        let mut free = self.free.lock();
        let current = free.len();
        for _ in current..count {
            free.push(NodeHandle::default());
        }
        if count > current {
            debug!(target: "arbor::pool", added = count - current, "warmed node handle pool");
        }
    }

    /// Number of idle handles
    pub fn len(&self) -> usize {
        self.free.lock().len()
    }

    /// True if no idle handle is available
    pub fn is_empty(&self) -> bool {
        self.free.lock().is_empty()
    }

    /// Maximum number of idle handles
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every idle handle
    pub fn clear(&self) {
        self.free.lock().clear();
    }

    /// Counters since creation
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            acquired: self.acquired.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

impl Default for NodeHandlePool {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
