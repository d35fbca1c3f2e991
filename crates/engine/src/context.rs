//! Evaluation context
//!
//! Everything a built-in function needs while a query runs: who is
//! calling, which store the nodes live in, the shared handle pool and the
//! engine configuration.

use crate::config::EngineConfig;
use crate::node_set::NodeSet;
use crate::pool::NodeHandlePool;
use arbor_core::{DocumentHandle, Error, NodeHandle, NodeId, NodeStore, Result};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::error;

/// Role name granting administrative rights
pub const DBA_ROLE: &str = "dba";

/// Acting principal of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    name: String,
    roles: BTreeSet<String>,
}

impl Subject {
    /// Principal with no roles
    pub fn new(name: impl Into<String>) -> Self {
        Subject {
            name: name.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Principal holding the DBA role
    pub fn dba(name: impl Into<String>) -> Self {
        Self::new(name).with_role(DBA_ROLE)
    }

    /// Add a role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Principal name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role names, sorted
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    /// True if the principal holds `role`
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// True if the principal holds the DBA role
    pub fn has_dba_role(&self) -> bool {
        self.has_role(DBA_ROLE)
    }
}

/// Per-query evaluation state
///
/// Cloning is cheap; the store and pool are shared.
#[derive(Clone)]
pub struct EvalContext {
    subject: Subject,
    store: Arc<dyn NodeStore>,
    pool: Arc<NodeHandlePool>,
    config: EngineConfig,
}

impl EvalContext {
    /// Context with a fresh pool built from `config`
    pub fn new(subject: Subject, store: Arc<dyn NodeStore>, config: EngineConfig) -> Self {
        let pool = Arc::new(NodeHandlePool::from_config(&config));
        Self::with_pool(subject, store, pool, config)
    }

    /// Context sharing an existing pool
    pub fn with_pool(
        subject: Subject,
        store: Arc<dyn NodeStore>,
        pool: Arc<NodeHandlePool>,
        config: EngineConfig,
    ) -> Self {
        EvalContext {
            subject,
            store,
            pool,
            config,
        }
    }

    /// Context configured from `arbor.toml` in `data_dir`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file is unreadable or invalid.
    pub fn open(subject: Subject, store: Arc<dyn NodeStore>, data_dir: &Path) -> Result<Self> {
        let config = EngineConfig::load_from_dir(data_dir)?;
        Ok(Self::new(subject, store, config))
    }

    /// Same context acting as another principal
    pub fn as_subject(&self, subject: Subject) -> Self {
        EvalContext {
            subject,
            ..self.clone()
        }
    }

    /// Acting principal
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Node store
    pub fn store(&self) -> &dyn NodeStore {
        self.store.as_ref()
    }

    /// Shared handle pool
    pub fn pool(&self) -> &Arc<NodeHandlePool> {
        &self.pool
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Pooled handle for `identifier`, resolved against the store
    ///
    /// # Errors
    ///
    /// Propagates store lookup failures; the handle goes back to the pool.
    pub fn handle(&self, document: DocumentHandle, identifier: NodeId) -> Result<NodeHandle> {
        let mut handle = self.pool.acquire_for(document, identifier);
        match handle.resolve(self.store()) {
            Ok(_) => Ok(handle),
            Err(e) => {
                self.pool.release(handle);
                Err(e)
            }
        }
    }

    /// Normalize handles into a node set using the configured sort threshold
    pub fn node_set(&self, handles: Vec<NodeHandle>) -> Result<NodeSet> {
        NodeSet::from_handles_with(handles, &self.config)
    }

    /// Fail unless the acting principal is a DBA
    ///
    /// # Errors
    ///
    /// `Error::PermissionDenied` naming the principal. The denial is logged.
    pub fn require_dba(&self, function: &str) -> Result<()> {
        if self.subject.has_dba_role() {
            return Ok(());
        }
        let err = Error::PermissionDenied {
            user: self.subject.name.clone(),
        };
        error!(target: "arbor::security", user = %self.subject.name, function, "{}", err);
        Err(err)
    }
}

impl std::fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext")
            .field("subject", &self.subject)
            .field("store", &self.store.kind())
            .field("pool", &self.pool)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_storage::{DocumentBuilder, MemoryStore};

    fn store() -> (Arc<MemoryStore>, DocumentHandle) {
        let store = Arc::new(MemoryStore::new());
        let mut builder = DocumentBuilder::new();
        builder.start_element("a").text("x").end_element();
        let doc = store.store_document("a.xml", builder).unwrap();
        (store, doc)
    }

    #[test]
    fn test_subject_roles() {
        let admin = Subject::dba("admin");
        assert!(admin.has_dba_role());
        assert_eq!(admin.roles().collect::<Vec<_>>(), vec!["dba"]);

        let guest = Subject::new("guest").with_role("reader");
        assert!(!guest.has_dba_role());
        assert!(guest.has_role("reader"));
    }

    #[test]
    fn test_require_dba() {
        let (store, _) = store();
        let ctx = EvalContext::new(Subject::new("guest"), store, EngineConfig::default());
        let err = ctx.require_dba("file:read-binary").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Permission denied, calling user 'guest' must be a DBA to call this function."
        );
        assert!(ctx.as_subject(Subject::dba("admin")).require_dba("file:read-binary").is_ok());
    }

    #[test]
    fn test_handle_resolves_and_failure_recycles() {
        let (store, doc) = store();
        let ctx = EvalContext::new(Subject::new("guest"), store, EngineConfig::default());
        let handle = ctx.handle(doc, NodeId::new(2)).unwrap();
        assert!(handle.storage_address().is_some());

        let before = ctx.pool().len();
        assert!(ctx.handle(doc, NodeId::new(99)).is_err());
        assert_eq!(ctx.pool().len(), before + 1);
    }

    #[test]
    fn test_open_reads_config_from_dir() {
        let (store, _) = store();
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("arbor.toml"), "pool_capacity = 4\npool_warmup = 2\n").unwrap();
        let ctx = EvalContext::open(Subject::new("guest"), store, dir.path()).unwrap();
        assert_eq!(ctx.config().pool_capacity, 4);
        assert_eq!(ctx.pool().len(), 2);
    }
}
