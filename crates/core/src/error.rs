//! Error types for arbordb
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Comparison and equality failures are contract violations: they are
//! surfaced immediately and never retried.

use crate::types::{DocumentId, NodeId, StoreKind};
use std::io;
use thiserror::Error;

/// Result type alias for arbordb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for arbordb
#[derive(Debug, Error)]
pub enum Error {
    /// Two node handles cannot be ordered or compared for equality
    ///
    /// Raised when either operand carries the sentinel identifier or no
    /// document, or when the operands were produced by incompatible
    /// store implementations.
    #[error("Invalid comparison: {0}")]
    InvalidComparison(String),

    /// Document is not registered with the store (never was, or retired)
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// Node identifier does not exist in the given document
    #[error("Node {node} not found in document {document}")]
    NodeNotFound {
        /// Owning document
        document: DocumentId,
        /// Missing node
        node: NodeId,
    },

    /// The acting principal lacks the role an operation requires
    #[error("Permission denied, calling user '{user}' must be a DBA to call this function.")]
    PermissionDenied {
        /// Name of the acting principal
        user: String,
    },

    /// Invalid operation or state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Configuration could not be loaded or holds an invalid value
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an `InvalidComparison` for handles of different store kinds
    pub fn incompatible_kinds(left: StoreKind, right: StoreKind) -> Self {
        Error::InvalidComparison(format!(
            "cannot compare nodes from different implementations ({} vs {})",
            left, right
        ))
    }

    /// Build an `InvalidComparison` for an undefined (sentinel or reset) operand
    pub fn undefined_operand() -> Self {
        Error::InvalidComparison("cannot compare undefined node handles".to_string())
    }

    /// Build an `InvalidOperation` from any displayable message
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Error::InvalidOperation(msg.into())
    }

    /// Build a `Config` error from any displayable message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True for errors that indicate a caller bug rather than a missing resource
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::InvalidComparison(_) | Error::InvalidOperation(_))
    }
}
