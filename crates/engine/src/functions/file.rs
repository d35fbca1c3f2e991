//! `file:` module
//!
//! Filesystem access from queries. Every function here requires the DBA
//! role.

use crate::context::EvalContext;
use arbor_core::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Qualified name of [`read_binary`]
pub const READ_BINARY: &str = "file:read-binary";

/// Binary item read from the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryValue {
    bytes: Vec<u8>,
}

impl BinaryValue {
    /// Wrap raw bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        BinaryValue { bytes }
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte count
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for an empty file
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `xs:base64Binary` lexical form
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Take the bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Read the contents of a binary file
///
/// `path` is a filesystem path or a `file:` URI.
///
/// # Errors
///
/// - `PermissionDenied` if the calling user is not a DBA
/// - `Io` if the file cannot be read
pub fn read_binary(ctx: &EvalContext, path: &str) -> Result<BinaryValue> {
    ctx.require_dba(READ_BINARY)?;
    let file = to_file_path(path);
    let bytes = std::fs::read(&file)?;
    debug!(target: "arbor::file", path = %file.display(), bytes = bytes.len(), "read binary file");
    Ok(BinaryValue::new(bytes))
}

fn to_file_path(input: &str) -> PathBuf {
    let stripped = input
        .strip_prefix("file://")
        .or_else(|| input.strip_prefix("file:"))
        .unwrap_or(input);
    Path::new(stripped).to_path_buf()
}
