use std::path::PathBuf;

use super::ObjectId;

/// Errors raised by the object store, the object codec and the tree builder.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// The string is not a 40 character hex object id.
    #[error("invalid object hash `{0}`: expected 40 hex characters")]
    InvalidHash(String),

    /// No object file exists at the path derived from the id.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// Decompression failed, or the stored bytes disagree with their header or id.
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// Malformed header or entry framing.
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// The buffer ended where a fixed width hash was expected.
    #[error("truncated object: expected {expected} hash bytes, found {found}")]
    TruncatedObject { expected: usize, found: usize },

    /// A file name with no byte form on this platform (non-Unicode on non-unix hosts).
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ObjectResult<T> = Result<T, ObjectError>;
