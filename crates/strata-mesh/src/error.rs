//! Error types for the mesh codec

use thiserror::Error;

/// Failures while reading or rewriting a mesh container.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("bad magic: expected 1, found {0}")]
    BadMagic(u32),

    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u32),

    #[error("invalid vertex scale: {0} (must be positive)")]
    InvalidScale(f32),

    #[error("unexpected end of stream at offset {offset}: {needed} more bytes required")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("UV count mismatch: file has {expected} coordinates, caller supplied {found}")]
    CountMismatch { expected: usize, found: usize },
}

/// Result type alias for mesh codec operations
pub type Result<T> = std::result::Result<T, MeshError>;
