//! Error types for browser operations
//!
//! `FmError` is what every top-level action reports to the command layer.
//! Storage providers report the narrower `StorageError`, which folds into
//! `FmError` at the walker/catalog boundary.

use thiserror::Error;

/// Result type for browser operations
pub type Result<T> = core::result::Result<T, FmError>;

/// Errors surfaced by the browser engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FmError {
    /// Malformed or missing command input
    #[error("bad argument")]
    BadArgument,

    /// Device, file or directory does not exist
    #[error("file or device not found")]
    NotFound,

    /// A path component (or the listing target) is a file
    #[error("not a directory")]
    NotADirectory,

    /// A file was expected but the path names a directory
    #[error("is a directory")]
    IsADirectory,

    /// The medium or filesystem returned an I/O or format error
    #[error("unreadable medium or filesystem")]
    Unreadable,

    /// The active display is below the minimum resolution
    #[error("gfxmode (minimum resolution 1024x768) required")]
    InsufficientDisplay,

    /// An allocation needed by the action could not be satisfied
    #[error("out of memory")]
    AllocationFailure,
}

/// Errors reported by storage providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No provider knows the device label
    #[error("unknown device")]
    UnknownDevice,

    /// Path does not resolve on the device
    #[error("no such file or directory")]
    NotFound,

    /// A path component is a file
    #[error("not a directory")]
    NotADirectory,

    /// Byte read attempted on a directory
    #[error("is a directory")]
    IsADirectory,

    /// Device carries no filesystem the provider understands
    #[error("unknown filesystem")]
    NoFilesystem,

    /// Block-level read failure
    #[error("I/O error")]
    Io,
}

impl From<StorageError> for FmError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnknownDevice | StorageError::NotFound => FmError::NotFound,
            StorageError::NotADirectory => FmError::NotADirectory,
            StorageError::IsADirectory => FmError::IsADirectory,
            StorageError::NoFilesystem | StorageError::Io => FmError::Unreadable,
        }
    }
}
