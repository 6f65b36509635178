//! Error types for RES archive operations

use thiserror::Error;

/// Result type for RES archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// RES archive error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural validation failed: the FAT extent does not match the
    /// length of the stream
    #[error("Corrupt archive: FAT describes {expected} bytes, stream has {actual}")]
    Corrupt { expected: u64, actual: u64 },

    /// Entry index past the end of the FAT
    #[error("Entry index {0} is out of range, must be less than {1}")]
    IndexOutOfRange(u32, u32),

    /// No FAT entry carries the requested name
    #[error("No entry named {0:?} in archive")]
    NotFound(String),

    /// Name does not fit the FAT name contract
    #[error(
        "Invalid entry name {0:?}: must be 1-{max} ASCII bytes with no NUL or path separator",
        max = crate::header::MAX_NAME_LEN
    )]
    InvalidName(String),

    /// More entries than the 32-bit wire format can index
    #[error("Too many entries for one archive: {0}")]
    TooManyEntries(usize),

    /// A payload pushes the archive past the 32-bit offset range
    #[error("Payload {name:?} ({size} bytes) exceeds the archive's 32-bit offset range")]
    PayloadTooLarge { name: String, size: u64 },
}
