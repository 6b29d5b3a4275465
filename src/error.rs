//! Error types for wordtrie

use thiserror::Error;

/// Result type alias for wordtrie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while persisting or loading a trie
///
/// In-memory operations never fail; they report rejection through their
/// `bool`/count return values instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Misaligned trie data: {len} bytes is not a multiple of the {width}-byte record width")]
    Misaligned { len: usize, width: usize },

    #[error("Malformed trie data at record {index}: {reason}")]
    Malformed { index: usize, reason: &'static str },

    #[error("Symbol {value:#x} collides with a reserved record and cannot be encoded")]
    ReservedSymbol { value: u32 },
}

impl Error {
    pub(crate) fn malformed(index: usize, reason: &'static str) -> Self {
        Error::Malformed { index, reason }
    }
}
