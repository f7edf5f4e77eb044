//! Errors reported by the tree, the translation index and the dictionary loader.

use thiserror::Error;

/// A `Result` whose error is this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The structure holds no entries.
    #[error("the dictionary is empty")]
    Empty,

    /// A word is not present in the index.
    #[error("word not found: {0}")]
    NotFound(String),

    /// A key was inserted into the bare tree while already present.
    #[error("key is already present in the tree")]
    DuplicateKey,

    /// A key was removed from the bare tree while absent.
    #[error("key is not present in the tree")]
    MissingKey,

    /// Reading a dictionary failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns an [`Error::NotFound`] for `word`.
    pub fn not_found(word: impl Into<String>) -> Self {
        Error::NotFound(word.into())
    }

    /// Returns `true` if the error reports a caller violating an operation's precondition rather
    /// than a missing or empty lookup target.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, Error::DuplicateKey | Error::MissingKey)
    }
}
