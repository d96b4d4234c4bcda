use std::io;
use thiserror::Error;

/// Configuration failures rejected when a chain is built, before first use.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain has no base component to wrap")]
    MissingBase,
}

/// Failures raised by an individual transform.
///
/// These never escape a chain: a stage that receives a `StageError` from its
/// transform leaves the envelope untouched and reports through the mismatch
/// hook instead.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("corrupt payload: {reason}")]
    Corrupt { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StageError {
    pub fn corrupt<S: ToString>(str: S) -> Self {
        Self::Corrupt { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
