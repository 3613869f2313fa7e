//! Error types shared by every stage of the codec.

use thiserror::Error;

/// Errors produced while reading bits, building codes, or parsing a container.
#[derive(Debug, Error)]
pub enum Error {
    /// A read asked for more bits than the cursor has left.
    #[error("bit underflow: requested {requested} bits but only {remaining} remain")]
    Underflow { requested: usize, remaining: usize },

    /// The encoded stream is structurally invalid.
    #[error("corrupt stream: {0}")]
    Corruption(String),

    /// A generated code would not fit in 64 bits.
    #[error("code for symbol {symbol:#04x} needs {width} bits (limit is 64)")]
    Overflow { symbol: u8, width: usize },

    /// `pop` was called on an empty priority queue.
    #[error("priority queue is empty")]
    EmptyQueue,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }
}
