//! Typed errors for decoding and display resolution.

use thiserror::Error;

/// Why a length-prefixed token could not be read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenFault {
    /// No separator byte inside the lookahead window.
    #[error("no separator within lookahead window")]
    MissingSeparator,
    /// The bytes before the separator are not a non-negative decimal integer.
    #[error("invalid length prefix {0:?}")]
    InvalidLength(String),
}

/// Errors that abort decoding of a preset.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A token's length prefix was missing or unparsable.
    #[error("malformed token at offset {offset}: {fault}")]
    MalformedToken {
        /// Byte offset where the token read started.
        offset: usize,
        /// What was wrong with it.
        fault: TokenFault,
    },
}

impl DecodeError {
    /// Byte offset in the stream this error relates to.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::MalformedToken { offset, .. } => *offset,
        }
    }
}

/// Errors in the textual command sequence grammar.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// A word that is not any known opcode.
    #[error("unknown opcode {0:?}")]
    UnknownOpcode(String),
    /// A `#*<n>D` opcode whose count is not a decimal integer.
    #[error("invalid count in opcode {0:?}")]
    InvalidCount(String),
}

/// A normalized value that cannot index into an item set.
///
/// Fatal only to the resolution of the one parameter that produced it.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DomainError {
    /// The normalized value is outside `[0, 1]` (or NaN).
    #[error("normalized value {0} is outside [0, 1]")]
    OutOfRange(f64),
    /// The item set to index into is empty.
    #[error("item set is empty")]
    EmptyItems,
}
