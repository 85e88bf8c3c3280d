//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while building a circuit program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IrError {
    /// The qubit count was already established.
    #[error("Qubit count already set to {current}")]
    QubitCountAlreadySet {
        /// The count set by the first declaration.
        current: u32,
    },

    /// The classical bit count was already established.
    #[error("Classical bit count already set to {current}")]
    ClbitCountAlreadySet {
        /// The count set by the first declaration.
        current: u32,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
