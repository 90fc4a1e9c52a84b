//! Error types for the expenses engine.
//!
//! Every error is fatal: the ledger is a trusted append-only stream and a
//! partial debt table is meaningless, so the first failure stops the run
//! with a diagnostic and no output.

use crate::record::RecordError;
use crate::registry::RegistryError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while processing a ledger.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to read the input or write the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line that does not tokenize into a valid record
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },

    /// A nickname that could not be interned
    #[error("line {line}: {source}")]
    Registry {
        line: usize,
        #[source]
        source: RegistryError,
    },

    /// An operation naming a person nobody introduced
    #[error("line {line}: unknown person {nick:?}")]
    UnknownPerson { line: usize, nick: String },

    /// A close on a person with nothing open in the relevant store
    #[error("line {line}: {nick:?} has no open {store} interval")]
    NoOpenInterval {
        line: usize,
        nick: String,
        store: &'static str,
    },

    /// A resume for a person whose presence is already open
    #[error("line {line}: {nick:?} is already present")]
    AlreadyPresent { line: usize, nick: String },

    /// A purchase at an instant when nobody is obligated
    #[error("line {line}: nobody is obligated at the purchase date")]
    NobodyObligated { line: usize },
}
