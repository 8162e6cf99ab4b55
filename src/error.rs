//! Crate error type.
//!
//! Only configuration-time problems are errors. Runtime conditions such as a
//! timeout or an unknown response id are ordinary trial outcomes and are
//! scored, never raised.

use alloc::string::String;

use thiserror::Error;

/// Errors raised while building a screening session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreeningError {
    /// The dictionary cannot supply four unique options per trial.
    #[error("dictionary has {len} entries; at least {required} are required")]
    DictionaryTooSmall {
        /// Entries supplied.
        len: usize,
        /// Minimum entries needed.
        required: usize,
    },

    /// Two dictionary entries share the same id.
    #[error("duplicate dictionary id: {id}")]
    DuplicateEntry {
        /// The repeated id.
        id: String,
    },

    /// A staircase or sequencer setting is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A trial's options are not four unique entries containing the target.
    #[error("malformed trial: {0}")]
    MalformedTrial(&'static str),
}
