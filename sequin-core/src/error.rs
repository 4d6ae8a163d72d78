//! Error types for sequin operations

/// Boxed failure raised by a client-supplied callable.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum SequinError {
    #[error("Sequence contains no matching element ({operation})")]
    EmptySequence { operation: &'static str },

    #[error("Index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Keys are not comparable during {operation}")]
    NotComparable { operation: &'static str },

    #[error("Slice step cannot be zero")]
    InvalidStep,

    #[error("Streaming slices need non-negative bounds and step; materialize first")]
    NegativeStreamSlice,

    #[error("Callback failed: {0}")]
    Callback(#[source] CallbackError),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SequinError {
    pub(crate) fn empty(operation: &'static str) -> Self {
        Self::EmptySequence { operation }
    }

    /// True for the condition `first_or_default` is allowed to swallow.
    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Self::EmptySequence { .. })
    }
}
