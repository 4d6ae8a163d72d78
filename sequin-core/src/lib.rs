//! Sequin Core - Chainable query operators over sequences
//!
//! This library wraps any source of values in an [`Enumerable`] and exposes
//! filtering, projection, flattening, ordering, grouping, deduplication,
//! aggregation and slicing over it. Owned sequences run eagerly and stay
//! re-readable; single-pass iterators run lazily and are consumed as they are
//! read.

pub mod config;
pub mod enumerable;
pub mod error;
pub mod observability;

pub use config::{Config, EqualityMode, QueryOptions, DEFAULT_CONFIG};
pub use enumerable::{Cursor, Enumerable, Grouping, IntoIter, Traversal};
pub use error::{CallbackError, SequinError};

/// Result type alias for sequin operations
pub type Result<T> = std::result::Result<T, SequinError>;
