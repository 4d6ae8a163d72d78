//! Structured log messages for eager steps and traversal hazards.
//!
//! Each message is a small struct with a `Display` impl and a `log` method that
//! picks the level and attaches structured fields. Nothing here prints; a
//! subscriber installed by the host application decides where events go.

use crate::config::QueryOptions;
use std::fmt::{Display, Formatter};

/// A sequence was buffered into memory in full.
///
/// # Log Level
/// `debug!`, or `warn!` once `buffered` exceeds the configured threshold
pub struct Materialized {
    pub operation: &'static str,
    pub buffered: usize,
    pub from_stream: bool,
}

impl Display for Materialized {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let origin = if self.from_stream { "stream" } else { "sequence" };
        write!(
            f,
            "{} buffered {} elements from {}",
            self.operation, self.buffered, origin
        )
    }
}

impl Materialized {
    pub fn log(&self, options: &QueryOptions) {
        let over = options
            .materialize_warn_threshold
            .is_some_and(|limit| self.buffered > limit);

        if over {
            tracing::warn!(
                operation = self.operation,
                buffered = self.buffered,
                from_stream = self.from_stream,
                "{}", self
            );
        } else {
            tracing::debug!(
                operation = self.operation,
                buffered = self.buffered,
                from_stream = self.from_stream,
                "{}", self
            );
        }
    }
}

/// Prefix equality returned true although one side had elements left.
///
/// # Log Level
/// `debug!`
pub struct PrefixMatchOnly {
    pub compared: usize,
}

impl Display for PrefixMatchOnly {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "sequence_equal matched {} elements but lengths differ (prefix mode)",
            self.compared
        )
    }
}

impl PrefixMatchOnly {
    pub fn log(&self) {
        tracing::debug!(compared = self.compared, "{}", self);
    }
}
