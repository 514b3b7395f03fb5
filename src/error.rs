//! Error types for check execution.
//!
//! Failures fall into a small taxonomy: engine errors surface from traversal
//! execution as-is, `NotFound` is a distinct recognized kind, and `Command` is
//! the uniform domain failure (missing identity, failed clean operation). In
//! human-readable mode nothing is swallowed; in JSON mode the measurement
//! stage converts any of these into a single `success:false` outcome record.

/// Errors raised while building or running a consistency check.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Requested entity or check does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Domain-level command failure (missing identity, failed clean, ...)
    #[error("{0}")]
    Command(String),

    /// Failure reported by the graph engine while executing a traversal
    #[error("graph engine error: {0}")]
    Engine(String),

    /// Outcome record could not be encoded as JSON
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
