//! Host-boundary error types.
//!
//! Inside the evaluator every failure is an ordinary Error value that
//! propagates like any other result; this module only exists for embedding
//! hosts that want `?`-style handling at the top level.

use thiserror::Error;

/// Errors surfaced to an embedding host by [`crate::interpreter::Interpreter::interpret`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// An Error value reached the top level unhandled; the payload renders
    /// the wrapped reason.
    #[error("runtime error: {0}")]
    Raised(String),
}

impl RuntimeError {
    pub fn raised(reason: impl Into<String>) -> Self {
        Self::Raised(reason.into())
    }
}
