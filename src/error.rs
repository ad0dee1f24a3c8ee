//! Errors raised by effectful computations and by the runtime itself

use super::Kind;

use std::sync::Arc;

use thiserror::Error;

/// A specialized `Result` for effectful computations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type flowing through computations, handlers and continuations
///
/// User errors are carried by [`Error::Message`] and [`Error::Custom`].
/// The other variants are raised by the runtime.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// No enclosing handler claimed an effect of this kind
    #[error("unhandled effect `{0}`")]
    Unhandled(Kind),

    /// A continuation was resumed more than once
    #[error("continuation for `{0}` already resumed")]
    AlreadyResumed(Kind),

    /// One party of a rendezvous finished while its peer was still exchanging
    #[error("improper synchronization in round {round}")]
    ImproperSynchronization { round: usize },

    /// An effect was performed by a computation that is not driven by `run`
    #[error("effect performed outside of a running computation")]
    NoContext,

    /// A driver was polled again after it produced its result
    #[error("computation polled after completion")]
    PolledAfterCompletion,

    /// A suspended computation was answered with a value of another type
    #[error("resumed with a value of the wrong type, expected `{expected}`")]
    AnswerType { expected: &'static str },

    /// Discontinuing a computation with `raised` made it fail with another error
    #[error("{raised} (cleanup failed: {cleanup})")]
    Cleanup { raised: Box<Error>, cleanup: Box<Error> },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Custom(Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create an error from a message
    pub fn msg(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// Wrap an arbitrary error
    pub fn custom<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Custom(Arc::new(error))
    }

    /// Returns the kind of the effect if this error reports an unhandled one
    pub fn unhandled_kind(&self) -> Option<&Kind> {
        match self {
            Error::Unhandled(kind) => Some(kind),
            _ => None,
        }
    }
}
