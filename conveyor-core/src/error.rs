// SPDX-License-Identifier: MIT
//
// Conveyor: Bounded Blocking FIFO Queue for Thread Handoff
// Copyright (c) 2026 Conveyor Contributors
//
// https://github.com/conveyor-rs/conveyor

//! Error types for queue operations
//!
//! Provides a unified error taxonomy using `thiserror`. Every failure a queue
//! operation can surface is one of four kinds, and one raised value is
//! catchable under two classifications at once: natively, by matching the
//! enum (or [`Error::kind`]), and through the conventional error contract
//! (`std::error::Error + Display + Send + Sync + 'static`) that call sites
//! written against a standard queue abstraction already handle.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for queue operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Value magnitude exceeds the representable range of the platform type
    #[error("Overflow error: {0}")]
    Overflow(String),

    /// Value is representable but semantically illegal
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No room to complete an insert within the allowed wait
    #[error("Queue Full")]
    Full,

    /// No item available to complete a removal within the allowed wait
    #[error("Queue Empty")]
    Empty,
}

/// Kind discriminator for [`Error`], for call sites that only need the
/// classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Overflow,
    InvalidArgument,
    Full,
    Empty,
}

impl Error {
    /// Classification of this error, independent of any carried message
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Overflow(_) => ErrorKind::Overflow,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Full => ErrorKind::Full,
            Error::Empty => ErrorKind::Empty,
        }
    }

    /// Check if the error is the backpressure kind a caller may retry
    pub fn would_block(&self) -> bool {
        matches!(self, Error::Full | Error::Empty)
    }

    /// Check if the error reports a malformed argument rather than queue state
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Error::Overflow(_) | Error::InvalidArgument(_))
    }
}

/// Error returned by insert operations, handing the rejected payload back
///
/// Inserts take ownership of their payload, so a failed `put` or `put_many`
/// returns it here. [`into_inner`](PutError::into_inner) recovers the payload;
/// [`error`](PutError::error) exposes the underlying [`Error`].
pub struct PutError<P> {
    payload: P,
    error: Error,
}

impl<P> PutError<P> {
    pub(crate) fn new(payload: P, error: Error) -> Self {
        Self { payload, error }
    }

    /// The underlying error
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Classification of the underlying error
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Recover the payload that failed to be enqueued
    pub fn into_inner(self) -> P {
        self.payload
    }

    /// Split into the rejected payload and the underlying error
    pub fn into_parts(self) -> (P, Error) {
        (self.payload, self.error)
    }
}

impl<P> From<PutError<P>> for Error {
    fn from(err: PutError<P>) -> Self {
        err.error
    }
}

// Payload types are opaque; Debug/Display must not require anything of them.
impl<P> fmt::Debug for PutError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<P> fmt::Display for PutError<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<P> std::error::Error for PutError<P> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_discriminator() {
        assert_eq!(Error::Full.kind(), ErrorKind::Full);
        assert_eq!(Error::Empty.kind(), ErrorKind::Empty);
        assert_eq!(Error::Overflow("x".into()).kind(), ErrorKind::Overflow);
        assert_eq!(
            Error::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::Full.to_string(), "Queue Full");
        assert_eq!(Error::Empty.to_string(), "Queue Empty");
        assert_eq!(
            Error::Overflow("timeout is too large".into()).to_string(),
            "Overflow error: timeout is too large"
        );
        assert!(Error::InvalidArgument("'timeout' must be positive".into())
            .to_string()
            .starts_with("Invalid argument:"));
    }

    #[test]
    fn test_classification_predicates() {
        assert!(Error::Full.would_block());
        assert!(Error::Empty.would_block());
        assert!(!Error::Overflow("x".into()).would_block());
        assert!(Error::InvalidArgument("x".into()).is_argument_error());
        assert!(!Error::Empty.is_argument_error());
    }

    #[test]
    fn test_catchable_under_legacy_contract() {
        // A raised value must work for call sites handling the conventional
        // boxed-error surface as well as for native kind matching.
        fn native() -> Result<()> {
            Err(Error::Full)
        }

        fn host() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            native()?;
            Ok(())
        }

        let err = host().unwrap_err();
        assert_eq!(err.to_string(), "Queue Full");
        let native = err.downcast_ref::<Error>().expect("native type intact");
        assert_eq!(native.kind(), ErrorKind::Full);
    }

    #[test]
    fn test_put_error_returns_payload() {
        let err = PutError::new(vec![1, 2, 3], Error::Full);
        assert_eq!(err.kind(), ErrorKind::Full);
        assert_eq!(err.to_string(), "Queue Full");
        assert_eq!(err.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_put_error_source_chain() {
        use std::error::Error as _;

        let err = PutError::new((), Error::Full);
        let source = err.source().expect("source present");
        assert_eq!(source.to_string(), "Queue Full");

        let flattened: Error = err.into();
        assert_eq!(flattened, Error::Full);
    }
}
