//! # Flowbridge errors
//!
//! The top-level error is [`Error`]. Errors delivered to a sink at the end of a call are
//! [`Error::Reactor`] wrapping one of [`ReactorError`] variants: the two fixed transport
//! diagnostics and the call-level status reported by the transport.

use std::sync::mpsc;

use crate::core::status::Status;

/// Common result type returned by `flowbridge` functions.
pub type Result<T> = core::result::Result<T, Error>;

/// Result of a blocking receive.
pub type RecvResult<T> = core::result::Result<T, RecvError>;

/// Result of a blocking receive within a timeout.
pub type RecvTimeoutResult<T> = core::result::Result<T, RecvTimeoutError>;

/// Result of a non-blocking receive.
pub type TryRecvResult<T> = core::result::Result<T, TryRecvError>;

/// Errors for `flowbridge`.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// Terminal failure of a streaming call.
    #[error(transparent)]
    Reactor(#[from] ReactorError),

    /// Reactor registry refused to accept a new reactor.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Upstream producer failed.
    #[error("producer failed: {0}")]
    Producer(String),

    /// Producer requires Tokio runtime, but subscription happened outside of it.
    #[error("no Tokio runtime is available")]
    NoRuntime,

    /// Single-use producer has been already subscribed.
    #[error("producer supports only a single subscription")]
    AlreadySubscribed,
}

/// Terminal failures of a reactor.
///
/// These errors are delivered to a sink exactly once. The display text of read and write failures
/// is fixed, while call-level failures display the message provided by the transport.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReactorError {
    /// Transport reported a failed read.
    #[error("read failed")]
    ReadFailed,

    /// Transport reported a failed write.
    #[error("write failed")]
    WriteFailed,

    /// Transport finished the call with non-ok status.
    #[error("{}", .0.message())]
    Call(Status),
}

/// Errors related to reactor registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// All slots of a bounded registry are in use.
    #[error("reactor registry is exhausted: {0} slots in use")]
    Exhausted(usize),

    /// Reactor slot is no longer available.
    #[error("reactor slot is vacant")]
    Vacant,
}

/// Receive error for blocking notification channels.
///
/// Channel has been disconnected and no more notifications will arrive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("receiving on a closed channel")]
pub struct RecvError;

/// Receive error for blocking notification channels with a timeout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecvTimeoutError {
    /// Deadline is reached.
    #[error("timed out waiting on channel")]
    Timeout,
    /// Channel has been disconnected.
    #[error("channel is empty and sending half is closed")]
    Disconnected,
}

/// Non-blocking receive error for notification channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryRecvError {
    /// Channel is currently empty.
    #[error("receiving on an empty channel")]
    Empty,
    /// Channel has been disconnected.
    #[error("receiving on an empty and disconnected channel")]
    Disconnected,
}

impl From<Status> for Error {
    fn from(value: Status) -> Self {
        ReactorError::Call(value).into()
    }
}

impl From<mpsc::RecvError> for RecvError {
    fn from(_: mpsc::RecvError) -> Self {
        RecvError
    }
}

impl From<mpsc::RecvTimeoutError> for RecvTimeoutError {
    fn from(value: mpsc::RecvTimeoutError) -> Self {
        match value {
            mpsc::RecvTimeoutError::Timeout => RecvTimeoutError::Timeout,
            mpsc::RecvTimeoutError::Disconnected => RecvTimeoutError::Disconnected,
        }
    }
}

impl From<mpsc::TryRecvError> for TryRecvError {
    fn from(value: mpsc::TryRecvError) -> Self {
        match value {
            mpsc::TryRecvError::Empty => TryRecvError::Empty,
            mpsc::TryRecvError::Disconnected => TryRecvError::Disconnected,
        }
    }
}
