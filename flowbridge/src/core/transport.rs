//! # Transport contracts
//!
//! A streaming transport is consumed through a handful of fire-and-forget primitives. Each
//! primitive is a separate trait, so a transport implements only what its call shapes need:
//!
//! | Primitive                  | Trait                                  |
//! |----------------------------|----------------------------------------|
//! | start call                 | [`ClientCall::start_call`]             |
//! | read next inbound message  | [`StreamReader::start_read`]           |
//! | write outbound message     | [`StreamWriter::start_write`]          |
//! | no more writes (client)    | [`WritesDone::start_writes_done`]      |
//! | initial metadata (server)  | [`ServerCall::send_initial_metadata`]  |
//! | finish call (server)       | [`ServerCall::finish`]                 |
//!
//! Completions travel in the opposite direction through the sealed [`Reactor`] trait. Transports
//! never see reactors directly. Instead, they receive a
//! [`Completions`](crate::core::registry::Completions) handle when a call is bound and report every
//! completion through it from whatever thread they like.
//!
//! Combined traits like [`ClientBidiStream`] are implemented automatically for every type that
//! implements the required primitives.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use crate::core::reactor::ReadSlot;
use crate::core::status::Status;
use crate::core::utils::Sealed;

/// Call initiation context.
///
/// Passed to a transport method when a client call is bound.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    method: String,
    metadata: BTreeMap<String, String>,
    deadline: Option<Instant>,
}

impl CallContext {
    /// Creates a context for a method.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Default::default()
        }
    }

    /// Adds a metadata entry.
    ///
    /// Entries with the same key are replaced.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sets a call deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Method name.
    pub fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Call metadata.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Call deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Starts a client call.
pub trait ClientCall: Send + Sync + 'static {
    /// Starts the call.
    ///
    /// Called once, after the reactor has been registered and before any read or write.
    fn start_call(&self);
}

/// Signals the end of client writes.
pub trait WritesDone: Send + Sync + 'static {
    /// Half-closes the outbound direction of a client call.
    ///
    /// Called at most once and never while a write is in flight.
    fn start_writes_done(&self);
}

/// Server side of a call.
pub trait ServerCall: Send + Sync + 'static {
    /// Sends initial metadata to the remote peer.
    fn send_initial_metadata(&self);

    /// Finishes the call with a status.
    ///
    /// Called at most once and never while a write is in flight. The transport reports the end
    /// of the call with [`Reactor::on_done`] afterwards.
    fn finish(&self, status: Status);
}

/// Reads inbound messages.
pub trait StreamReader<In>: Send + Sync + 'static {
    /// Requests the next inbound message.
    ///
    /// A transport stores the message into `slot` by [`ReadSlot::fill`] and then reports
    /// [`Reactor::on_read_done`] with `true`. At most one read is in flight at any time.
    fn start_read(&self, slot: ReadSlot<In>);
}

/// Writes outbound messages.
pub trait StreamWriter<Out>: Send + Sync + 'static {
    /// Requests a write of an outbound message.
    ///
    /// A message is shared with a reactor until [`Reactor::on_write_done`] is reported. At most one
    /// write is in flight at any time.
    fn start_write(&self, message: Arc<Out>);
}

/// <sup>🔒</sup>
/// Receives transport completions.
///
/// 🔒 This trait is sealed 🔒
///
/// Transports report completions through [`Completions`](crate::core::registry::Completions)
/// which implements this trait. Completions may arrive on any thread, but the transport must
/// never report a completion from within the call which requested the corresponding operation.
pub trait Reactor: Sealed + Send + Sync {
    /// Read requested by [`StreamReader::start_read`] has finished.
    fn on_read_done(&self, ok: bool);

    /// Write requested by [`StreamWriter::start_write`] has finished.
    fn on_write_done(&self, ok: bool);

    /// Call has finished.
    ///
    /// This is the last completion for a call.
    fn on_done(&self, status: Status);
}

/// Transport stream of a client bidirectional call.
pub trait ClientBidiStream<Out, In>:
    ClientCall + WritesDone + StreamReader<In> + StreamWriter<Out>
{
}

impl<T, Out, In> ClientBidiStream<Out, In> for T where
    T: ClientCall + WritesDone + StreamReader<In> + StreamWriter<Out>
{
}

/// Transport stream of a server-streaming call on the client side.
pub trait ClientReadStream<In>: ClientCall + StreamReader<In> {}

impl<T, In> ClientReadStream<In> for T where T: ClientCall + StreamReader<In> {}

/// Transport stream of a client-streaming call on the client side.
pub trait ClientWriteStream<Out>: ClientCall + WritesDone + StreamWriter<Out> {}

impl<T, Out> ClientWriteStream<Out> for T where T: ClientCall + WritesDone + StreamWriter<Out> {}

/// Transport stream of a bidirectional call on the server side.
pub trait ServerBidiStream<Out, In>: ServerCall + StreamReader<In> + StreamWriter<Out> {}

impl<T, Out, In> ServerBidiStream<Out, In> for T where
    T: ServerCall + StreamReader<In> + StreamWriter<Out>
{
}

/// Transport stream of a client-streaming call on the server side.
pub trait ServerReadStream<In>: ServerCall + StreamReader<In> {}

impl<T, In> ServerReadStream<In> for T where T: ServerCall + StreamReader<In> {}

/// Transport stream of a server-streaming call on the server side.
pub trait ServerWriteStream<Out>: ServerCall + StreamWriter<Out> {}

impl<T, Out> ServerWriteStream<Out> for T where T: ServerCall + StreamWriter<Out> {}
