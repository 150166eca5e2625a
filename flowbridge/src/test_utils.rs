//! # Test utils
//!
//! <sup>`test_utils`</sup>
//!
//! ⚠️ Do not use at production ⚠️
//!
//! [`MockTransport`] records every primitive requested by a reactor and lets a test report
//! completions by hand. [`RecordingObserver`] records every notification delivered to a sink.
//!
//! # Usage
//!
//! ```rust
//! use flowbridge::prelude::*;
//! use flowbridge::test_utils::{MockTransport, Op, RecordingObserver};
//!
//! let bridge = Bridge::new();
//! let transport = MockTransport::<u32, u32>::new();
//! let requests = Subject::<u32>::new();
//! let responses = RecordingObserver::new();
//!
//! let mock = transport.clone();
//! let call = bridge
//!     .add_bidi_reactor(
//!         CallContext::new("/echo.Echo/Chat"),
//!         move |_, completions| mock.bind(completions),
//!         &requests,
//!         responses.clone(),
//!     )
//!     .unwrap();
//!
//! requests.next(10);
//! transport.complete_read(3);
//! transport.done(Status::ok());
//!
//! assert_eq!(transport.writes(), vec![10]);
//! assert_eq!(responses.values(), vec![3]);
//! assert!(responses.is_completed());
//! assert!(call.is_finished());
//! ```

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

use crate::core::reactor::ReadSlot;
use crate::core::registry::Completions;
use crate::core::rx::{Notification, Observer};
use crate::core::status::Status;
use crate::core::transport::{ClientCall, Reactor, ServerCall, StreamReader, StreamWriter, WritesDone};
use crate::core::utils::lock;

use crate::prelude::*;

/// Primitive requested from [`MockTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op<Out> {
    /// [`ClientCall::start_call`].
    StartCall,
    /// [`ServerCall::send_initial_metadata`].
    SendInitialMetadata,
    /// [`StreamReader::start_read`].
    Read,
    /// [`StreamWriter::start_write`].
    Write(Out),
    /// [`WritesDone::start_writes_done`].
    WritesDone,
    /// [`ServerCall::finish`].
    Finish(Status),
}

/// Transport driven by hand.
///
/// Clones share the same state. Completions are reported on the calling thread, so tests have to
/// report them outside of reactor callbacks, just like a real transport does.
pub struct MockTransport<Out, In> {
    inner: Arc<Mutex<MockState<Out, In>>>,
}

struct MockState<Out, In> {
    completions: Option<Completions>,
    ops: Vec<Op<Out>>,
    armed: Option<ReadSlot<In>>,
    response: Option<ReadSlot<In>>,
    writes_in_flight: usize,
    max_reads_in_flight: usize,
    max_writes_in_flight: usize,
}

impl<Out, In> MockTransport<Out, In>
where
    Out: Clone + Send + Sync + 'static,
    In: Send + 'static,
{
    /// Creates a transport without a bound call.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                completions: None,
                ops: Vec::new(),
                armed: None,
                response: None,
                writes_in_flight: 0,
                max_reads_in_flight: 0,
                max_writes_in_flight: 0,
            })),
        }
    }

    /// Binds a call and returns a stream which shares state with this transport.
    ///
    /// Use it as a transport method.
    pub fn bind(&self, completions: Completions) -> Self {
        lock(&self.inner).completions = Some(completions);
        self.clone()
    }

    /// Binds a client-streaming call which receives its response into `response`.
    pub fn bind_with_response(&self, response: ReadSlot<In>, completions: Completions) -> Self {
        lock(&self.inner).response = Some(response);
        self.bind(completions)
    }

    /// Requested primitives in order.
    pub fn ops(&self) -> Vec<Op<Out>> {
        lock(&self.inner).ops.clone()
    }

    /// Written messages in order.
    pub fn writes(&self) -> Vec<Out> {
        lock(&self.inner)
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Write(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of requested reads.
    pub fn reads_requested(&self) -> usize {
        lock(&self.inner)
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Read))
            .count()
    }

    /// Returns `true` if a read is in flight.
    pub fn is_read_armed(&self) -> bool {
        lock(&self.inner).armed.is_some()
    }

    /// Number of writes in flight.
    pub fn writes_in_flight(&self) -> usize {
        lock(&self.inner).writes_in_flight
    }

    /// Largest number of simultaneously requested reads.
    pub fn max_reads_in_flight(&self) -> usize {
        lock(&self.inner).max_reads_in_flight
    }

    /// Largest number of simultaneously requested writes.
    pub fn max_writes_in_flight(&self) -> usize {
        lock(&self.inner).max_writes_in_flight
    }

    /// Handle of the bound call.
    pub fn completions(&self) -> Option<Completions> {
        lock(&self.inner).completions.clone()
    }

    /// Delivers an inbound message for the armed read.
    ///
    /// # Panics
    ///
    /// Panics if no read is in flight.
    pub fn complete_read(&self, message: In) {
        let (slot, completions) = self.take_read();
        slot.fill(message);
        completions.on_read_done(true);
    }

    /// Fails the armed read.
    ///
    /// # Panics
    ///
    /// Panics if no read is in flight.
    pub fn fail_read(&self) {
        let (_, completions) = self.take_read();
        completions.on_read_done(false);
    }

    /// Confirms the write in flight.
    ///
    /// # Panics
    ///
    /// Panics if no write is in flight.
    pub fn complete_write(&self) {
        let completions = self.take_write();
        completions.on_write_done(true);
    }

    /// Fails the write in flight.
    ///
    /// # Panics
    ///
    /// Panics if no write is in flight.
    pub fn fail_write(&self) {
        let completions = self.take_write();
        completions.on_write_done(false);
    }

    /// Stores the final response of a client-streaming call.
    ///
    /// # Panics
    ///
    /// Panics if the call was not bound by [`MockTransport::bind_with_response`].
    pub fn respond(&self, message: In) {
        let slot = lock(&self.inner).response.clone();
        slot.expect("call has no response slot").fill(message);
    }

    /// Reports the end of the call.
    ///
    /// # Panics
    ///
    /// Panics if no call is bound.
    pub fn done(&self, status: Status) {
        let completions = self.bound();
        completions.on_done(status);
    }

    fn bound(&self) -> Completions {
        lock(&self.inner)
            .completions
            .clone()
            .expect("no call is bound")
    }

    fn take_read(&self) -> (ReadSlot<In>, Completions) {
        let mut state = lock(&self.inner);
        let slot = state.armed.take().expect("no read in flight");
        let completions = state.completions.clone().expect("no call is bound");
        (slot, completions)
    }

    fn take_write(&self) -> Completions {
        let mut state = lock(&self.inner);
        assert!(state.writes_in_flight > 0, "no write in flight");
        state.writes_in_flight -= 1;
        state.completions.clone().expect("no call is bound")
    }
}

impl<Out, In> ClientCall for MockTransport<Out, In>
where
    Out: Clone + Send + Sync + 'static,
    In: Send + 'static,
{
    fn start_call(&self) {
        lock(&self.inner).ops.push(Op::StartCall);
    }
}

impl<Out, In> WritesDone for MockTransport<Out, In>
where
    Out: Clone + Send + Sync + 'static,
    In: Send + 'static,
{
    fn start_writes_done(&self) {
        lock(&self.inner).ops.push(Op::WritesDone);
    }
}

impl<Out, In> ServerCall for MockTransport<Out, In>
where
    Out: Clone + Send + Sync + 'static,
    In: Send + 'static,
{
    fn send_initial_metadata(&self) {
        lock(&self.inner).ops.push(Op::SendInitialMetadata);
    }

    fn finish(&self, status: Status) {
        lock(&self.inner).ops.push(Op::Finish(status));
    }
}

impl<Out, In> StreamReader<In> for MockTransport<Out, In>
where
    Out: Clone + Send + Sync + 'static,
    In: Send + 'static,
{
    fn start_read(&self, slot: ReadSlot<In>) {
        let mut state = lock(&self.inner);
        state.ops.push(Op::Read);
        let in_flight = if state.armed.is_some() { 2 } else { 1 };
        state.max_reads_in_flight = state.max_reads_in_flight.max(in_flight);
        state.armed = Some(slot);
    }
}

impl<Out, In> StreamWriter<Out> for MockTransport<Out, In>
where
    Out: Clone + Send + Sync + 'static,
    In: Send + 'static,
{
    fn start_write(&self, message: Arc<Out>) {
        let mut state = lock(&self.inner);
        state.ops.push(Op::Write((*message).clone()));
        state.writes_in_flight += 1;
        state.max_writes_in_flight = state.max_writes_in_flight.max(state.writes_in_flight);
    }
}

impl<Out, In> Clone for MockTransport<Out, In> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<Out, In> Default for MockTransport<Out, In>
where
    Out: Clone + Send + Sync + 'static,
    In: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Out: Debug, In> Debug for MockTransport<Out, In> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner);
        f.debug_struct("MockTransport")
            .field("ops", &state.ops)
            .field("read_armed", &state.armed.is_some())
            .field("writes_in_flight", &state.writes_in_flight)
            .finish_non_exhaustive()
    }
}

/// Sink which records every notification.
///
/// Clones share the same record.
pub struct RecordingObserver<T> {
    events: Arc<Mutex<Vec<Notification<T>>>>,
}

impl<T: Clone + Send + 'static> RecordingObserver<T> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Recorded notifications in order.
    pub fn events(&self) -> Vec<Notification<T>> {
        lock(&self.events).clone()
    }

    /// Recorded values in order.
    pub fn values(&self) -> Vec<T> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                Notification::Next(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded terminal notifications.
    pub fn terminal_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| event.is_terminal())
            .count()
    }

    /// Recorded error, if any.
    pub fn error(&self) -> Option<Error> {
        lock(&self.events).iter().find_map(|event| match event {
            Notification::Error(err) => Some(err.clone()),
            _ => None,
        })
    }

    /// Returns `true` if completion was recorded.
    pub fn is_completed(&self) -> bool {
        lock(&self.events)
            .iter()
            .any(|event| matches!(event, Notification::Completed))
    }

    /// Returns `true` if any terminal notification was recorded.
    pub fn is_terminated(&self) -> bool {
        self.terminal_count() > 0
    }
}

impl<T: Send + 'static> Observer<T> for RecordingObserver<T> {
    fn on_next(&mut self, value: T) {
        lock(&self.events).push(Notification::Next(value));
    }

    fn on_error(&mut self, error: Error) {
        lock(&self.events).push(Notification::Error(error));
    }

    fn on_completed(&mut self) {
        lock(&self.events).push(Notification::Completed);
    }
}

impl<T> Clone for RecordingObserver<T> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for RecordingObserver<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingObserver")
            .field("events", &*lock(&self.events))
            .finish()
    }
}
