use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, Weak};

use crate::core::reactor::conf::ReactorConf;
use crate::core::reactor::read_slot::ReadSlot;
use crate::core::reactor::shape::Shape;
use crate::core::reactor::state::{ReactorState, StateCell};
use crate::core::reactor::write_queue::{Confirmed, Enqueued, WriteQueue, WritesEnd};
use crate::core::registry::{ReactorHandle, WeakRegistry};
use crate::core::rx::{Observable, Observer, Subscription};
use crate::core::status::Status;
use crate::core::transport::{
    ClientBidiStream, ClientCall, ClientReadStream, ClientWriteStream, Reactor, ServerBidiStream,
    ServerCall, ServerReadStream, ServerWriteStream, StreamReader, StreamWriter, WritesDone,
};
use crate::core::utils::{lock, Sealed};
use crate::errors::ReactorError;

use crate::prelude::*;

/// Transport primitives available to a reactor.
pub(crate) struct StreamIo<Out, In> {
    side: Side,
    reader: Option<Arc<dyn StreamReader<In>>>,
    writer: Option<Arc<dyn StreamWriter<Out>>>,
}

enum Side {
    Client {
        call: Arc<dyn ClientCall>,
        writes_done: Option<Arc<dyn WritesDone>>,
    },
    Server {
        call: Arc<dyn ServerCall>,
    },
}

/// How a call ends for the sink.
enum Termination<In> {
    Completed,
    Final(In),
    Failed(Error),
    Silent,
}

/// Reactor which bridges a producer and a sink onto a transport stream.
///
/// All call shapes share this type. The [`Shape`] defines which loops run and how the outbound
/// direction is closed.
///
/// Teardown is funneled through [`StreamReactor::terminate`]. The first terminal path wins the
/// state transition, delivers a single terminal event to the sink, releases the subscription and
/// vacates the registry slot. Every other path becomes a no-op.
pub(crate) struct StreamReactor<Out, In, O> {
    handle: ReactorHandle,
    shape: Shape,
    conf: Arc<ReactorConf>,
    state: StateCell,
    registry: WeakRegistry,
    io: StreamIo<Out, In>,
    slot: ReadSlot<In>,
    queue: WriteQueue<Out>,
    sink: Mutex<Option<O>>,
    subscription: Mutex<Option<Subscription>>,
}

/// Feeds producer events into a reactor.
struct WriteObserver<Out, In, O> {
    reactor: Weak<StreamReactor<Out, In, O>>,
}

impl<Out, In> StreamIo<Out, In>
where
    Out: Send + Sync + 'static,
    In: Send + 'static,
{
    pub(crate) fn client_bidi<S: ClientBidiStream<Out, In>>(stream: S) -> Self {
        let stream = Arc::new(stream);
        Self {
            side: Side::Client {
                call: stream.clone(),
                writes_done: Some(stream.clone()),
            },
            reader: Some(stream.clone()),
            writer: Some(stream),
        }
    }

    pub(crate) fn client_read<S: ClientReadStream<In>>(stream: S) -> Self {
        let stream = Arc::new(stream);
        Self {
            side: Side::Client {
                call: stream.clone(),
                writes_done: None,
            },
            reader: Some(stream),
            writer: None,
        }
    }

    pub(crate) fn client_write<S: ClientWriteStream<Out>>(stream: S) -> Self {
        let stream = Arc::new(stream);
        Self {
            side: Side::Client {
                call: stream.clone(),
                writes_done: Some(stream.clone()),
            },
            reader: None,
            writer: Some(stream),
        }
    }

    pub(crate) fn server_bidi<S: ServerBidiStream<Out, In>>(stream: S) -> Self {
        let stream = Arc::new(stream);
        Self {
            side: Side::Server {
                call: stream.clone(),
            },
            reader: Some(stream.clone()),
            writer: Some(stream),
        }
    }

    pub(crate) fn server_write<S: ServerWriteStream<Out>>(stream: S) -> Self {
        let stream = Arc::new(stream);
        Self {
            side: Side::Server {
                call: stream.clone(),
            },
            reader: None,
            writer: Some(stream),
        }
    }

    pub(crate) fn server_read<S: ServerReadStream<In>>(stream: S) -> Self {
        let stream = Arc::new(stream);
        Self {
            side: Side::Server {
                call: stream.clone(),
            },
            reader: Some(stream),
            writer: None,
        }
    }
}

impl<Out, In, O> StreamReactor<Out, In, O>
where
    Out: Send + Sync + 'static,
    In: Send + 'static,
    O: Observer<In>,
{
    pub(crate) fn new(
        handle: ReactorHandle,
        shape: Shape,
        conf: Arc<ReactorConf>,
        registry: WeakRegistry,
        io: StreamIo<Out, In>,
        slot: ReadSlot<In>,
        sink: O,
    ) -> Arc<Self> {
        Arc::new(Self {
            handle,
            shape,
            conf,
            state: StateCell::new(),
            registry,
            io,
            slot,
            queue: WriteQueue::new(),
            sink: Mutex::new(Some(sink)),
            subscription: Mutex::new(None),
        })
    }

    pub(crate) fn state(&self) -> ReactorState {
        self.state.get()
    }

    /// Starts the call and, if the shape reads, arms the first read.
    ///
    /// Returns `false` if the call has ended before it became active.
    pub(crate) fn start(&self) -> bool {
        match &self.io.side {
            Side::Client { call, .. } => call.start_call(),
            Side::Server { call } => {
                if self.conf.sends_initial_metadata() {
                    call.send_initial_metadata();
                }
            }
        }

        if !self.state.activate() {
            log::debug!("[{self:?}] call ended before activation");
            return false;
        }
        log::debug!("[{self:?}] call started");

        if self.shape.reads() {
            self.arm_read();
        }
        true
    }

    /// Subscribes to a producer of outbound messages.
    ///
    /// Disposal of the returned subscription from outside closes the outbound direction.
    pub(crate) fn subscribe<P: Observable<Out>>(self: &Arc<Self>, producer: &P) -> Subscription {
        let subscription = producer.subscribe(WriteObserver {
            reactor: Arc::downgrade(self),
        });

        let reactor = Arc::downgrade(self);
        subscription.add_teardown(move || {
            if let Some(reactor) = reactor.upgrade() {
                reactor.close_writes(WritesEnd::Cancelled);
            }
        });

        self.attach_subscription(subscription.clone());
        subscription
    }

    /// Keeps a call without a producer open until the returned subscription is disposed.
    ///
    /// Disposal closes the empty outbound direction, which finishes a server call with OK status.
    pub(crate) fn hold_open(self: &Arc<Self>) -> Subscription {
        let subscription = Subscription::new();

        let reactor = Arc::downgrade(self);
        subscription.add_teardown(move || {
            if let Some(reactor) = reactor.upgrade() {
                reactor.close_writes(WritesEnd::Completed);
            }
        });

        self.attach_subscription(subscription.clone());
        subscription
    }

    fn attach_subscription(&self, subscription: Subscription) {
        {
            let mut current = lock(&self.subscription);
            if !self.state.get().is_terminal() {
                *current = Some(subscription);
                return;
            }
        }
        log::trace!("[{self:?}] disposing subscription of a terminated call");
        subscription.dispose();
    }

    fn arm_read(&self) {
        if self.state.get() != ReactorState::Active {
            return;
        }
        if let Some(reader) = &self.io.reader {
            reader.start_read(self.slot.clone());
        }
    }

    fn enqueue(&self, message: Out) {
        match self.queue.enqueue(message) {
            Enqueued::Write(message) => self.write(message),
            Enqueued::Queued(ahead) => log::trace!("[{self:?}] message queued behind {ahead}"),
            Enqueued::Dropped => log::trace!("[{self:?}] writes are closed, message dropped"),
        }
    }

    fn write(&self, message: Arc<Out>) {
        if let Some(writer) = &self.io.writer {
            writer.start_write(message);
        }
    }

    fn close_writes(&self, end: WritesEnd) {
        if self.state.get() != ReactorState::Active {
            log::trace!("[{self:?}] ignoring end of writes: {end:?}");
            return;
        }
        match self.queue.close(end) {
            Some(end) => self.finish_writes(end),
            None => log::trace!("[{self:?}] end of writes is deferred or already requested"),
        }
    }

    fn finish_writes(&self, end: WritesEnd) {
        match &self.io.side {
            Side::Client { writes_done, .. } => {
                if let WritesEnd::Failed(err) = &end {
                    log::debug!("[{self:?}] producer failed: {err}");
                }
                if let Some(writes_done) = writes_done {
                    log::debug!("[{self:?}] writes done");
                    writes_done.start_writes_done();
                }
            }
            Side::Server { call } => {
                let status = match end {
                    WritesEnd::Completed => Status::ok(),
                    WritesEnd::Failed(err) => {
                        log::debug!("[{self:?}] producer failed: {err}");
                        self.conf.producer_error_status().clone()
                    }
                    WritesEnd::Cancelled => self.conf.cancelled_status().clone(),
                };
                log::debug!("[{self:?}] finishing call: {status}");
                call.finish(status);
            }
        }
    }

    fn terminate(&self, termination: Termination<In>) {
        let Some(dropped) = self.queue.shutdown_if(|| self.state.begin_terminating()) else {
            log::trace!("[{self:?}] already terminated");
            return;
        };
        log::debug!("[{self:?}] terminating: {}", termination.describe());

        if dropped > 0 {
            log::trace!("[{self:?}] {dropped} pending writes discarded");
        }

        let sink = lock(&self.sink).take();
        if let Some(mut sink) = sink {
            match termination {
                Termination::Completed => sink.on_completed(),
                Termination::Final(message) => {
                    sink.on_next(message);
                    sink.on_completed();
                }
                Termination::Failed(err) => sink.on_error(err),
                Termination::Silent => {}
            }
        }

        let subscription = lock(&self.subscription).take();
        if let Some(subscription) = subscription {
            subscription.dispose();
        }

        self.state.destroy();
        if !self.registry.release(self.handle) {
            log::trace!("[{self:?}] slot is already vacant");
        }
        log::debug!("[{self:?}] destroyed");
    }
}

impl<In> Termination<In> {
    fn describe(&self) -> &'static str {
        match self {
            Termination::Completed => "completed",
            Termination::Final(_) => "completed with response",
            Termination::Failed(_) => "failed",
            Termination::Silent => "silent",
        }
    }
}

impl<Out, In, O> Sealed for StreamReactor<Out, In, O> {}

impl<Out, In, O> Reactor for StreamReactor<Out, In, O>
where
    Out: Send + Sync + 'static,
    In: Send + 'static,
    O: Observer<In>,
{
    fn on_read_done(&self, ok: bool) {
        if self.state.get() != ReactorState::Active {
            log::trace!("[{self:?}] ignoring read completion");
            return;
        }
        if !self.shape.reads() {
            log::warn!("[{self:?}] unexpected read completion");
            return;
        }
        if !ok {
            log::debug!("[{self:?}] read failed");
            self.terminate(Termination::Failed(ReactorError::ReadFailed.into()));
            return;
        }

        let Some(message) = self.slot.take() else {
            log::warn!("[{self:?}] read completed without a message");
            self.terminate(Termination::Failed(ReactorError::ReadFailed.into()));
            return;
        };

        if let Some(sink) = lock(&self.sink).as_mut() {
            sink.on_next(message);
        }
        self.arm_read();
    }

    fn on_write_done(&self, ok: bool) {
        if self.state.get() != ReactorState::Active {
            log::trace!("[{self:?}] ignoring write completion");
            return;
        }
        if !ok {
            log::debug!("[{self:?}] write failed");
            let termination = match self.shape {
                Shape::ServerWrite => Termination::Silent,
                _ => Termination::Failed(ReactorError::WriteFailed.into()),
            };
            self.terminate(termination);
            return;
        }

        match self.queue.confirm() {
            Confirmed::Write(message) => self.write(message),
            Confirmed::Close(end) => self.finish_writes(end),
            Confirmed::Idle => {}
        }
    }

    fn on_done(&self, status: Status) {
        if self.state.get().is_terminal() {
            log::trace!("[{self:?}] ignoring call completion: {status}");
            return;
        }
        log::debug!("[{self:?}] call done: {status}");

        let termination = if !status.is_ok() {
            Termination::Failed(ReactorError::Call(status).into())
        } else if self.shape.has_final_read() {
            match self.slot.take() {
                Some(message) => Termination::Final(message),
                None => {
                    log::warn!("[{self:?}] call finished without a response");
                    Termination::Failed(ReactorError::ReadFailed.into())
                }
            }
        } else {
            Termination::Completed
        };

        self.terminate(termination);
    }
}

impl<Out, In, O> Observer<Out> for WriteObserver<Out, In, O>
where
    Out: Send + Sync + 'static,
    In: Send + 'static,
    O: Observer<In>,
{
    fn on_next(&mut self, value: Out) {
        match self.reactor.upgrade() {
            Some(reactor) => reactor.enqueue(value),
            None => log::trace!("reactor is gone, message dropped"),
        }
    }

    fn on_error(&mut self, error: Error) {
        if let Some(reactor) = self.reactor.upgrade() {
            reactor.close_writes(WritesEnd::Failed(error));
        }
    }

    fn on_completed(&mut self) {
        if let Some(reactor) = self.reactor.upgrade() {
            reactor.close_writes(WritesEnd::Completed);
        }
    }
}

impl<Out, In, O> Debug for StreamReactor<Out, In, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}{:?}", self.conf.name(), self.shape, self.handle)
    }
}
