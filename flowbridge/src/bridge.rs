//! # Bridge
//!
//! [`Bridge`] binds producers and sinks to transport calls. Each binding creates a reactor, puts
//! it into the bridge registry and starts the call:
//!
//! 1. a slot is reserved in the [`ReactorRegistry`],
//! 2. the transport method is called with a [`Completions`] handle of that slot,
//! 3. the reactor is built around the returned stream and placed into the slot,
//! 4. the call is started (client) or initial metadata is sent (server),
//! 5. the first read is armed for shapes that read,
//! 6. the producer is subscribed for shapes that write. Server read calls get a subscription
//!    without a producer instead, its disposal finishes the call.
//!
//! No read or write is requested before the reactor is registered. From that point on the reactor
//! is owned by the registry and destroys itself when the call ends.

use std::sync::Arc;

use crate::core::reactor::{ReactorConf, ReadSlot, Shape, StreamIo, StreamReactor};
use crate::core::registry::{Completions, ReactorHandle, ReactorRegistry};
use crate::core::rx::{Discard, Observable, Observer, Subject, Subscription};
use crate::core::transport::{
    CallContext, ClientBidiStream, ClientReadStream, ClientWriteStream, ServerBidiStream,
    ServerReadStream, ServerWriteStream,
};

use crate::prelude::*;

/// Binds reactive producers and sinks to streaming calls.
///
/// Bridge can be cloned, clones share the same registry and configuration.
///
/// # Usage
///
/// ```rust
/// use flowbridge::prelude::*;
///
/// let bridge = Bridge::builder()
///     .conf(ReactorConf::builder().name("chat").build())
///     .capacity(128)
///     .build();
///
/// assert_eq!(bridge.conf().name(), "chat");
/// assert_eq!(bridge.registry().capacity(), Some(128));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Bridge {
    registry: ReactorRegistry,
    conf: Arc<ReactorConf>,
}

/// Builder for [`Bridge`].
#[derive(Clone, Debug, Default)]
pub struct BridgeBuilder {
    conf: ReactorConf,
    capacity: Option<usize>,
}

/// Handle of a bound call.
///
/// Dropping the handle does not affect the call.
#[derive(Clone, Debug)]
pub struct CallHandle {
    handle: ReactorHandle,
    shape: Shape,
    registry: ReactorRegistry,
    subscription: Option<Subscription>,
}

impl Bridge {
    /// Creates a bridge with default configuration and unbounded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with default settings.
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::default()
    }

    /// Registry of active reactors.
    pub fn registry(&self) -> &ReactorRegistry {
        &self.registry
    }

    /// Reactor configuration.
    pub fn conf(&self) -> &ReactorConf {
        self.conf.as_ref()
    }

    /// Binds a client bidirectional call.
    ///
    /// Messages emitted by `requests` are written in order, inbound messages are delivered to
    /// `responses`. When `requests` finishes, the outbound direction is half-closed.
    pub fn add_bidi_reactor<Out, In, S, M, P, O>(
        &self,
        ctx: CallContext,
        method: M,
        requests: &P,
        responses: O,
    ) -> Result<CallHandle>
    where
        Out: Send + Sync + 'static,
        In: Send + 'static,
        S: ClientBidiStream<Out, In>,
        M: FnOnce(&CallContext, Completions) -> S,
        P: Observable<Out>,
        O: Observer<In>,
    {
        self.bind(
            Shape::ClientBidi,
            |completions, _| StreamIo::client_bidi(method(&ctx, completions)),
            Some(requests),
            responses,
        )
    }

    /// Binds a client side of a server-streaming call.
    ///
    /// The single `request` is handed to the transport method, inbound messages are delivered to
    /// `responses`.
    pub fn add_read_reactor<Req, In, S, M, O>(
        &self,
        ctx: CallContext,
        request: Req,
        method: M,
        responses: O,
    ) -> Result<CallHandle>
    where
        In: Send + 'static,
        S: ClientReadStream<In>,
        M: FnOnce(&CallContext, Req, Completions) -> S,
        O: Observer<In>,
    {
        self.bind(
            Shape::ClientRead,
            |completions, _| StreamIo::<(), In>::client_read(method(&ctx, request, completions)),
            None::<&Subject<()>>,
            responses,
        )
    }

    /// Binds a client side of a client-streaming call.
    ///
    /// Messages emitted by `requests` are written in order. The transport stores the single
    /// response into the provided [`ReadSlot`]. When the call finishes successfully, the response
    /// is delivered to `response` followed by completion.
    pub fn add_write_reactor<Out, In, S, M, P, O>(
        &self,
        ctx: CallContext,
        method: M,
        requests: &P,
        response: O,
    ) -> Result<CallHandle>
    where
        Out: Send + Sync + 'static,
        In: Send + 'static,
        S: ClientWriteStream<Out>,
        M: FnOnce(&CallContext, ReadSlot<In>, Completions) -> S,
        P: Observable<Out>,
        O: Observer<In>,
    {
        self.bind(
            Shape::ClientWrite,
            |completions, slot| StreamIo::client_write(method(&ctx, slot, completions)),
            Some(requests),
            response,
        )
    }

    /// Binds a server side of a bidirectional call.
    ///
    /// Messages emitted by `responses` are written in order, inbound messages are delivered to
    /// `requests`. When `responses` finishes, the call is finished with a status.
    pub fn make_server_bidi_reactor<Out, In, S, M, P, O>(
        &self,
        method: M,
        responses: &P,
        requests: O,
    ) -> Result<CallHandle>
    where
        Out: Send + Sync + 'static,
        In: Send + 'static,
        S: ServerBidiStream<Out, In>,
        M: FnOnce(Completions) -> S,
        P: Observable<Out>,
        O: Observer<In>,
    {
        self.bind(
            Shape::ServerBidi,
            |completions, _| StreamIo::server_bidi(method(completions)),
            Some(responses),
            requests,
        )
    }

    /// Binds a server side of a server-streaming call.
    ///
    /// Messages emitted by `responses` are written in order. When `responses` finishes, the call
    /// is finished with a status. A failed write ends the call without a status.
    pub fn make_server_write_reactor<Out, S, M, P>(
        &self,
        method: M,
        responses: &P,
    ) -> Result<CallHandle>
    where
        Out: Send + Sync + 'static,
        S: ServerWriteStream<Out>,
        M: FnOnce(Completions) -> S,
        P: Observable<Out>,
    {
        self.bind::<Out, (), _, Discard, P>(
            Shape::ServerWrite,
            |completions, _| StreamIo::server_write(method(completions)),
            Some(responses),
            Discard,
        )
    }

    /// Binds a server side of a client-streaming call.
    ///
    /// Inbound messages are delivered to `requests`. The call stays open until
    /// [`CallHandle::cancel_writes`] finishes it with OK status, and ends for `requests` when the
    /// transport reports its completion.
    pub fn make_server_read_reactor<In, S, M, O>(&self, method: M, requests: O) -> Result<CallHandle>
    where
        In: Send + 'static,
        S: ServerReadStream<In>,
        M: FnOnce(Completions) -> S,
        O: Observer<In>,
    {
        self.bind(
            Shape::ServerRead,
            |completions, _| StreamIo::<(), In>::server_read(method(completions)),
            None::<&Subject<()>>,
            requests,
        )
    }

    fn bind<Out, In, F, O, P>(
        &self,
        shape: Shape,
        make_io: F,
        producer: Option<&P>,
        sink: O,
    ) -> Result<CallHandle>
    where
        Out: Send + Sync + 'static,
        In: Send + 'static,
        F: FnOnce(Completions, ReadSlot<In>) -> StreamIo<Out, In>,
        O: Observer<In>,
        P: Observable<Out>,
    {
        let handle = self.registry.reserve()?;
        let slot = ReadSlot::new();
        let io = make_io(self.registry.completions(handle), slot.clone());

        let reactor = StreamReactor::new(
            handle,
            shape,
            self.conf.clone(),
            self.registry.downgrade(),
            io,
            slot,
            sink,
        );
        if let Err(err) = self.registry.activate(handle, reactor.clone()) {
            self.registry.release(handle);
            return Err(err);
        }
        log::debug!("[{reactor:?}] registered");

        let started = reactor.start();
        let subscription = match producer {
            _ if !started => None,
            Some(producer) => Some(reactor.subscribe(producer)),
            None if shape == Shape::ServerRead => Some(reactor.hold_open()),
            None => None,
        };

        Ok(CallHandle {
            handle,
            shape,
            registry: self.registry.clone(),
            subscription,
        })
    }
}

impl BridgeBuilder {
    /// Sets reactor configuration.
    pub fn conf(mut self, conf: ReactorConf) -> Self {
        self.conf = conf;
        self
    }

    /// Limits the number of simultaneously active calls.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Builds [`Bridge`].
    pub fn build(self) -> Bridge {
        let registry = match self.capacity {
            Some(capacity) => ReactorRegistry::bounded(capacity),
            None => ReactorRegistry::new(),
        };
        Bridge {
            registry,
            conf: Arc::new(self.conf),
        }
    }
}

impl CallHandle {
    /// Handle of the reactor slot.
    pub fn handle(&self) -> ReactorHandle {
        self.handle
    }

    /// Call shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns `true` once the reactor is destroyed.
    pub fn is_finished(&self) -> bool {
        !self.registry.contains(self.handle)
    }

    /// Stops consuming the producer and closes the outbound direction.
    ///
    /// In-flight reads and writes are not aborted. The call ends when the transport reports its
    /// completion. Server read calls are finished with OK status. Does nothing for client read
    /// calls.
    pub fn cancel_writes(&self) {
        if let Some(subscription) = &self.subscription {
            subscription.dispose();
        }
    }
}

#[cfg(test)]
mod bridge_tests {
    use super::*;
    use crate::core::reactor::ReactorState;
    use crate::core::rx::Notification;
    use crate::core::status::{Status, StatusCode};
    use crate::core::utils::test::init_logger;
    use crate::errors::{ReactorError, RegistryError};
    use crate::test_utils::{MockTransport, Op, RecordingObserver};

    type Mock = MockTransport<u32, u32>;

    fn bidi(bridge: &Bridge) -> (Mock, Subject<u32>, RecordingObserver<u32>, CallHandle) {
        let transport = Mock::new();
        let requests = Subject::new();
        let responses = RecordingObserver::new();

        let mock = transport.clone();
        let call = bridge
            .add_bidi_reactor(
                CallContext::new("/test/Bidi"),
                move |_, completions| mock.bind(completions),
                &requests,
                responses.clone(),
            )
            .unwrap();

        (transport, requests, responses, call)
    }

    fn server_bidi(bridge: &Bridge) -> (Mock, Subject<u32>, RecordingObserver<u32>, CallHandle) {
        let transport = Mock::new();
        let responses = Subject::new();
        let requests = RecordingObserver::new();

        let mock = transport.clone();
        let call = bridge
            .make_server_bidi_reactor(
                move |completions| mock.bind(completions),
                &responses,
                requests.clone(),
            )
            .unwrap();

        (transport, responses, requests, call)
    }

    fn error_text(observer: &RecordingObserver<u32>) -> String {
        observer.error().map(|err| err.to_string()).unwrap_or_default()
    }

    #[test]
    fn bidi_happy_path() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, requests, responses, call) = bidi(&bridge);

        assert_eq!(transport.ops(), vec![Op::StartCall, Op::Read]);

        for value in [10, 3, 15, 20] {
            requests.next(value);
        }
        assert_eq!(transport.writes(), vec![10]);
        for _ in 0..4 {
            transport.complete_write();
        }
        assert_eq!(transport.writes(), vec![10, 3, 15, 20]);
        assert_eq!(transport.max_writes_in_flight(), 1);

        for value in [3, 5, 2, 1] {
            transport.complete_read(value);
        }
        requests.complete();
        assert_eq!(transport.ops().last(), Some(&Op::WritesDone));

        transport.done(Status::ok());

        assert_eq!(responses.values(), vec![3, 5, 2, 1]);
        assert!(responses.is_completed());
        assert_eq!(responses.terminal_count(), 1);
        assert_eq!(transport.max_reads_in_flight(), 1);
        assert!(call.is_finished());
        assert!(bridge.registry().is_empty());
    }

    #[test]
    fn bidi_write_failure() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, requests, responses, call) = bidi(&bridge);

        requests.next(1);
        requests.next(2);
        transport.fail_write();

        assert_eq!(responses.events().len(), 1);
        assert_eq!(error_text(&responses), "write failed");
        assert!(call.is_finished());

        requests.next(3);
        let ops_after = transport.ops();
        transport.done(Status::ok());
        transport.complete_read(7);

        assert_eq!(transport.ops(), ops_after);
        assert_eq!(transport.writes(), vec![1]);
        assert_eq!(responses.terminal_count(), 1);
        assert_eq!(requests.subscriber_count(), 0);
    }

    #[test]
    fn bidi_read_failure() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, _requests, responses, call) = bidi(&bridge);

        transport.fail_read();

        assert_eq!(responses.events().len(), 1);
        assert_eq!(error_text(&responses), "read failed");
        assert!(!transport.is_read_armed());
        assert!(call.is_finished());

        transport.done(Status::new(StatusCode::Unavailable, "late"));
        assert_eq!(responses.terminal_count(), 1);
    }

    #[test]
    fn call_failure_carries_status_message() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, _requests, responses, _call) = bidi(&bridge);

        transport.complete_read(3);
        transport.done(Status::new(StatusCode::Unavailable, "connection reset"));

        let events = responses.events();
        assert!(matches!(events[0], Notification::Next(3)));
        assert!(matches!(
            &events[1],
            Notification::Error(Error::Reactor(ReactorError::Call(status)))
                if status.code() == StatusCode::Unavailable
        ));
        assert_eq!(error_text(&responses), "connection reset");
    }

    #[test]
    fn writes_done_waits_for_queue_to_drain() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, requests, _responses, _call) = bidi(&bridge);

        requests.next(1);
        requests.next(2);
        requests.complete();
        assert!(!transport.ops().contains(&Op::WritesDone));

        transport.complete_write();
        assert!(!transport.ops().contains(&Op::WritesDone));

        transport.complete_write();
        assert_eq!(transport.ops().last(), Some(&Op::WritesDone));
        assert_eq!(transport.writes(), vec![1, 2]);
    }

    #[test]
    fn producer_error_half_closes_client_call() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, requests, responses, _call) = bidi(&bridge);

        requests.error(Error::Producer("boom".into()));

        assert_eq!(transport.ops().last(), Some(&Op::WritesDone));
        assert!(!responses.is_terminated());

        transport.done(Status::ok());
        assert!(responses.is_completed());
    }

    #[test]
    fn cancel_writes_half_closes_but_keeps_reading() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, requests, responses, call) = bidi(&bridge);

        call.cancel_writes();
        requests.next(1);

        assert_eq!(transport.ops(), vec![Op::StartCall, Op::Read, Op::WritesDone]);
        assert_eq!(requests.subscriber_count(), 0);

        transport.complete_read(4);
        assert!(transport.is_read_armed());
        assert!(!call.is_finished());

        transport.done(Status::ok());
        assert_eq!(responses.values(), vec![4]);
        assert!(responses.is_completed());
    }

    #[test]
    fn read_only_call() {
        init_logger();
        let bridge = Bridge::new();
        let transport = Mock::new();
        let responses = RecordingObserver::new();

        let mock = transport.clone();
        let call = bridge
            .add_read_reactor(
                CallContext::new("/test/Read"),
                42u32,
                move |ctx, request, completions| {
                    assert_eq!(ctx.method(), "/test/Read");
                    assert_eq!(request, 42);
                    mock.bind(completions)
                },
                responses.clone(),
            )
            .unwrap();

        assert_eq!(call.shape(), Shape::ClientRead);
        transport.complete_read(1);
        transport.complete_read(2);
        transport.done(Status::ok());

        assert_eq!(responses.values(), vec![1, 2]);
        assert!(responses.is_completed());
        assert!(transport.writes().is_empty());
        assert!(!transport.ops().contains(&Op::WritesDone));
    }

    #[test]
    fn client_streaming_delivers_final_response() {
        init_logger();
        let bridge = Bridge::new();
        let transport = Mock::new();
        let requests = Subject::new();
        let response = RecordingObserver::new();

        let mock = transport.clone();
        let call = bridge
            .add_write_reactor(
                CallContext::new("/test/Sum"),
                move |_, slot, completions| mock.bind_with_response(slot, completions),
                &requests,
                response.clone(),
            )
            .unwrap();

        assert_eq!(transport.ops(), vec![Op::StartCall]);

        for value in [1, 2, 3] {
            requests.next(value);
            transport.complete_write();
        }
        requests.complete();
        assert_eq!(transport.ops().last(), Some(&Op::WritesDone));

        transport.respond(30);
        transport.done(Status::ok());

        let events = response.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Notification::Next(30)));
        assert!(matches!(events[1], Notification::Completed));
        assert_eq!(transport.reads_requested(), 0);
        assert!(call.is_finished());
    }

    #[test]
    fn client_streaming_without_response_fails_read() {
        init_logger();
        let bridge = Bridge::new();
        let transport = Mock::new();
        let requests = Subject::new();
        let response = RecordingObserver::new();

        let mock = transport.clone();
        let call = bridge
            .add_write_reactor(
                CallContext::new("/test/Sum"),
                move |_, slot, completions| mock.bind_with_response(slot, completions),
                &requests,
                response.clone(),
            )
            .unwrap();

        requests.next(1);
        transport.complete_write();
        requests.complete();
        transport.done(Status::ok());

        assert!(response.values().is_empty());
        assert!(!response.is_completed());
        assert_eq!(error_text(&response), "read failed");
        assert_eq!(response.terminal_count(), 1);
        assert!(call.is_finished());
    }

    #[test]
    fn server_bidi_finishes_with_ok() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, responses, requests, call) = server_bidi(&bridge);

        assert_eq!(transport.ops(), vec![Op::SendInitialMetadata, Op::Read]);

        transport.complete_read(5);
        responses.next(6);
        transport.complete_write();
        responses.complete();

        assert_eq!(transport.ops().last(), Some(&Op::Finish(Status::ok())));

        transport.done(Status::ok());
        assert_eq!(requests.values(), vec![5]);
        assert!(requests.is_completed());
        assert!(call.is_finished());
    }

    #[test]
    fn server_bidi_finishes_with_internal_on_producer_error() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, responses, _requests, _call) = server_bidi(&bridge);

        responses.error(Error::Producer("boom".into()));

        assert_eq!(
            transport.ops().last(),
            Some(&Op::Finish(Status::internal("Internal error happens")))
        );
    }

    #[test]
    fn server_cancellation_uses_configured_status() {
        init_logger();
        let bridge = Bridge::builder()
            .conf(
                ReactorConf::builder()
                    .send_initial_metadata(false)
                    .cancelled_status(Status::cancelled("shutting down"))
                    .build(),
            )
            .build();
        let (transport, _responses, _requests, call) = server_bidi(&bridge);

        call.cancel_writes();

        assert_eq!(
            transport.ops(),
            vec![Op::Read, Op::Finish(Status::cancelled("shutting down"))]
        );
    }

    #[test]
    fn server_write_failure_tears_down_silently() {
        init_logger();
        let bridge = Bridge::new();
        let transport = Mock::new();
        let responses = Subject::new();

        let mock = transport.clone();
        let call = bridge
            .make_server_write_reactor(move |completions| mock.bind(completions), &responses)
            .unwrap();

        assert_eq!(transport.ops(), vec![Op::SendInitialMetadata]);

        responses.next(1);
        transport.fail_write();

        assert!(call.is_finished());
        assert_eq!(responses.subscriber_count(), 0);
        assert!(!transport
            .ops()
            .iter()
            .any(|op| matches!(op, Op::Finish(_))));
    }

    #[test]
    fn server_write_finishes_after_drain() {
        init_logger();
        let bridge = Bridge::new();
        let transport = Mock::new();
        let responses = Subject::new();

        let mock = transport.clone();
        bridge
            .make_server_write_reactor(move |completions| mock.bind(completions), &responses)
            .unwrap();

        responses.next(1);
        responses.next(2);
        responses.complete();
        transport.complete_write();
        transport.complete_write();

        assert_eq!(
            transport.ops(),
            vec![
                Op::SendInitialMetadata,
                Op::Write(1),
                Op::Write(2),
                Op::Finish(Status::ok()),
            ]
        );
    }

    fn server_read(bridge: &Bridge) -> (Mock, RecordingObserver<u32>, CallHandle) {
        let transport = Mock::new();
        let requests = RecordingObserver::new();

        let mock = transport.clone();
        let call = bridge
            .make_server_read_reactor(move |completions| mock.bind(completions), requests.clone())
            .unwrap();

        (transport, requests, call)
    }

    #[test]
    fn server_read_finishes_with_ok_when_cancelled() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, requests, call) = server_read(&bridge);

        assert_eq!(transport.ops(), vec![Op::SendInitialMetadata, Op::Read]);
        assert_eq!(call.shape(), Shape::ServerRead);

        transport.complete_read(4);
        transport.complete_read(5);
        assert_eq!(requests.values(), vec![4, 5]);
        assert!(transport.is_read_armed());

        call.cancel_writes();
        call.cancel_writes();
        assert_eq!(
            transport.ops(),
            vec![
                Op::SendInitialMetadata,
                Op::Read,
                Op::Read,
                Op::Read,
                Op::Finish(Status::ok())
            ]
        );
        assert!(!call.is_finished());

        transport.done(Status::ok());
        assert!(requests.is_completed());
        assert_eq!(requests.terminal_count(), 1);
        assert!(call.is_finished());
    }

    #[test]
    fn server_read_failure_skips_finish() {
        init_logger();
        let bridge = Bridge::new();
        let (transport, requests, call) = server_read(&bridge);

        transport.fail_read();
        call.cancel_writes();

        assert_eq!(error_text(&requests), "read failed");
        assert!(!transport
            .ops()
            .iter()
            .any(|op| matches!(op, Op::Finish(_))));
        assert!(call.is_finished());
    }

    #[test]
    fn terminated_producer_is_handled_during_bind() {
        init_logger();
        let bridge = Bridge::new();
        let requests = Subject::<u32>::new();
        requests.complete();

        let transport = Mock::new();
        let responses = RecordingObserver::new();
        let mock = transport.clone();
        let call = bridge
            .add_bidi_reactor(
                CallContext::new("/test/Bidi"),
                move |_, completions| mock.bind(completions),
                &requests,
                responses.clone(),
            )
            .unwrap();

        assert_eq!(transport.ops(), vec![Op::StartCall, Op::Read, Op::WritesDone]);
        assert!(!call.is_finished());
    }

    #[test]
    fn bounded_bridge_rejects_calls() {
        init_logger();
        let bridge = Bridge::builder().capacity(1).build();
        let (transport, _requests, _responses, _call) = bidi(&bridge);

        let rejected = bridge.add_bidi_reactor(
            CallContext::new("/test/Bidi"),
            |_, completions| Mock::new().bind(completions),
            &Subject::<u32>::new(),
            RecordingObserver::<u32>::new(),
        );
        assert!(matches!(
            rejected,
            Err(Error::Registry(RegistryError::Exhausted(1)))
        ));

        transport.done(Status::ok());
        let (_, _, _, call) = bidi(&bridge);
        assert_eq!(call.handle().generation(), 1);
    }

    #[test]
    fn reactor_state_follows_lifecycle() {
        init_logger();
        let bridge = Bridge::new();
        let transport = Mock::new();
        let requests = Subject::<u32>::new();
        let handle = bridge.registry().reserve().unwrap();
        let slot = ReadSlot::new();
        let reactor = StreamReactor::new(
            handle,
            Shape::ClientBidi,
            Arc::new(ReactorConf::default()),
            bridge.registry().downgrade(),
            StreamIo::client_bidi(transport.bind(bridge.registry().completions(handle))),
            slot,
            RecordingObserver::<u32>::new(),
        );
        bridge.registry().activate(handle, reactor.clone()).unwrap();

        assert_eq!(reactor.state(), ReactorState::Initializing);
        assert!(reactor.start());
        assert_eq!(reactor.state(), ReactorState::Active);

        let _subscription = reactor.subscribe(&requests);
        transport.done(Status::ok());

        assert_eq!(reactor.state(), ReactorState::Destroyed);
        assert_eq!(requests.subscriber_count(), 0);
        assert!(!bridge.registry().contains(handle));
    }
}
