/*!
# 📖 1.1. Quickstart

<em>[← Home](crate::docs) | [Call Shapes →](crate::docs::a2__call_shapes)</em>

## Install

Add Flowbridge to your project dependencies:

```shell
cargo add flowbridge --features sync
```

The `sync` feature provides thread-based producers and blocking sinks. Enable `async` for Tokio
streams.

## A Glimpse

Let's bind a bidirectional call. The transport here is a [`MockTransport`] that lets us report
completions by hand, a real transport reports them from its own threads.

```rust
# #[cfg(all(feature = "test_utils", feature = "sync"))]
# {
use flowbridge::prelude::*;
use flowbridge::sync;
use flowbridge::test_utils::MockTransport;

let bridge = Bridge::new();
let transport = MockTransport::<u32, u32>::new();

// Outbound messages
let requests = Subject::new();
// Inbound messages
let (responses, receiver) = sync::channel();

let mock = transport.clone();
let call = bridge
    .add_bidi_reactor(
        CallContext::new("/sums.Sums/Running").with_metadata("x-client", "quickstart"),
        move |_ctx, completions| mock.bind(completions),
        &requests,
        responses,
    )
    .unwrap();

requests.next(10);
transport.complete_write();
transport.complete_read(10);
requests.complete();
transport.done(Status::ok());

assert_eq!(receiver.wait_all().unwrap(), vec![10]);
assert!(call.is_finished());
# }
```

## Bridge

[`Bridge`] is the entry point. It holds a registry of active reactors and the configuration shared
by all of them. Bridges are cheap to clone, clones share the registry.

```rust
use flowbridge::prelude::*;

let bridge = Bridge::builder()
    .conf(
        ReactorConf::builder()
            .name("sums")
            .producer_error_status(Status::new(StatusCode::Unavailable, "upstream is gone"))
            .build(),
    )
    .capacity(1024)
    .build();
```

When the registry is full, binding fails with
[`RegistryError::Exhausted`](crate::errors::RegistryError::Exhausted).

## Producers and Sinks

A producer is anything that implements [`Observable`], a sink is anything that implements
[`Observer`]. Flowbridge ships with several of them:

* [`Subject`] is a hot producer which can be fed from any thread.
* [`FnObserver`] turns closures into a sink.
* [`sync::from_iter`] and [`sync::from_receiver`] produce values on a dedicated thread.
* [`sync::channel`] turns notifications into a blocking receiver.
* `asnc::from_stream` and `asnc::channel` do the same for Tokio streams (`async` feature).

## Terminal Events

Every sink receives exactly one terminal event. A call which ends with an OK status completes the
sink. Otherwise, the sink receives [`Error::Reactor`](crate::errors::Error::Reactor) with one of:

* [`ReactorError::ReadFailed`](crate::errors::ReactorError::ReadFailed) if the transport failed a
  read,
* [`ReactorError::WriteFailed`](crate::errors::ReactorError::WriteFailed) if the transport failed
  a write,
* [`ReactorError::Call`](crate::errors::ReactorError::Call) with the status reported by the
  transport.

<em>[← Home](crate::docs) | [Call Shapes →](crate::docs::a2__call_shapes)</em>

[`MockTransport`]: https://docs.rs/flowbridge/latest/flowbridge/test_utils/struct.MockTransport.html
[`Bridge`]: crate::Bridge
[`Observable`]: crate::core::rx::Observable
[`Observer`]: crate::core::rx::Observer
[`Subject`]: crate::core::rx::Subject
[`FnObserver`]: crate::core::rx::FnObserver
[`sync::from_iter`]: crate::sync::from_iter
[`sync::from_receiver`]: crate::sync::from_receiver
[`sync::channel`]: crate::sync::channel
*/
