/*!
# 📖 1.2. Call Shapes

<em>[← Quickstart](crate::docs::a1__quickstart) | [Custom Transport →](crate::docs::c1__custom_transport)</em>

Each binding method of [`Bridge`] creates a reactor of a particular shape. Shapes differ in which
directions are active and how the call ends.

| Shape                 | Method                          | Reads | Writes | Ends with                         |
|-----------------------|---------------------------------|-------|--------|-----------------------------------|
| client bidirectional  | [`Bridge::add_bidi_reactor`]    | yes   | yes    | status reported by transport      |
| client read           | [`Bridge::add_read_reactor`]    | yes   | no     | status reported by transport      |
| client write          | [`Bridge::add_write_reactor`]   | once  | yes    | single response, then completion  |
| server bidirectional  | [`Bridge::make_server_bidi_reactor`] | yes | yes  | status sent by reactor            |
| server write          | [`Bridge::make_server_write_reactor`] | no | yes   | status sent by reactor            |
| server read           | [`Bridge::make_server_read_reactor`] | yes | no    | OK status sent on cancellation    |

## Binding

Binding proceeds in a fixed order:

1. a slot is reserved in the registry,
2. the transport method is called with a [`Completions`] handle of that slot,
3. the reactor is placed into the slot,
4. the call is started (client) or initial metadata is sent (server),
5. the first read is armed,
6. the producer is subscribed.

The transport never receives a read or write request before it has returned its stream object.

## Client Shapes

Client bidirectional and client write reactors half-close the call when the producer finishes.
Writes which are still queued at that moment are written first, `writes done` follows the last of
them. If the producer fails, the call is still half-closed, the error is not forwarded to the server.

The client write shape receives its single response into the [`ReadSlot`] handed to the transport
method. When the transport reports an OK status, the response is delivered to the sink followed by
completion. An OK status with an empty slot fails the call with `"read failed"`.

```rust
# #[cfg(feature = "test_utils")]
# {
use flowbridge::prelude::*;
use flowbridge::test_utils::{MockTransport, RecordingObserver};

let bridge = Bridge::new();
let transport = MockTransport::<u32, u32>::new();
let requests = Subject::new();
let total = RecordingObserver::new();

let mock = transport.clone();
bridge
    .add_write_reactor(
        CallContext::new("/sums.Sums/Total"),
        move |_, slot, completions| mock.bind_with_response(slot, completions),
        &requests,
        total.clone(),
    )
    .unwrap();

for value in [10, 20] {
    requests.next(value);
    transport.complete_write();
}
requests.complete();
transport.respond(30);
transport.done(Status::ok());

assert_eq!(total.values(), vec![30]);
assert!(total.is_completed());
# }
```

## Server Shapes

Server reactors finish the call themselves once the producer terminates:

* producer completed: OK status,
* producer failed: [`ReactorConf::producer_error_status`],
* writes cancelled with [`CallHandle::cancel_writes`]: [`ReactorConf::cancelled_status`].

A server read call has no producer. It stays open until [`CallHandle::cancel_writes`] finishes it
with OK status.

The transport then reports `on_done`, which delivers the terminal event to the sink of inbound
messages and destroys the reactor. A failed write on a server write call ends the call without
sending any status.

<em>[← Quickstart](crate::docs::a1__quickstart) | [Custom Transport →](crate::docs::c1__custom_transport)</em>

[`Bridge`]: crate::Bridge
[`Bridge::add_bidi_reactor`]: crate::Bridge::add_bidi_reactor
[`Bridge::add_read_reactor`]: crate::Bridge::add_read_reactor
[`Bridge::add_write_reactor`]: crate::Bridge::add_write_reactor
[`Bridge::make_server_bidi_reactor`]: crate::Bridge::make_server_bidi_reactor
[`Bridge::make_server_write_reactor`]: crate::Bridge::make_server_write_reactor
[`Bridge::make_server_read_reactor`]: crate::Bridge::make_server_read_reactor
[`CallHandle::cancel_writes`]: crate::CallHandle::cancel_writes
[`Completions`]: crate::core::registry::Completions
[`ReadSlot`]: crate::core::reactor::ReadSlot
[`ReactorConf::producer_error_status`]: crate::core::reactor::ReactorConf::producer_error_status
[`ReactorConf::cancelled_status`]: crate::core::reactor::ReactorConf::cancelled_status
*/
