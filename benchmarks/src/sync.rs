use std::thread;
use std::time::SystemTime;

use flowbridge::sync;

use flowbridge::prelude::*;

use crate::transport::{EchoStream, Payload};

pub fn benchmark_bidi_echo(n_calls: usize, n_messages: usize) {
    let bridge = Bridge::new();
    let payloads: Vec<Payload> = (0..n_messages).map(Payload::new).collect();

    let start = SystemTime::now();
    let handlers: Vec<_> = (0..n_calls)
        .map(|i| {
            let (responses, receiver) = sync::channel();
            bridge
                .add_bidi_reactor(
                    CallContext::new("/bench.Echo/Chat"),
                    |_, completions| EchoStream::spawn(completions),
                    &sync::from_iter(payloads.clone()),
                    responses,
                )
                .unwrap();

            thread::spawn(move || match receiver.wait_all() {
                Ok(values) => values.len(),
                Err(err) => {
                    log::debug!("[call #{i}] failed: {err}");
                    0
                }
            })
        })
        .collect();

    let received: usize = handlers
        .into_iter()
        .map(|handler| handler.join().unwrap())
        .sum();
    let end = SystemTime::now();
    let duration = end.duration_since(start).unwrap();

    log::info!(
        "[benchmark_bidi_echo] {received} messages echoed by {n_calls} calls: {}s, ({}µs per message)",
        duration.as_secs_f32(),
        (duration.as_secs_f64() / received.max(1) as f64 * 1_000_000.0) as f32
    )
}
