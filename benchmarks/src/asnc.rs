use std::time::SystemTime;

use flowbridge::asnc;

use flowbridge::prelude::*;

use crate::transport::{EchoStream, Payload};

pub async fn benchmark_async_bidi_echo(n_calls: usize, n_messages: usize) {
    let bridge = Bridge::new();

    let start = SystemTime::now();
    let mut handlers = Vec::with_capacity(n_calls);
    for i in 0..n_calls {
        let payloads = tokio_stream::iter((0..n_messages).map(Payload::new));
        let (responses, notifications) = asnc::channel();
        bridge
            .add_bidi_reactor(
                CallContext::new("/bench.Echo/Chat"),
                |_, completions| EchoStream::spawn(completions),
                &asnc::from_stream(payloads),
                responses,
            )
            .unwrap();

        handlers.push(tokio::spawn(async move {
            match notifications.collect_values().await {
                Ok(values) => values.len(),
                Err(err) => {
                    log::debug!("[call #{i}] failed: {err}");
                    0
                }
            }
        }));
    }

    let mut received = 0;
    for handler in handlers {
        received += handler.await.unwrap();
    }
    let end = SystemTime::now();
    let duration = end.duration_since(start).unwrap();

    log::info!(
        "[benchmark_async_bidi_echo] {received} messages echoed by {n_calls} calls: {}s, ({}µs per message)",
        duration.as_secs_f32(),
        (duration.as_secs_f64() / received.max(1) as f64 * 1_000_000.0) as f32
    )
}
