//! # 〔async〕 Tokio producers and sinks
//!
//! <sup>`async`</sup>
//!
//! Adapters between [Tokio](https://tokio.rs) streams and the reactive contracts:
//!
//! * [`from_stream`] turns a [`Stream`](tokio_stream::Stream) into a producer driven by a Tokio
//!   task.
//! * [`from_try_stream`] does the same for streams of results, the first error fails the producer.
//! * [`channel`] creates a sink which forwards notifications into a [`NotificationStream`].
//!
//! Producers are bound to the runtime which is current at subscription time. Subscribing outside a
//! runtime fails the observer with [`Error::NoRuntime`](crate::errors::Error::NoRuntime).
//!
//! # Usage
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use flowbridge::asnc;
//! use flowbridge::prelude::*;
//!
//! let (sink, notifications) = asnc::channel();
//! let _subscription = asnc::from_stream(tokio_stream::iter(vec![1, 2, 3])).subscribe(sink);
//!
//! assert_eq!(notifications.collect_values().await.unwrap(), vec![1, 2, 3]);
//! # }
//! ```

mod channel;
mod producers;

pub use channel::{channel, NotificationStream, StreamSender};
pub use producers::{from_stream, from_try_stream, StreamProducer, TryStreamProducer};
