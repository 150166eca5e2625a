//! # Flowbridge
//!
//! A bridge between push-based reactive streams and callback-driven streaming RPC transports.
//!
//! Streaming transports in the style of gRPC callback API expose a handful of fire-and-forget
//! primitives (start a read, start a write, half-close, finish) and report their completions
//! asynchronously. Reactive code, on the other hand, pushes values into observers. Flowbridge
//! connects the two worlds: outbound messages emitted by a producer are written to the transport
//! one at a time and in order, inbound messages are delivered to a sink, and every call ends with
//! exactly one terminal event.
//!
//! Flowbridge supports six call shapes:
//!
//! | Shape                    | Binding                                         |
//! |--------------------------|-------------------------------------------------|
//! | client bidirectional     | [`Bridge::add_bidi_reactor`]                    |
//! | client server-streaming  | [`Bridge::add_read_reactor`]                    |
//! | client client-streaming  | [`Bridge::add_write_reactor`]                   |
//! | server bidirectional     | [`Bridge::make_server_bidi_reactor`]            |
//! | server server-streaming  | [`Bridge::make_server_write_reactor`]           |
//! | server client-streaming  | [`Bridge::make_server_read_reactor`]            |
//!
//! Every bound call is driven by a reactor owned by a
//! [`ReactorRegistry`](crate::core::registry::ReactorRegistry). Transports report completions
//! through a [`Completions`](crate::core::registry::Completions) handle. Completions for reactors
//! which are already gone are ignored.
//!
//! # Usage
//!
//! ```rust
//! # #[cfg(feature = "test_utils")]
//! # {
//! use flowbridge::prelude::*;
//! use flowbridge::test_utils::{MockTransport, RecordingObserver};
//!
//! let bridge = Bridge::new();
//! let transport = MockTransport::<String, String>::new();
//! let requests = Subject::new();
//! let responses = RecordingObserver::new();
//!
//! let mock = transport.clone();
//! bridge
//!     .add_bidi_reactor(
//!         CallContext::new("/chat.Chat/Talk"),
//!         move |_, completions| mock.bind(completions),
//!         &requests,
//!         responses.clone(),
//!     )
//!     .unwrap();
//!
//! requests.next("hello".to_string());
//! transport.complete_write();
//! transport.complete_read("hi".to_string());
//! requests.complete();
//! transport.done(Status::ok());
//!
//! assert_eq!(transport.writes(), vec!["hello".to_string()]);
//! assert_eq!(responses.values(), vec!["hi".to_string()]);
//! assert!(responses.is_completed());
//! # }
//! ```
//!
//! The example uses `MockTransport` from the `test_utils` feature.
//! See the [playbook](docs) for details.
//!
//! # Features
//!
#![doc = document_features::document_features!()]

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod core;
pub mod docs;
pub mod errors;
pub mod prelude;

mod bridge;
pub use bridge::{Bridge, BridgeBuilder, CallHandle};

#[cfg(feature = "sync")]
pub mod sync;

#[cfg(feature = "async")]
pub mod asnc;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
