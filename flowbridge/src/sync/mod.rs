//! # 〔sync〕 Thread-based producers and sinks
//!
//! <sup>`sync`</sup>
//!
//! Adapters between [`std`] primitives and the reactive contracts:
//!
//! * [`from_iter`] turns an iterator into a producer which emits from a dedicated thread.
//! * [`from_receiver`] turns an [`mpsc::Receiver`](std::sync::mpsc::Receiver) into a producer.
//! * [`channel`] creates a sink which forwards notifications into a blocking
//!   [`NotificationReceiver`].
//!
//! # Usage
//!
//! ```rust
//! use flowbridge::prelude::*;
//! use flowbridge::sync;
//!
//! let (sink, receiver) = sync::channel();
//! let _subscription = sync::from_iter(vec![1, 2, 3]).subscribe(sink);
//!
//! assert_eq!(receiver.wait_all().unwrap(), vec![1, 2, 3]);
//! ```

mod channel;
pub(crate) mod consts;
mod producers;

pub use channel::{channel, NotificationIter, NotificationReceiver, NotificationSender};
pub use producers::{from_iter, from_receiver, IterProducer, ReceiverProducer};
