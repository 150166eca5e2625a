//! # Stream reactors
//!
//! A reactor adapts a producer of outbound messages and a sink of inbound messages onto a single
//! streaming call. It is assembled from a few parts:
//!
//! * an outbound write queue that keeps at most one write in flight,
//! * a [`ReadSlot`] which is re-armed after every delivered inbound message,
//! * a state machine driven by transport completions ([`ReactorState`]),
//! * a teardown routine which runs exactly once.
//!
//! The [`Shape`] of a call defines which of these parts are active. Reactors are created by a
//! [`Bridge`](crate::Bridge) and configured with [`ReactorConf`].

mod conf;
mod read_slot;
mod shape;
mod state;
mod stream_reactor;
mod write_queue;

pub use conf::{ReactorConf, ReactorConfBuilder};
pub use read_slot::ReadSlot;
pub use shape::Shape;
pub use state::ReactorState;

pub(crate) use stream_reactor::{StreamIo, StreamReactor};
