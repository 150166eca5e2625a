//! # Core abstractions
//!
//! Reactive contracts, transport contracts, stream reactors and the registry which owns them.

pub mod consts;
pub mod reactor;
pub mod registry;
pub mod rx;
pub mod status;
pub mod transport;
pub(crate) mod utils;
