#[doc(hidden)]
pub mod trallocator;

#[cfg(any(feature = "sync", feature = "async"))]
mod transport;

#[cfg(feature = "rx")]
pub mod rx;
#[cfg(feature = "sync")]
pub mod sync;

#[cfg(feature = "async")]
pub mod asnc;
