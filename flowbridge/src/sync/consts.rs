use std::time::Duration;

/// Interval at which a receiver-backed producer checks whether its subscription is disposed.
pub(crate) const RECEIVER_POOLING_INTERVAL: Duration = Duration::from_millis(1);
