//! Core constants.

/// Default label of reactors in log messages.
pub const DEFAULT_REACTOR_NAME: &str = "reactor";

/// Default message of a server finish status sent when the producer fails.
pub const DEFAULT_PRODUCER_ERROR_MESSAGE: &str = "Internal error happens";

/// Default message of a server finish status sent when writes are cancelled.
pub const DEFAULT_CANCELLED_MESSAGE: &str = "Writes cancelled";
