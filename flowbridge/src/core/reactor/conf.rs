use crate::core::consts::{DEFAULT_CANCELLED_MESSAGE, DEFAULT_PRODUCER_ERROR_MESSAGE, DEFAULT_REACTOR_NAME};
use crate::core::status::{Status, StatusCode};

/// Reactor configuration.
///
/// Shared by all reactors created by a [`Bridge`](crate::Bridge).
///
/// # Usage
///
/// ```rust
/// use flowbridge::core::reactor::ReactorConf;
/// use flowbridge::core::status::{Status, StatusCode};
///
/// let conf = ReactorConf::builder()
///     .name("echo")
///     .send_initial_metadata(false)
///     .producer_error_status(Status::new(StatusCode::Unavailable, "upstream is gone"))
///     .build();
///
/// assert_eq!(conf.name(), "echo");
/// assert!(!conf.sends_initial_metadata());
/// assert_eq!(conf.cancelled_status().code(), StatusCode::Cancelled);
/// ```
#[derive(Clone, Debug)]
pub struct ReactorConf {
    name: String,
    send_initial_metadata: bool,
    producer_error_status: Status,
    cancelled_status: Status,
}

/// Builder for [`ReactorConf`].
#[derive(Clone, Debug, Default)]
pub struct ReactorConfBuilder {
    inner: ReactorConf,
}

impl ReactorConf {
    /// Creates an empty builder with default settings.
    pub fn builder() -> ReactorConfBuilder {
        ReactorConfBuilder::default()
    }

    /// Label used in log messages.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns `true` if server reactors send initial metadata when a call starts.
    pub fn sends_initial_metadata(&self) -> bool {
        self.send_initial_metadata
    }

    /// Status used by server reactors to finish a call when the producer fails.
    pub fn producer_error_status(&self) -> &Status {
        &self.producer_error_status
    }

    /// Status used by server reactors to finish a call when writes are cancelled.
    pub fn cancelled_status(&self) -> &Status {
        &self.cancelled_status
    }
}

impl Default for ReactorConf {
    fn default() -> Self {
        Self {
            name: DEFAULT_REACTOR_NAME.to_string(),
            send_initial_metadata: true,
            producer_error_status: Status::new(
                StatusCode::Internal,
                DEFAULT_PRODUCER_ERROR_MESSAGE,
            ),
            cancelled_status: Status::new(StatusCode::Cancelled, DEFAULT_CANCELLED_MESSAGE),
        }
    }
}

impl ReactorConfBuilder {
    /// Sets a label used in log messages.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    /// Defines whether server reactors send initial metadata when a call starts.
    pub fn send_initial_metadata(mut self, value: bool) -> Self {
        self.inner.send_initial_metadata = value;
        self
    }

    /// Sets the status used to finish a server call when the producer fails.
    pub fn producer_error_status(mut self, status: Status) -> Self {
        self.inner.producer_error_status = status;
        self
    }

    /// Sets the status used to finish a server call when writes are cancelled.
    pub fn cancelled_status(mut self, status: Status) -> Self {
        self.inner.cancelled_status = status;
        self
    }

    /// Builds [`ReactorConf`].
    pub fn build(self) -> ReactorConf {
        self.inner
    }
}

#[cfg(test)]
mod conf_tests {
    use super::*;

    #[test]
    fn defaults_follow_server_conventions() {
        let conf = ReactorConf::default();

        assert_eq!(conf.name(), "reactor");
        assert!(conf.sends_initial_metadata());
        assert_eq!(conf.producer_error_status().code(), StatusCode::Internal);
        assert_eq!(
            conf.producer_error_status().message(),
            "Internal error happens"
        );
        assert_eq!(conf.cancelled_status().code(), StatusCode::Cancelled);
    }
}
