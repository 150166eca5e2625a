//! # Call status
//!
//! [`Status`] is reported by a transport when a call finishes and is sent by server reactors to
//! finish a call. Only non-ok statuses reach a sink, as [`ReactorError::Call`].
//!
//! [`ReactorError::Call`]: crate::errors::ReactorError::Call

use std::fmt::{Display, Formatter};

/// <sup>[`serde`](https://serde.rs)</sup>
/// Canonical status codes of a streaming call.
///
/// Numeric values follow the codes used by the majority of RPC runtimes, so transports can convert
/// their own status representation with [`StatusCode::from_code`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    /// Call finished successfully.
    #[default]
    Ok = 0,
    /// Call was cancelled, typically by the caller.
    Cancelled = 1,
    /// Unknown error.
    Unknown = 2,
    /// Client specified an invalid argument.
    InvalidArgument = 3,
    /// Deadline expired before the call could complete.
    DeadlineExceeded = 4,
    /// Requested entity was not found.
    NotFound = 5,
    /// Entity that a client attempted to create already exists.
    AlreadyExists = 6,
    /// Caller does not have permission to execute the call.
    PermissionDenied = 7,
    /// Some resource has been exhausted.
    ResourceExhausted = 8,
    /// System is not in a state required for the call.
    FailedPrecondition = 9,
    /// Call was aborted.
    Aborted = 10,
    /// Call was attempted past the valid range.
    OutOfRange = 11,
    /// Call is not implemented or not supported.
    Unimplemented = 12,
    /// Internal error.
    Internal = 13,
    /// Service is currently unavailable.
    Unavailable = 14,
    /// Unrecoverable data loss or corruption.
    DataLoss = 15,
    /// Request does not have valid authentication credentials.
    Unauthenticated = 16,
}

impl StatusCode {
    /// Converts a numeric status code.
    ///
    /// Codes outside the canonical range are mapped to [`StatusCode::Unknown`].
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => StatusCode::Ok,
            1 => StatusCode::Cancelled,
            3 => StatusCode::InvalidArgument,
            4 => StatusCode::DeadlineExceeded,
            5 => StatusCode::NotFound,
            6 => StatusCode::AlreadyExists,
            7 => StatusCode::PermissionDenied,
            8 => StatusCode::ResourceExhausted,
            9 => StatusCode::FailedPrecondition,
            10 => StatusCode::Aborted,
            11 => StatusCode::OutOfRange,
            12 => StatusCode::Unimplemented,
            13 => StatusCode::Internal,
            14 => StatusCode::Unavailable,
            15 => StatusCode::DataLoss,
            16 => StatusCode::Unauthenticated,
            _ => StatusCode::Unknown,
        }
    }

    /// Numeric value of the code.
    #[inline(always)]
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// <sup>[`serde`](https://serde.rs)</sup>
/// Final status of a streaming call.
///
/// Transports report the status through [`Reactor::on_done`](crate::core::transport::Reactor::on_done).
/// Server-side reactors hand a status back to the transport when they finish a call.
///
/// # Usage
///
/// ```rust
/// use flowbridge::core::status::{Status, StatusCode};
///
/// let status = Status::new(StatusCode::Unavailable, "connection reset");
///
/// assert!(!status.is_ok());
/// assert_eq!(status.message(), "connection reset");
/// assert!(Status::ok().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    /// Creates a new status.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Successful status without a message.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Creates a [`StatusCode::Internal`] status.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Internal, message)
    }

    /// Creates a [`StatusCode::Cancelled`] status.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(StatusCode::Cancelled, message)
    }

    /// Status code.
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// Diagnostic message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns `true` if call finished successfully.
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{:?}", self.code)
        } else {
            write!(f, "{:?}: {}", self.code, self.message)
        }
    }
}
