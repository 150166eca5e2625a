//! # Basic imports

pub use crate::errors::{Error, Result};
pub use crate::errors::{ReactorError, RegistryError};

pub use crate::bridge::{Bridge, CallHandle};
pub use crate::core::reactor::{ReactorConf, ReadSlot};
pub use crate::core::registry::Completions;
pub use crate::core::rx::{FnObserver, Notification, Observable, Observer, Subject, Subscription};
pub use crate::core::status::{Status, StatusCode};
pub use crate::core::transport::{CallContext, Reactor};
