use std::fmt::{Display, Formatter};

/// Call shape served by a reactor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Client side of a bidirectional call.
    ClientBidi,
    /// Client side of a server-streaming call.
    ClientRead,
    /// Client side of a client-streaming call.
    ///
    /// The single response is delivered when the call finishes.
    ClientWrite,
    /// Server side of a bidirectional call.
    ServerBidi,
    /// Server side of a server-streaming call.
    ServerWrite,
    /// Server side of a client-streaming call.
    ///
    /// The call is finished with OK status once the [`CallHandle`](crate::CallHandle) cancels it.
    ServerRead,
}

impl Shape {
    /// Returns `true` if the reactor runs a read loop.
    pub fn reads(&self) -> bool {
        matches!(
            self,
            Shape::ClientBidi | Shape::ClientRead | Shape::ServerBidi | Shape::ServerRead
        )
    }

    /// Returns `true` if the reactor subscribes to a producer and writes its messages.
    pub fn writes(&self) -> bool {
        !matches!(self, Shape::ClientRead | Shape::ServerRead)
    }

    /// Returns `true` if the reactor serves the server side of a call.
    pub fn is_server(&self) -> bool {
        matches!(
            self,
            Shape::ServerBidi | Shape::ServerWrite | Shape::ServerRead
        )
    }

    /// Returns `true` if the final response is delivered at call completion.
    pub fn has_final_read(&self) -> bool {
        matches!(self, Shape::ClientWrite)
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Shape::ClientBidi => "client-bidi",
            Shape::ClientRead => "client-read",
            Shape::ClientWrite => "client-write",
            Shape::ServerBidi => "server-bidi",
            Shape::ServerWrite => "server-write",
            Shape::ServerRead => "server-read",
        };
        f.write_str(name)
    }
}
