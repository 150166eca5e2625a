/*!
# 📖 2.1. Custom Transport

<em>[← Call Shapes](crate::docs::a2__call_shapes) | [Testing →](crate::docs::e1__testing)</em>

A transport is any type which implements the primitives required by a call shape. Primitives are
fire-and-forget: a transport starts an operation and later reports its completion through the
[`Completions`] handle it received when the call was bound.

| Trait              | Required by                                        |
|--------------------|----------------------------------------------------|
| [`ClientCall`]     | all client shapes                                  |
| [`WritesDone`]     | client bidirectional, client write                 |
| [`ServerCall`]     | all server shapes                                  |
| [`StreamReader`]   | client bidirectional, client read, server bidirectional, server read |
| [`StreamWriter`]   | every shape except client read and server read     |

## Rules

A transport must follow a few rules:

* Report at most one completion for every started read and write.
* Fill the [`ReadSlot`] before reporting a successful read.
* Report `on_done` exactly once per call. A read which is still in flight when the call ends does
  not have to be completed, a failed read is treated as a failure of the whole call.
* Never report a completion from inside a primitive. Reactors may hold internal locks while they
  request primitives.

Completions may arrive from any thread. Completions for a reactor which is already destroyed are
ignored, so a transport does not have to track reactor lifetimes.

## Example

Here is a skeleton of a transport that forwards primitives to a worker thread:

```rust,ignore
use std::sync::mpsc::Sender;
use std::sync::Arc;

use flowbridge::core::transport::{ClientCall, StreamReader, StreamWriter, WritesDone};
use flowbridge::prelude::*;

enum Command {
    Start,
    Read(ReadSlot<Vec<u8>>),
    Write(Arc<Vec<u8>>),
    WritesDone,
}

struct WorkerStream {
    commands: Sender<(Command, Completions)>,
    completions: Completions,
}

impl WorkerStream {
    fn send(&self, command: Command) {
        let _ = self.commands.send((command, self.completions.clone()));
    }
}

impl ClientCall for WorkerStream {
    fn start_call(&self) {
        self.send(Command::Start)
    }
}

impl WritesDone for WorkerStream {
    fn start_writes_done(&self) {
        self.send(Command::WritesDone)
    }
}

impl StreamReader<Vec<u8>> for WorkerStream {
    fn start_read(&self, slot: ReadSlot<Vec<u8>>) {
        self.send(Command::Read(slot))
    }
}

impl StreamWriter<Vec<u8>> for WorkerStream {
    fn start_write(&self, message: Arc<Vec<u8>>) {
        self.send(Command::Write(message))
    }
}
```

The worker fills read slots with [`ReadSlot::fill`] and reports completions with
[`Reactor::on_read_done`], [`Reactor::on_write_done`] and [`Reactor::on_done`].

<em>[← Call Shapes](crate::docs::a2__call_shapes) | [Testing →](crate::docs::e1__testing)</em>

[`Completions`]: crate::core::registry::Completions
[`ReadSlot`]: crate::core::reactor::ReadSlot
[`ReadSlot::fill`]: crate::core::reactor::ReadSlot::fill
[`ClientCall`]: crate::core::transport::ClientCall
[`WritesDone`]: crate::core::transport::WritesDone
[`ServerCall`]: crate::core::transport::ServerCall
[`StreamReader`]: crate::core::transport::StreamReader
[`StreamWriter`]: crate::core::transport::StreamWriter
[`Reactor::on_read_done`]: crate::core::transport::Reactor::on_read_done
[`Reactor::on_write_done`]: crate::core::transport::Reactor::on_write_done
[`Reactor::on_done`]: crate::core::transport::Reactor::on_done
*/
