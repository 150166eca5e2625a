use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use flowbridge::core::transport::{ClientCall, StreamReader, StreamWriter, WritesDone};

use flowbridge::prelude::*;

pub const PAYLOAD_SIZE: usize = 255;

#[derive(Copy, Clone)]
pub struct Payload([u8; PAYLOAD_SIZE]);

impl Payload {
    pub fn new(discriminator: usize) -> Self {
        Self([(discriminator % 256) as u8; PAYLOAD_SIZE])
    }
}

impl Debug for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(format!("Payload([u8; {PAYLOAD_SIZE}])").as_str())
            .finish_non_exhaustive()
    }
}

enum Command {
    Read(ReadSlot<Payload>),
    Write(Arc<Payload>),
    WritesDone,
}

/// Client bidirectional stream which echoes every written message from a worker thread.
pub struct EchoStream {
    commands: Mutex<Sender<Command>>,
}

impl EchoStream {
    pub fn spawn(completions: Completions) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || echo(rx, completions));
        Self {
            commands: Mutex::new(tx),
        }
    }

    fn send(&self, command: Command) {
        let commands = self.commands.lock().unwrap();
        if commands.send(command).is_err() {
            log::debug!("echo worker is gone");
        }
    }
}

fn echo(rx: Receiver<Command>, completions: Completions) {
    let mut pending = VecDeque::new();
    let mut parked = None;
    let mut writes_done = false;

    for command in rx {
        match command {
            Command::Read(slot) => parked = Some(slot),
            Command::Write(message) => {
                pending.push_back(*message);
                completions.on_write_done(true);
            }
            Command::WritesDone => writes_done = true,
        }

        if parked.is_some() {
            if let Some(message) = pending.pop_front() {
                if let Some(slot) = parked.take() {
                    slot.fill(message);
                    completions.on_read_done(true);
                }
            }
        }

        if writes_done && pending.is_empty() {
            completions.on_done(Status::ok());
            return;
        }
    }
}

impl ClientCall for EchoStream {
    fn start_call(&self) {}
}

impl WritesDone for EchoStream {
    fn start_writes_done(&self) {
        self.send(Command::WritesDone)
    }
}

impl StreamReader<Payload> for EchoStream {
    fn start_read(&self, slot: ReadSlot<Payload>) {
        self.send(Command::Read(slot))
    }
}

impl StreamWriter<Payload> for EchoStream {
    fn start_write(&self, message: Arc<Payload>) {
        self.send(Command::Write(message))
    }
}
