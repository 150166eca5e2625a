use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, Once};
use std::thread;
use std::time::Duration;

use flowbridge::core::transport::{ClientCall, ServerCall, StreamReader, StreamWriter, WritesDone};
use flowbridge::sync::{self, NotificationReceiver};

use flowbridge::prelude::*;
use proptest::prelude::{any, prop, ProptestConfig};
use proptest::proptest;

static INIT_LOGGER: Once = Once::new();
pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::builder()
            .is_test(true)
            // Suppress everything below `warn` for third-party modules
            .filter_level(log::LevelFilter::Warn)
            // Allow everything above `LOG_LEVEL` from current package
            .filter_module(env!("CARGO_PKG_NAME"), LOG_LEVEL)
            .init();
    });
}

/// How the remote peer behaves.
#[derive(Clone, Debug)]
enum Script {
    /// Responds to every message with a running sum.
    RunningSum,
    /// Fails the first read.
    FailRead,
    /// Fails the first write.
    FailWrite,
    /// Ends the call with a status once writes are done.
    EndWith(Status),
    /// Sends the listed messages and never ends the call by itself.
    Feed(Vec<u32>),
}

enum Command {
    Start,
    Read(ReadSlot<u32>),
    Write(Arc<u32>),
    WritesDone,
    Finish(Status),
}

#[derive(Default)]
struct Record {
    writes: Mutex<Vec<u32>>,
    finished: Mutex<Option<Status>>,
    writes_in_flight: AtomicUsize,
    max_writes_in_flight: AtomicUsize,
}

/// Transport which reports every completion from a dedicated worker thread.
struct Loopback {
    commands: Mutex<Sender<Command>>,
    record: Arc<Record>,
}

impl Loopback {
    fn spawn(script: Script, record: Arc<Record>, completions: Completions) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker_record = record.clone();
        thread::spawn(move || run_peer(script, rx, worker_record, completions));

        Self {
            commands: Mutex::new(tx),
            record,
        }
    }

    fn send(&self, command: Command) {
        let _ = self.commands.lock().unwrap().send(command);
    }
}

fn run_peer(script: Script, rx: Receiver<Command>, record: Arc<Record>, completions: Completions) {
    let mut pending: Vec<u32> = match &script {
        Script::Feed(messages) => messages.iter().rev().copied().collect(),
        _ => Vec::new(),
    };
    let mut parked: Option<ReadSlot<u32>> = None;
    let mut sum = 0u32;
    let mut writes_done = false;
    let mut done = false;

    for command in rx {
        if done {
            continue;
        }
        match command {
            Command::Start => {}
            Command::Read(slot) => {
                if matches!(script, Script::FailRead) {
                    completions.on_read_done(false);
                    continue;
                }
                parked = Some(slot);
            }
            Command::Write(message) => {
                record.writes.lock().unwrap().push(*message);
                record.writes_in_flight.fetch_sub(1, Ordering::SeqCst);
                if matches!(script, Script::FailWrite) {
                    completions.on_write_done(false);
                    completions.on_done(Status::cancelled("peer is gone"));
                    done = true;
                    continue;
                }
                if matches!(script, Script::RunningSum) {
                    sum = sum.wrapping_add(*message);
                    pending.insert(0, sum);
                }
                completions.on_write_done(true);
            }
            Command::WritesDone => writes_done = true,
            Command::Finish(status) => {
                *record.finished.lock().unwrap() = Some(status.clone());
                completions.on_done(status);
                done = true;
                continue;
            }
        }

        if parked.is_some() {
            if let Some(message) = pending.pop() {
                let slot = parked.take().unwrap();
                slot.fill(message);
                completions.on_read_done(true);
            }
        }

        if writes_done && pending.is_empty() {
            let status = match &script {
                Script::EndWith(status) => status.clone(),
                _ => Status::ok(),
            };
            completions.on_done(status);
            done = true;
        }
    }
}

impl ClientCall for Loopback {
    fn start_call(&self) {
        self.send(Command::Start)
    }
}

impl WritesDone for Loopback {
    fn start_writes_done(&self) {
        self.send(Command::WritesDone)
    }
}

impl ServerCall for Loopback {
    fn send_initial_metadata(&self) {}

    fn finish(&self, status: Status) {
        self.send(Command::Finish(status))
    }
}

impl StreamReader<u32> for Loopback {
    fn start_read(&self, slot: ReadSlot<u32>) {
        self.send(Command::Read(slot))
    }
}

impl StreamWriter<u32> for Loopback {
    fn start_write(&self, message: Arc<u32>) {
        let in_flight = self.record.writes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.record
            .max_writes_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);
        self.send(Command::Write(message))
    }
}

fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..500 {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

fn collect(mut receiver: NotificationReceiver<u32>) -> Result<Vec<u32>> {
    let mut values = Vec::new();
    loop {
        match receiver
            .recv_timeout(RECV_TIMEOUT)
            .expect("call did not terminate in time")
        {
            Notification::Next(value) => values.push(value),
            Notification::Error(err) => return Err(err),
            Notification::Completed => return Ok(values),
        }
    }
}

fn bidi_call(bridge: &Bridge, script: Script, requests: Vec<u32>) -> (Result<Vec<u32>>, Arc<Record>) {
    let record = Arc::new(Record::default());
    let (responses, receiver) = sync::channel();

    let peer = record.clone();
    bridge
        .add_bidi_reactor(
            CallContext::new("/sums.Sums/Running"),
            move |_, completions| Loopback::spawn(script, peer, completions),
            &sync::from_iter(requests),
            responses,
        )
        .unwrap();

    (collect(receiver), record)
}

#[test]
fn bidi_running_sum() {
    init_logger();
    let bridge = Bridge::new();

    let (result, record) = bidi_call(&bridge, Script::RunningSum, vec![10, 3, 15, 20]);

    assert_eq!(result.unwrap(), vec![10, 13, 28, 48]);
    assert_eq!(*record.writes.lock().unwrap(), vec![10, 3, 15, 20]);
    assert_eq!(record.max_writes_in_flight.load(Ordering::SeqCst), 1);
}

#[test]
fn bidi_read_failure() {
    init_logger();
    let bridge = Bridge::new();

    let (result, _) = bidi_call(&bridge, Script::FailRead, vec![1, 2, 3]);

    assert_eq!(result.unwrap_err().to_string(), "read failed");
}

#[test]
fn bidi_write_failure_ignores_late_completion() {
    init_logger();
    let bridge = Bridge::new();

    let (result, _) = bidi_call(&bridge, Script::FailWrite, vec![1, 2, 3]);

    assert_eq!(result.unwrap_err().to_string(), "write failed");
}

#[test]
fn bidi_call_failure_carries_status_message() {
    init_logger();
    let bridge = Bridge::new();
    let status = Status::new(StatusCode::Unavailable, "backend is restarting");

    let (result, _) = bidi_call(&bridge, Script::EndWith(status), vec![1]);

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "backend is restarting");
    assert!(matches!(
        err,
        Error::Reactor(ReactorError::Call(status)) if status.code() == StatusCode::Unavailable
    ));
}

#[test]
fn read_only_call_receives_fed_messages() {
    init_logger();
    let bridge = Bridge::new();
    let record = Arc::new(Record::default());
    let (responses, receiver) = sync::channel();

    let peer = record.clone();
    let call = bridge
        .add_read_reactor(
            CallContext::new("/feed.Feed/Subscribe"),
            "topic".to_string(),
            move |ctx, topic: String, completions| {
                assert_eq!(ctx.method(), "/feed.Feed/Subscribe");
                assert_eq!(topic, "topic");
                Loopback::spawn(Script::Feed(vec![7, 8, 9]), peer, completions)
            },
            responses,
        )
        .unwrap();

    let mut receiver = receiver;
    let mut values = Vec::new();
    while values.len() < 3 {
        match receiver.recv_timeout(RECV_TIMEOUT).unwrap() {
            Notification::Next(value) => values.push(value),
            other => panic!("unexpected notification: {other:?}"),
        }
    }
    assert_eq!(values, vec![7, 8, 9]);
    assert!(!call.is_finished());

    call.cancel_writes();
    assert!(!call.is_finished());
}

#[test]
fn server_bidi_finishes_after_responses() {
    init_logger();
    let bridge = Bridge::new();
    let record = Arc::new(Record::default());
    let (requests, receiver) = sync::channel();

    let peer = record.clone();
    bridge
        .make_server_bidi_reactor(
            move |completions| Loopback::spawn(Script::Feed(vec![1, 2, 3]), peer, completions),
            &sync::from_iter(vec![10u32, 20, 30]),
            requests,
        )
        .unwrap();

    let received = collect(receiver).unwrap();

    assert!([1, 2, 3].starts_with(&received));
    assert_eq!(*record.writes.lock().unwrap(), vec![10, 20, 30]);
    assert_eq!(*record.finished.lock().unwrap(), Some(Status::ok()));
}

#[test]
fn server_write_finishes_with_producer_error_status() {
    init_logger();
    let bridge = Bridge::builder()
        .conf(
            ReactorConf::builder()
                .producer_error_status(Status::new(StatusCode::Aborted, "source failed"))
                .build(),
        )
        .build();
    let record = Arc::new(Record::default());
    let responses = Subject::new();

    let peer = record.clone();
    let call = bridge
        .make_server_write_reactor(
            move |completions| Loopback::spawn(Script::Feed(Vec::new()), peer, completions),
            &responses,
        )
        .unwrap();

    responses.next(5);
    responses.error(Error::Producer("disk is full".into()));

    assert!(wait_until(|| call.is_finished()));
    assert_eq!(*record.writes.lock().unwrap(), vec![5]);
    assert_eq!(
        *record.finished.lock().unwrap(),
        Some(Status::new(StatusCode::Aborted, "source failed"))
    );
}

#[test]
fn many_calls_share_registry() {
    init_logger();
    let bridge = Bridge::new();

    let handlers: Vec<_> = (0..16u32)
        .map(|n| {
            let bridge = bridge.clone();
            thread::spawn(move || {
                let requests: Vec<u32> = (0..n).collect();
                let (result, _) = bidi_call(&bridge, Script::RunningSum, requests.clone());
                let expected: Vec<u32> = requests
                    .iter()
                    .scan(0u32, |sum, value| {
                        *sum += value;
                        Some(*sum)
                    })
                    .collect();
                assert_eq!(result.unwrap(), expected);
            })
        })
        .collect();

    for handler in handlers {
        handler.join().unwrap();
    }
    assert!(wait_until(|| bridge.registry().is_empty()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn writes_keep_producer_order(requests in prop::collection::vec(any::<u32>(), 0..64)) {
        init_logger();
        let bridge = Bridge::new();

        let (result, record) = bidi_call(&bridge, Script::RunningSum, requests.clone());

        let expected: Vec<u32> = requests
            .iter()
            .scan(0u32, |sum, value| {
                *sum = sum.wrapping_add(*value);
                Some(*sum)
            })
            .collect();
        assert_eq!(result.unwrap(), expected);
        assert_eq!(*record.writes.lock().unwrap(), requests);
        assert!(record.max_writes_in_flight.load(Ordering::SeqCst) <= 1);
    }
}
