use std::sync::mpsc;
use std::thread;
use std::time::SystemTime;

use flowbridge::prelude::*;

pub fn benchmark_subject_broadcast(n_observers: usize, n_iter: usize) {
    let subject = Subject::new();
    let (collect_tx, collect_rx) = mpsc::channel();

    let subscriptions: Vec<Subscription> = (0..n_observers)
        .map(|_| {
            let collect_tx = collect_tx.clone();
            subject.subscribe(FnObserver::new(move |_: usize| {
                collect_tx.send(()).unwrap();
            }))
        })
        .collect();
    drop(collect_tx);

    let start = SystemTime::now();
    let producer = {
        let subject = subject.clone();
        thread::spawn(move || {
            for i in 0..n_iter {
                subject.next(i);
            }
            subject.complete();
        })
    };

    let mut received = 0;
    for _ in 0..n_observers * n_iter {
        collect_rx.recv().unwrap();
        received += 1;
    }
    producer.join().unwrap();
    let end = SystemTime::now();
    let duration = end.duration_since(start).unwrap();
    drop(subscriptions);

    log::info!(
        "[benchmark_subject_broadcast] {received} deliveries to {n_observers} observers: {}s, ({}µs per delivery)",
        duration.as_secs_f32(),
        (duration.as_secs_f64() / received.max(1) as f64 * 1_000_000.0) as f32
    )
}
