use std::alloc::System;
use std::thread;
use std::time::Duration;

#[cfg(feature = "async")]
use flowbridge_benchmarks::asnc::benchmark_async_bidi_echo;
#[cfg(feature = "rx")]
use flowbridge_benchmarks::rx::benchmark_subject_broadcast;
#[cfg(feature = "sync")]
use flowbridge_benchmarks::sync::benchmark_bidi_echo;

#[global_allocator]
static GLOBAL: flowbridge_benchmarks::trallocator::Trallocator<System> =
    flowbridge_benchmarks::trallocator::Trallocator::new(System);

#[allow(dead_code)]
fn debug_memory(name: &str, before: u64) {
    let immediate = GLOBAL.get().saturating_sub(before);

    thread::sleep(Duration::from_millis(100));
    let soon = GLOBAL.get().saturating_sub(before);

    log::info!("[{name}] memory used: {immediate} bytes, after 100ms: {soon} bytes",);
}

fn main() {
    GLOBAL.reset();

    // Setup logger
    env_logger::builder()
        .filter_level(log::LevelFilter::Info) // Suppress everything below `info` for third-party modules.
        .filter_module(env!("CARGO_PKG_NAME"), log::LevelFilter::Trace) // Allow everything from current package
        .init();

    #[cfg(feature = "rx")]
    {
        log::info!("[benchmark_subject_broadcast]");
        let base_mem = GLOBAL.get();
        benchmark_subject_broadcast(1_000, 1_000);
        debug_memory("benchmark_subject_broadcast", base_mem);
    }

    #[cfg(feature = "sync")]
    {
        log::info!("[benchmark_bidi_echo]");
        let base_mem = GLOBAL.get();
        benchmark_bidi_echo(100, 1_000);
        debug_memory("benchmark_bidi_echo", base_mem);
    }

    #[cfg(feature = "async")]
    {
        log::info!("[benchmark_async_bidi_echo]");
        let base_mem = GLOBAL.get();
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(benchmark_async_bidi_echo(100, 1_000));
        debug_memory("benchmark_async_bidi_echo", base_mem);
    }
}
