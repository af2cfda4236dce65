//! Stress tests for concurrent channel use
//!
//! These tests verify:
//! - File records stay whole under concurrent writers
//! - Concurrent first requests for a channel build it once
//! - Stack fan-out keeps every member in step under load
//! - Shared context updates race safely with logging

use rust_channel_logger::prelude::*;
use rust_channel_logger::MemoryDriver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const MESSAGES_PER_THREAD: usize = 200;

#[test]
fn test_concurrent_file_writes_do_not_interleave() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let manager = Arc::new(Manager::new(
        Config::new("file").with_channel("file", ChannelConfig::file(&log_file)),
    ));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let logger = manager
                    .default_logger()
                    .expect("Failed to get logger")
                    .with("thread", t);
                for i in 0..MESSAGES_PER_THREAD {
                    logger.info(format!("thread {} message {}", t, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    manager.close().expect("Failed to close manager");

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let records: Vec<&str> = content
        .split("\n\n")
        .filter(|record| !record.is_empty())
        .collect();
    assert_eq!(records.len(), THREADS * MESSAGES_PER_THREAD);

    for record in records {
        let mut lines = record.lines();
        let header = lines.next().expect("record has a header");
        let thread_line = lines.next().expect("record has a context line");
        assert!(lines.next().is_none(), "unexpected extra line in {:?}", record);

        let t = header
            .split("thread ")
            .nth(1)
            .and_then(|rest| rest.split(' ').next())
            .expect("header names its thread");
        assert_eq!(thread_line, format!("  Thread: {}", t));
    }
}

#[test]
fn test_concurrent_first_request_builds_channel_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let memory = MemoryDriver::new();

    let factory = {
        let builds = Arc::clone(&builds);
        let memory = memory.clone();
        move |_: &ChannelConfig| -> Result<Box<dyn Driver>> {
            builds.fetch_add(1, Ordering::SeqCst);
            thread::yield_now();
            Ok(Box::new(memory.clone()) as Box<dyn Driver>)
        }
    };

    let manager = Arc::new(
        Manager::builder()
            .channel("hot", ChannelConfig::new("counted"))
            .driver("counted", factory)
            .build(),
    );
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                manager.channel("hot").expect("Failed to get logger")
            })
        })
        .collect();

    let loggers: Vec<Logger> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    for logger in &loggers[1..] {
        assert!(loggers[0].shares_channel_with(logger));
    }
}

#[test]
fn test_stack_fan_out_under_load() {
    let first = MemoryDriver::new();
    let second = MemoryDriver::new();

    let manager = Arc::new(
        Manager::builder()
            .channel("one", ChannelConfig::new("first"))
            .channel("two", ChannelConfig::new("second"))
            .channel("both", ChannelConfig::stack(["one", "two"]))
            .driver("first", first.factory())
            .driver("second", second.factory())
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let logger = manager.channel("both").expect("Failed to get logger");
                for i in 0..MESSAGES_PER_THREAD {
                    logger.notice(format!("{}-{}", t, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let total = THREADS * MESSAGES_PER_THREAD;
    assert_eq!(first.len(), total);
    assert_eq!(second.len(), total);

    let logger = manager.channel("both").expect("Failed to get logger");
    assert_eq!(logger.metrics().delivered_count() as usize, total);
    assert_eq!(logger.metrics().failed_count(), 0);
}

#[test]
fn test_share_context_while_logging() {
    let memory = MemoryDriver::new();
    let manager = Arc::new(
        Manager::builder()
            .channel("app", ChannelConfig::new("memory"))
            .default_channel("app")
            .driver("memory", memory.factory())
            .build(),
    );

    let writers: Vec<_> = (0..THREADS / 2)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..MESSAGES_PER_THREAD {
                    let logger = manager.default_logger().expect("Failed to get logger");
                    logger.info(format!("message {}", i));
                }
            })
        })
        .collect();

    let sharers: Vec<_> = (0..THREADS / 2)
        .map(|t| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for i in 0..MESSAGES_PER_THREAD {
                    manager.share_context(&context! { format!("k{}", t) => i });
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(sharers) {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(memory.len(), (THREADS / 2) * MESSAGES_PER_THREAD);
    let shared = manager.shared_context();
    for t in 0..THREADS / 2 {
        assert_eq!(
            shared.get(&format!("k{}", t)),
            Some(&Value::Int(MESSAGES_PER_THREAD as i64 - 1))
        );
    }
}
