//! Concurrent access integration tests.
//!
//! Verify thread safety: at-most-once construction for cached lifetimes,
//! instance consistency across threads, and close() racing with resolution.

use lattice_di::{BindingSet, DiError, Resolver};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Debug)]
struct CounterService {
    constructions: u32,
}

#[test]
fn test_concurrent_singleton_constructed_exactly_once() {
    let constructions = Arc::new(AtomicU32::new(0));
    let constructions_clone = constructions.clone();

    let mut bindings = BindingSet::new();
    bindings
        .add_singleton_factory::<CounterService, _>(move |_| {
            let n = constructions_clone.fetch_add(1, Ordering::SeqCst) + 1;
            // A slow constructor widens the race window
            thread::sleep(std::time::Duration::from_millis(10));
            CounterService { constructions: n }
        })
        .unwrap();

    let container = Arc::new(bindings.build().unwrap());
    let thread_count = 8;
    let barrier = Arc::new(Barrier::new(thread_count));

    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let container = Arc::clone(&container);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait(); // synchronize first resolution
                container.get_required::<CounterService>()
            })
        })
        .collect();

    let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Exactly one construction, every thread sees that instance
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    for instance in &resolved[1..] {
        assert!(Arc::ptr_eq(&resolved[0], instance));
    }
    assert_eq!(resolved[0].constructions, 1);
}

#[test]
fn test_concurrent_scoped_once_per_container() {
    struct SessionState;

    let constructions = Arc::new(AtomicU32::new(0));
    let constructions_clone = constructions.clone();

    let mut bindings = BindingSet::new();
    bindings
        .add_scoped_factory::<SessionState, _>(move |_| {
            constructions_clone.fetch_add(1, Ordering::SeqCst);
            SessionState
        })
        .unwrap();

    let root = bindings.build().unwrap();
    let child_count = 4;
    let threads_per_child = 4;

    let mut handles = Vec::new();
    let mut children = Vec::new();
    for _ in 0..child_count {
        children.push(root.create_child());
    }

    let barrier = Arc::new(Barrier::new(child_count * threads_per_child));
    for child in &children {
        for _ in 0..threads_per_child {
            let child = child.clone();
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                child.get_required::<SessionState>()
            }));
        }
    }

    for h in handles {
        h.join().unwrap();
    }

    // One construction per child container, regardless of thread count
    assert_eq!(constructions.load(Ordering::SeqCst), child_count as u32);
}

#[test]
fn test_concurrent_transient_constructs_per_call() {
    struct Ticket;

    let constructions = Arc::new(AtomicU32::new(0));
    let constructions_clone = constructions.clone();

    let mut bindings = BindingSet::new();
    bindings
        .add_transient_factory::<Ticket, _>(move |_| {
            constructions_clone.fetch_add(1, Ordering::SeqCst);
            Ticket
        })
        .unwrap();

    let container = Arc::new(bindings.build().unwrap());
    let thread_count = 8;
    let calls_per_thread = 25;

    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let container = Arc::clone(&container);
            thread::spawn(move || {
                for _ in 0..calls_per_thread {
                    let _ = container.get_required::<Ticket>();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(
        constructions.load(Ordering::SeqCst),
        (thread_count * calls_per_thread) as u32
    );
}

#[test]
fn test_close_racing_with_resolution() {
    let mut bindings = BindingSet::new();
    bindings
        .add_transient_factory::<u64, _>(|_| {
            thread::sleep(std::time::Duration::from_micros(100));
            7u64
        })
        .unwrap();

    let container = Arc::new(bindings.build().unwrap());
    let barrier = Arc::new(Barrier::new(9));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut outcomes = Vec::new();
                for _ in 0..50 {
                    outcomes.push(container.get::<u64>());
                }
                outcomes
            })
        })
        .collect();

    barrier.wait();
    thread::sleep(std::time::Duration::from_millis(1));
    container.close();

    for h in handles {
        for outcome in h.join().unwrap() {
            // Each call either completed before the close or failed cleanly
            match outcome {
                Ok(v) => assert_eq!(*v, 7),
                Err(DiError::Closed) => {}
                Err(other) => panic!("Unexpected error: {:?}", other),
            }
        }
    }
    assert!(container.is_closed());
}

#[test]
fn test_concurrent_resolution_of_distinct_keys() {
    struct ServiceA;
    struct ServiceB;
    struct ServiceC {
        _a: Arc<ServiceA>,
        _b: Arc<ServiceB>,
    }

    let mut bindings = BindingSet::new();
    bindings
        .add_singleton_factory::<ServiceA, _>(|_| ServiceA)
        .unwrap();
    bindings
        .add_singleton_factory::<ServiceB, _>(|_| ServiceB)
        .unwrap();
    bindings
        .add_singleton_factory::<ServiceC, _>(|r| ServiceC {
            _a: r.get_required::<ServiceA>(),
            _b: r.get_required::<ServiceB>(),
        })
        .unwrap();

    let container = Arc::new(bindings.build().unwrap());
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let container = Arc::clone(&container);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                match i % 3 {
                    0 => {
                        let _ = container.get_required::<ServiceA>();
                    }
                    1 => {
                        let _ = container.get_required::<ServiceB>();
                    }
                    _ => {
                        let _ = container.get_required::<ServiceC>();
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
