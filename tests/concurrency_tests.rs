//! Multi-threaded tests for the locked queue and cross-queue merge
//!
//! These exercise the guarantees that only matter under contention:
//! - concurrent inserts and extracts never lose or duplicate items
//! - merges of the same pair issued in opposite order do not deadlock
//! - merge operands stay usable while a merge is copying them

use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use rust_skew_heap::{merge_queues, Prioritized, SkewHeap};

const THREADS: usize = 8;
const PER_THREAD: i32 = 500;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn drain<T: Prioritized>(queue: &SkewHeap<T>) -> Vec<T> {
    std::iter::from_fn(|| queue.extract().ok()).collect()
}

#[test]
fn test_concurrent_inserts() {
    init_tracing();
    let queue = Arc::new(SkewHeap::new());

    thread::scope(|scope| {
        for t in 0..THREADS {
            let queue = Arc::clone(&queue);
            scope.spawn(move || {
                let base = t as i32 * PER_THREAD;
                for i in 0..PER_THREAD {
                    queue.insert(base + i);
                }
            });
        }
    });

    let total = THREADS as i32 * PER_THREAD;
    assert_eq!(queue.len(), total as usize);
    assert_eq!(drain(&queue), (0..total).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_extracts_partition_items() {
    let total = THREADS as i32 * PER_THREAD;
    let queue: SkewHeap<i32> = (0..total).rev().collect();

    let mut taken: Vec<i32> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    let mut mine = Vec::new();
                    while let Ok(value) = queue.extract() {
                        mine.push(value);
                    }
                    // Each thread sees its own extractions in ascending order
                    assert!(mine.windows(2).all(|pair| pair[0] < pair[1]));
                    mine
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect()
    });

    taken.sort_unstable();
    assert_eq!(taken, (0..total).collect::<Vec<_>>());
    assert!(queue.is_empty());
}

#[test]
fn test_mixed_producers_and_consumers() {
    let queue = SkewHeap::new();
    let barrier = Barrier::new(4);
    let produced = 2 * 1000;

    let consumed: usize = thread::scope(|scope| {
        for p in 0..2 {
            let (queue, barrier) = (&queue, &barrier);
            scope.spawn(move || {
                barrier.wait();
                for i in 0..1000 {
                    queue.insert(p * 1000 + i);
                }
            });
        }

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let (queue, barrier) = (&queue, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    let mut count = 0;
                    for _ in 0..500 {
                        if queue.extract().is_ok() {
                            count += 1;
                        }
                        let _ = queue.peek();
                    }
                    count
                })
            })
            .collect();

        consumers.into_iter().map(|c| c.join().unwrap()).sum()
    });

    assert_eq!(queue.len(), produced - consumed);
    let rest = drain(&queue);
    assert!(rest.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_opposite_order_merges_do_not_deadlock() {
    init_tracing();
    let a: Arc<SkewHeap<i32>> = Arc::new((0..2000).collect());
    let b: Arc<SkewHeap<i32>> = Arc::new((2000..4000).collect());

    let (done_tx, done_rx) = mpsc::channel();
    let rounds = 50;

    for forward in [true, false] {
        let (a, b, done_tx) = (Arc::clone(&a), Arc::clone(&b), done_tx.clone());
        thread::spawn(move || {
            for _ in 0..rounds {
                let merged = if forward {
                    merge_queues(&a, &b)
                } else {
                    merge_queues(&b, &a)
                };
                assert_eq!(merged.len(), 4000);
            }
            let _ = done_tx.send(());
        });
    }

    for _ in 0..2 {
        done_rx
            .recv_timeout(Duration::from_secs(60))
            .expect("merge threads must finish without deadlocking");
    }

    assert_eq!(a.len(), 2000);
    assert_eq!(b.len(), 2000);
}

#[test]
fn test_merge_while_operands_are_mutated() {
    let a: SkewHeap<i32> = (0..1000).collect();
    let b: SkewHeap<i32> = (1000..2000).collect();

    thread::scope(|scope| {
        scope.spawn(|| {
            for i in 2000..3000 {
                a.insert(i);
            }
        });
        scope.spawn(|| {
            for _ in 0..500 {
                let _ = b.extract();
            }
        });
        scope.spawn(|| {
            for _ in 0..20 {
                let merged = a.merge(&b);
                // Each snapshot is internally consistent even mid-mutation
                let len = merged.len();
                let drained = merged.into_sorted_vec();
                assert_eq!(drained.len(), len);
                assert!(drained.windows(2).all(|pair| pair[0] <= pair[1]));
            }
        });
    });

    assert_eq!(a.len(), 2000);
    assert_eq!(b.len(), 500);
    assert_eq!(drain(&b), (1500..2000).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_self_merge() {
    let queue: SkewHeap<i32> = (0..100).collect();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let doubled = queue.merge(&queue);
                assert_eq!(doubled.len(), 200);
                let head: Vec<i32> = doubled.into_sorted_vec().into_iter().take(4).collect();
                assert_eq!(head, vec![0, 0, 1, 1]);
            });
        }
    });

    assert_eq!(queue.len(), 100);
}

#[test]
fn test_shared_items_across_merge() {
    #[derive(Debug)]
    struct Task {
        id: u32,
        deadline: i64,
    }

    impl Prioritized for Task {
        fn priority(&self) -> i64 {
            self.deadline
        }
    }

    let urgent = Arc::new(Task { id: 1, deadline: 5 });
    let a = SkewHeap::new();
    let b = SkewHeap::new();
    a.insert(Arc::clone(&urgent));
    b.insert(Arc::new(Task { id: 2, deadline: 10 }));

    let merged = a.merge(&b);
    let head = merged.extract().expect("merged queue holds two tasks");
    assert!(Arc::ptr_eq(&head, &urgent));
    assert_eq!(head.id, 1);

    // The merged queue and `a` share the task, not the tree
    assert_eq!(Arc::strong_count(&urgent), 3);
    assert_eq!(a.len(), 1);
}
