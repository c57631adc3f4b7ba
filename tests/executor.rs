//! Bounded Executor Integration Tests
//!
//! Tests for the concurrency ceiling, result collection and error propagation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wiki_cursors::core::executor::{bounded_collect, bounded_execute};

/// Tracks how many tasks are running at once
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn test_all_results_returned() {
    let tasks = (1..=5u64).map(|n| {
        move || async move {
            tokio::time::sleep(Duration::from_millis(10 * (6 - n))).await;
            Ok::<_, String>(n)
        }
    });

    let mut results = bounded_execute(tasks, 2).await.unwrap();
    results.sort();
    assert_eq!(results, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_limit_is_never_exceeded() {
    for limit in [1, 2, 3, 7] {
        let tracker = Arc::new(InFlight::default());

        let tasks = (0..12u64).map(|n| {
            let tracker = tracker.clone();
            move || async move {
                tracker.enter();
                tokio::time::sleep(Duration::from_millis(5 + n % 3)).await;
                tracker.exit();
                Ok::<_, String>(n)
            }
        });

        let results = bounded_execute(tasks, limit).await.unwrap();
        assert_eq!(results.len(), 12);
        assert!(
            tracker.peak() <= limit,
            "peak {} exceeded limit {}",
            tracker.peak(),
            limit
        );
        assert_eq!(tracker.peak(), limit.min(12));
    }
}

#[tokio::test]
async fn test_limit_above_task_count() {
    let tracker = Arc::new(InFlight::default());

    let tasks = (0..3).map(|n| {
        let tracker = tracker.clone();
        move || async move {
            tracker.enter();
            tokio::time::sleep(Duration::from_millis(10)).await;
            tracker.exit();
            n
        }
    });

    let results = bounded_collect(tasks, 100).await;
    assert_eq!(results.len(), 3);
    assert_eq!(tracker.peak(), 3);
}

#[tokio::test]
async fn test_results_in_completion_order() {
    let delays = [30u64, 10, 20];
    let tasks = delays.into_iter().map(|delay| {
        move || async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            delay
        }
    });

    let results = bounded_collect(tasks, 3).await;
    assert_eq!(results, vec![10, 20, 30]);
}

#[tokio::test]
async fn test_empty_task_list() {
    let tasks: Vec<fn() -> std::future::Ready<u32>> = Vec::new();
    assert!(bounded_collect(tasks, 4).await.is_empty());
}

#[tokio::test]
async fn test_error_propagates() {
    let tasks = (0..5).map(|n| {
        move || async move {
            if n == 2 {
                Err(format!("task {} failed", n))
            } else {
                Ok(n)
            }
        }
    });

    let result = bounded_execute(tasks, 2).await;
    assert_eq!(result.unwrap_err(), "task 2 failed");
}

#[tokio::test]
async fn test_in_flight_sibling_survives_error() {
    let finished = Arc::new(AtomicUsize::new(0));
    let started = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..3u64)
        .map(|n| {
            let finished = finished.clone();
            let started = started.clone();
            move || {
                started.fetch_add(1, Ordering::SeqCst);
                async move {
                    match n {
                        0 => {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            finished.fetch_add(1, Ordering::SeqCst);
                            Ok(n)
                        }
                        1 => Err(format!("task {} failed", n)),
                        _ => {
                            tokio::time::sleep(Duration::from_millis(200)).await;
                            Ok(n)
                        }
                    }
                }
            }
        })
        .collect();

    let result = bounded_execute(tasks, 2).await;
    assert_eq!(result.unwrap_err(), "task 1 failed");
    assert_eq!(finished.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert_eq!(started.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_tasks_start_lazily() {
    let started = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..4)
        .map(|n| {
            let started = started.clone();
            move || {
                started.fetch_add(1, Ordering::SeqCst);
                async move { n }
            }
        })
        .collect();

    assert_eq!(started.load(Ordering::SeqCst), 0);
    let results = bounded_collect(tasks, 1).await;
    assert_eq!(results.len(), 4);
    assert_eq!(started.load(Ordering::SeqCst), 4);
}
