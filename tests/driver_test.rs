//! Tests for the polling driver: cadence, stop path, and RAII teardown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use refresh_scheduler::core::{AppResult, TaskQueue};
use refresh_scheduler::runtime::{PollDriver, TokioSpawner};

fn counting_action(counter: &Arc<AtomicUsize>) -> impl FnOnce() -> AppResult<()> + Send + 'static {
    let counter = Arc::clone(counter);
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_driver_fires_due_task_within_one_cadence() {
    let queue = Arc::new(TaskQueue::new());
    let fired = Arc::new(AtomicUsize::new(0));
    queue.schedule_after(counting_action(&fired), 0.0).unwrap();

    let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(500));
    let handle = driver.start(&TokioSpawner::current());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(queue.is_empty());

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn test_driver_keeps_polling_after_action_failure() {
    let queue = Arc::new(TaskQueue::new());
    let fired = Arc::new(AtomicUsize::new(0));

    queue
        .schedule_after(|| -> AppResult<()> { anyhow::bail!("boom") }, 0.0)
        .unwrap();

    let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(500));
    let handle = driver.start(&TokioSpawner::current());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(queue.is_empty());

    // The cadence survived the failure: a task scheduled afterwards fires.
    queue.schedule_after(counting_action(&fired), 0.0).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn test_driver_cadence_survives_panicking_action() {
    let queue = Arc::new(TaskQueue::new());
    let fired = Arc::new(AtomicUsize::new(0));

    queue
        .schedule_after(
            || -> AppResult<()> { panic!("cache handle poisoned") },
            0.0,
        )
        .unwrap();

    let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(500));
    let handle = driver.start(&TokioSpawner::current());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(queue.is_empty());

    // The loop outlived the panic: a task scheduled afterwards still fires.
    queue.schedule_after(counting_action(&fired), 0.0).unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_halts_the_loop() {
    let queue = Arc::new(TaskQueue::new());
    let fired = Arc::new(AtomicUsize::new(0));

    let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(500));
    let handle = driver.start(&TokioSpawner::current());
    tokio::time::sleep(Duration::from_millis(100)).await;

    handle.stop();
    assert!(handle.is_stopped());
    tokio::time::sleep(Duration::from_millis(100)).await;

    queue.schedule_after(counting_action(&fired), 0.0).unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    // Stopped driver never drains; the task stays pending.
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(queue.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let queue = Arc::new(TaskQueue::new());
    let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(500));
    let handle = driver.start(&TokioSpawner::current());

    handle.stop();
    handle.stop();
    assert!(handle.is_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_the_loop() {
    let queue = Arc::new(TaskQueue::new());
    let fired = Arc::new(AtomicUsize::new(0));

    let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(500));
    let handle = driver.start(&TokioSpawner::current());
    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(handle);
    tokio::time::sleep(Duration::from_millis(100)).await;

    queue.schedule_after(counting_action(&fired), 0.0).unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(queue.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_driver_real_time_smoke() {
    let queue = Arc::new(TaskQueue::new());
    let fired = Arc::new(AtomicUsize::new(0));
    queue.schedule_after(counting_action(&fired), 0.02).unwrap();

    let driver = PollDriver::new(Arc::clone(&queue), Duration::from_millis(10));
    let handle = driver.start(&TokioSpawner::current());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    handle.stop();
}
