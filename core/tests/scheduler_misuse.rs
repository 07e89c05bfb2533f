mod common;

use std::sync::Arc;
use std::time::Duration;

use common::delay_task;
use taskpool_core::api::{Scheduler, SchedulerError, SchedulerState};

#[test]
fn test_zero_concurrency_is_rejected() {
    let err = Scheduler::new(0).err().unwrap();
    assert!(matches!(err, SchedulerError::InvalidConcurrency(0)));
    assert!(err.is_misuse());
}

#[tokio::test]
async fn test_second_run_is_rejected() {
    let scheduler = Scheduler::new(2).unwrap();
    scheduler
        .add_task(delay_task("once", Duration::ZERO))
        .unwrap();

    let first = scheduler.run().await.unwrap();
    let err = scheduler.run().await.unwrap_err();
    assert!(matches!(err, SchedulerError::AlreadyCompleted));

    // the first run's data is untouched
    assert_eq!(scheduler.report().unwrap().run_id, first.run_id);
    assert_eq!(scheduler.results().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_run_is_rejected() {
    let scheduler = Arc::new(Scheduler::new(1).unwrap());
    scheduler
        .add_task(delay_task("slow", Duration::from_millis(200)))
        .unwrap();

    let background = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run().await })
    };

    // wait until the first run has left Idle
    while scheduler.state() == SchedulerState::Idle {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let err = scheduler.run().await.unwrap_err();
    assert!(matches!(err, SchedulerError::AlreadyRunning));
    assert!(matches!(
        scheduler.results(),
        Err(SchedulerError::NotFinished(_))
    ));

    let report = background.await.unwrap().unwrap();
    assert_eq!(report.total_tasks, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_add_after_run_started_is_rejected() {
    let scheduler = Arc::new(Scheduler::new(1).unwrap());
    scheduler
        .add_task(delay_task("first", Duration::from_millis(100)))
        .unwrap();

    let background = {
        let scheduler = scheduler.clone();
        tokio::spawn(async move { scheduler.run().await })
    };
    while scheduler.state() == SchedulerState::Idle {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let err = scheduler
        .add_task(delay_task("late", Duration::ZERO))
        .unwrap_err();
    assert!(matches!(err, SchedulerError::TasksFrozen(ref name) if name == "late"));

    let report = background.await.unwrap().unwrap();
    assert_eq!(report.total_tasks, 1);

    // still frozen after completion
    assert!(scheduler
        .add_task(delay_task("later", Duration::ZERO))
        .is_err());
    assert_eq!(scheduler.task_count(), 1);
}

#[tokio::test]
async fn test_independent_schedulers_do_not_share_state() {
    let a = Scheduler::new(1).unwrap();
    let b = Scheduler::new(1).unwrap();
    a.add_task(delay_task("a", Duration::ZERO)).unwrap();

    a.run().await.unwrap();
    assert_eq!(b.state(), SchedulerState::Idle);
    assert_eq!(b.task_count(), 0);
    b.run().await.unwrap();
    assert!(b.results().unwrap().is_empty());
}
