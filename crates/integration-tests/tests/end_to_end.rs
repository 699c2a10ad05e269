// Full-run behavior: notification stream contents for clean runs

use std::time::Duration;

use jobflow_core::notify::NotificationChannel;
use jobflow_core::{Engine, RunConfig, Timing};

fn fast_timing() -> Timing {
    Timing {
        acquire_timeout: Duration::from_millis(200),
        time_unit: Duration::from_millis(1),
        max_arrival_delay: 2,
        max_job_duration: 3,
    }
}

fn fast_config(capacity: usize, jobs: u64, producers: usize, consumers: usize) -> RunConfig {
    let mut cfg = RunConfig::new(capacity, jobs, producers, consumers);
    cfg.timing = fast_timing();
    cfg
}

/// Extract `X` from a `... Job id X ...` line.
fn job_id(line: &str) -> u64 {
    let rest = line
        .split("Job id ")
        .nth(1)
        .unwrap_or_else(|| panic!("no job id in line: {line}"));
    rest.split_whitespace()
        .next()
        .unwrap()
        .trim_end_matches('.')
        .parse()
        .unwrap_or_else(|_| panic!("bad job id in line: {line}"))
}

#[tokio::test(flavor = "multi_thread")]
async fn single_producer_single_consumer_capacity_one() {
    let (notifier, output) = NotificationChannel::capture();
    let report = Engine::new(fast_config(1, 3, 1, 1))
        .with_notifier(notifier)
        .run()
        .await
        .unwrap();

    assert_eq!(report.exit_code(), 0);

    let lines = output.lines();
    let created: Vec<u64> = lines
        .iter()
        .filter(|l| l.starts_with("Producer(0): Job id "))
        .map(|l| job_id(l))
        .collect();
    let completed: Vec<u64> = lines
        .iter()
        .filter(|l| l.contains("completed."))
        .map(|l| job_id(l))
        .collect();

    assert_eq!(created, vec![1, 2, 3]);
    assert_eq!(completed, vec![1, 2, 3]);
    assert!(lines.contains(&"Producer(0): No more jobs to generate. Quitting.".to_string()));
    assert!(lines.contains(&"Consumer(0): No jobs left. Quitting.".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn every_created_job_is_executed_and_completed_exactly_once() {
    // 2 producers x 3 jobs each, 2 consumers, capacity 2.
    let (notifier, output) = NotificationChannel::capture();
    let report = Engine::new(fast_config(2, 3, 2, 2))
        .with_notifier(notifier)
        .run()
        .await
        .unwrap();

    assert_eq!(report.exit_code(), 0);

    let lines = output.lines();
    let mut created: Vec<u64> = lines
        .iter()
        .filter(|l| l.contains("): Job id ") && l.contains(" duration ") && l.starts_with("Producer("))
        .map(|l| job_id(l))
        .collect();
    let mut executed: Vec<u64> = lines
        .iter()
        .filter(|l| l.contains("executing sleep duration"))
        .map(|l| job_id(l))
        .collect();
    let mut completed: Vec<u64> = lines
        .iter()
        .filter(|l| l.contains("completed."))
        .map(|l| job_id(l))
        .collect();

    // Creation lines are emitted under the queue mutex, so they appear in
    // id order even across producers.
    assert_eq!(created, (1..=6).collect::<Vec<u64>>());

    created.sort_unstable();
    executed.sort_unstable();
    completed.sort_unstable();
    assert_eq!(created, executed, "every created job executed exactly once");
    assert_eq!(created, completed, "every executed job completed exactly once");
}
