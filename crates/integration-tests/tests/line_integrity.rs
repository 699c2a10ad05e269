// Notification-line integrity under many concurrent workers

use std::time::Duration;

use jobflow_core::notify::NotificationChannel;
use jobflow_core::{Engine, RunConfig, Timing};

const MAX_JOB_DURATION: u64 = 3;

fn busy_config() -> RunConfig {
    let mut cfg = RunConfig::new(3, 4, 3, 2);
    cfg.timing = Timing {
        acquire_timeout: Duration::from_millis(300),
        time_unit: Duration::from_millis(1),
        max_arrival_delay: 2,
        max_job_duration: MAX_JOB_DURATION,
    };
    cfg
}

enum Line {
    Created { id: u64, duration: u64 },
    Executing { id: u64, duration: u64 },
    Completed { id: u64 },
    Quitting,
}

/// Parse a status line, panicking on anything outside the known formats.
/// A garbled or partially written line fails here.
fn parse(line: &str) -> Line {
    let (prefix, body) = line
        .split_once("): ")
        .unwrap_or_else(|| panic!("malformed line: {line:?}"));
    assert!(
        prefix.starts_with("Producer(") || prefix.starts_with("Consumer("),
        "unknown worker prefix: {line:?}"
    );
    prefix
        .rsplit('(')
        .next()
        .unwrap()
        .parse::<u64>()
        .unwrap_or_else(|_| panic!("bad worker id: {line:?}"));

    if body == "No more jobs to generate. Quitting."
        || body == "No jobs left. Quitting."
        || body.starts_with("Empty slot not available after")
    {
        return Line::Quitting;
    }

    let rest = body
        .strip_prefix("Job id ")
        .unwrap_or_else(|| panic!("unknown line body: {line:?}"));
    let mut parts = rest.split_whitespace();
    let id_token = parts.next().unwrap_or_else(|| panic!("missing id: {line:?}"));

    if rest.contains("executing sleep duration") {
        let id = id_token.parse().unwrap();
        let duration: u64 = rest.rsplit(' ').next().unwrap().parse().unwrap();
        Line::Executing { id, duration }
    } else if rest.ends_with("completed.") {
        let id = id_token.parse().unwrap();
        Line::Completed { id }
    } else if rest.contains("duration") {
        let id = id_token.parse().unwrap();
        let duration: u64 = rest.rsplit(' ').next().unwrap().parse().unwrap();
        Line::Created { id, duration }
    } else {
        panic!("unknown line body: {line:?}");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_workers_emit_only_whole_well_formed_lines() {
    let (notifier, output) = NotificationChannel::capture();
    let report = Engine::new(busy_config())
        .with_notifier(notifier)
        .run()
        .await
        .unwrap();
    assert_eq!(report.exit_code(), 0);

    let total_jobs = 3 * 4; // producers x quota
    let mut created_ids = Vec::new();
    let mut executing_ids = Vec::new();
    let mut completed_ids = Vec::new();

    for line in output.lines() {
        match parse(&line) {
            Line::Created { id, duration } => {
                assert!(
                    (1..=MAX_JOB_DURATION).contains(&duration),
                    "duration out of range: {line:?}"
                );
                created_ids.push(id);
            }
            Line::Executing { id, duration } => {
                assert!(
                    (1..=MAX_JOB_DURATION).contains(&duration),
                    "duration out of range: {line:?}"
                );
                executing_ids.push(id);
            }
            Line::Completed { id } => completed_ids.push(id),
            Line::Quitting => {}
        }
    }

    // Each id appears exactly once per phase: ids are assigned in
    // insertion order, so the creation stream is exactly 1..=N in order.
    assert_eq!(created_ids, (1..=total_jobs).collect::<Vec<u64>>());

    // FIFO: dequeues happen in insertion order, and executing lines are
    // emitted under the queue mutex, so they are strictly ordered too.
    assert_eq!(executing_ids, (1..=total_jobs).collect::<Vec<u64>>());

    // Completions run outside the critical section and may reorder, but
    // every job completes exactly once.
    completed_ids.sort_unstable();
    assert_eq!(completed_ids, (1..=total_jobs).collect::<Vec<u64>>());
}
