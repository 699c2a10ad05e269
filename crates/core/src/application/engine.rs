// Engine - spawns workers, joins them all, reports terminal states

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::application::context::WorkerContext;
use crate::application::worker::{Outcome, Role, Worker};
use crate::config::RunConfig;
use crate::error::{CoreError, Result, EXIT_OK};
use crate::notify::NotificationChannel;
use crate::port::{SystemTimeProvider, TimeProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerKind {
    Producer,
    Consumer,
}

impl std::fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerKind::Producer => write!(f, "producer"),
            WorkerKind::Consumer => write!(f, "consumer"),
        }
    }
}

/// Terminal record of one worker.
#[derive(Debug)]
pub struct WorkerRecord {
    pub kind: WorkerKind,
    pub id: usize,
    pub result: Result<Outcome>,
}

/// What every worker ended as, in join order.
#[derive(Debug, Default)]
pub struct RunReport {
    records: Vec<WorkerRecord>,
}

impl RunReport {
    pub fn records(&self) -> &[WorkerRecord] {
        &self.records
    }

    /// Fatal worker errors, in join order.
    pub fn fatal_errors(&self) -> impl Iterator<Item = &CoreError> {
        self.records.iter().filter_map(|r| r.result.as_ref().err())
    }

    /// Process exit code for the run: 0 when every worker reached a
    /// graceful terminal state, otherwise the first fatal error's code.
    pub fn exit_code(&self) -> i32 {
        self.fatal_errors()
            .next()
            .map(CoreError::exit_code)
            .unwrap_or(EXIT_OK)
    }
}

/// Drives one full run: builds the shared context, spawns every producer
/// and consumer, and blocks until all of them reach a terminal state.
///
/// Individual worker failures never cancel siblings; the engine simply
/// joins everything and reports.
pub struct Engine {
    config: RunConfig,
    clock: Arc<dyn TimeProvider>,
    notifier: Option<NotificationChannel>,
}

impl Engine {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemTimeProvider),
            notifier: None,
        }
    }

    /// Replace the system clock (for deterministic testing).
    pub fn with_time_provider(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the stdout/stderr notification channel (for testing and
    /// embedding).
    pub fn with_notifier(mut self, notifier: NotificationChannel) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn run(self) -> Result<RunReport> {
        self.config.validate()?;

        let notifier = self.notifier.unwrap_or_else(NotificationChannel::stdio);
        let ctx = Arc::new(WorkerContext::new(self.config.queue_capacity, notifier)?);

        info!(
            capacity = self.config.queue_capacity,
            jobs_per_producer = self.config.jobs_per_producer,
            producers = self.config.producers,
            consumers = self.config.consumers,
            "run starting"
        );

        let mut tasks: JoinSet<Result<Outcome>> = JoinSet::new();
        let mut identities: HashMap<tokio::task::Id, (WorkerKind, usize)> = HashMap::new();

        for i in 0..self.config.producers {
            let worker = Worker::new(
                i,
                Role::Producer {
                    jobs_remaining: self.config.jobs_per_producer,
                },
                Arc::clone(&ctx),
                Arc::clone(&self.clock),
                self.config.timing.clone(),
            );
            let handle = tasks.spawn(worker.run());
            identities.insert(handle.id(), (WorkerKind::Producer, i));
        }
        for i in 0..self.config.consumers {
            let worker = Worker::new(
                i,
                Role::Consumer,
                Arc::clone(&ctx),
                Arc::clone(&self.clock),
                self.config.timing.clone(),
            );
            let handle = tasks.spawn(worker.run());
            identities.insert(handle.id(), (WorkerKind::Consumer, i));
        }

        let mut report = RunReport::default();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((task_id, result)) => {
                    let (kind, id) = identities[&task_id];
                    match &result {
                        Ok(outcome) => info!(%kind, id, ?outcome, "worker finished"),
                        Err(e) => error!(%kind, id, error = %e, "worker failed"),
                    }
                    report.records.push(WorkerRecord { kind, id, result });
                }
                Err(join_err) => {
                    // A worker panic must not take the run down; surface it
                    // as an internal error on the affected worker.
                    let (kind, id) = identities[&join_err.id()];
                    error!(%kind, id, error = %join_err, "worker panicked");
                    report.records.push(WorkerRecord {
                        kind,
                        id,
                        result: Err(CoreError::Internal(format!(
                            "worker panicked: {join_err}"
                        ))),
                    });
                }
            }
        }

        info!(exit_code = report.exit_code(), "run finished");
        Ok(report)
    }
}
