// Worker - producer and consumer state machines

use std::sync::Arc;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

use crate::application::context::WorkerContext;
use crate::config::Timing;
use crate::domain::Job;
use crate::error::Result;
use crate::port::TimeProvider;
use crate::sync::AcquireOutcome;

/// What a worker does with the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Generates `jobs_remaining` jobs, then quits.
    Producer { jobs_remaining: u64 },
    /// Drains jobs until the bounded wait on `full` times out.
    Consumer,
}

/// Terminal state of a worker that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Producer exhausted its job quota
    Done,
    /// Producer found no empty slot within the bounded wait
    QuitNoSlot,
    /// Consumer found no job within the bounded wait
    QuitNoJobs,
}

/// One producer or consumer thread of execution.
///
/// All configuration is fixed at construction; the queue and semaphores are
/// reached through the shared context.
pub struct Worker {
    id: usize,
    role: Role,
    ctx: Arc<WorkerContext>,
    clock: Arc<dyn TimeProvider>,
    timing: Timing,
}

impl Worker {
    pub fn new(
        id: usize,
        role: Role,
        ctx: Arc<WorkerContext>,
        clock: Arc<dyn TimeProvider>,
        timing: Timing,
    ) -> Self {
        Self {
            id,
            role,
            ctx,
            clock,
            timing,
        }
    }

    /// Run the worker to a terminal state.
    ///
    /// A timed-out bounded wait is a graceful outcome, not an error; only
    /// a clock failure or a wait failing for another reason returns `Err`.
    pub async fn run(self) -> Result<Outcome> {
        match self.role {
            Role::Producer { jobs_remaining } => self.produce(jobs_remaining).await,
            Role::Consumer => self.consume().await,
        }
    }

    async fn produce(&self, mut jobs_remaining: u64) -> Result<Outcome> {
        debug!(producer = self.id, quota = jobs_remaining, "producer started");
        if jobs_remaining == 0 {
            self.emit(&format!(
                "Producer({}): No more jobs to generate. Quitting.",
                self.id
            ))
            .await?;
            return Ok(Outcome::Done);
        }
        loop {
            // Arrival jitter, slept before any acquisition.
            let delay = sample_units(self.timing.max_arrival_delay);
            if delay > 0 {
                sleep(self.timing.units(delay)).await;
            }

            self.anchor_wait().await?;
            match self
                .ctx
                .empty()
                .acquire_timeout(self.timing.acquire_timeout)
                .await
            {
                Ok(AcquireOutcome::Acquired) => {}
                Ok(AcquireOutcome::TimedOut) => {
                    self.emit(&format!(
                        "Producer({}): Empty slot not available after {} seconds. Quitting.",
                        self.id,
                        self.timing.acquire_timeout.as_secs()
                    ))
                    .await?;
                    return Ok(Outcome::QuitNoSlot);
                }
                Err(e) => {
                    self.ctx.notifier().emit_error(&format!("Error: {e}")).await?;
                    return Err(e);
                }
            }

            {
                let mut queue = self.ctx.queue().lock().await;
                let job = Job::new(queue.next_id(), sample_units(self.timing.max_job_duration));
                if queue.try_enqueue(job) {
                    // Emitted under the queue mutex so creation lines appear
                    // in id order.
                    self.emit(&format!(
                        "Producer({}): Job id {} duration {}",
                        self.id, job.id, job.duration
                    ))
                    .await?;
                    jobs_remaining -= 1;
                } else {
                    // Unreachable when semaphore accounting is correct: the
                    // empty acquisition already reserved this slot.
                    debug_assert!(false, "enqueue refused despite reserved empty slot");
                    warn!(producer = self.id, "enqueue refused despite reserved empty slot");
                }
            }
            // Counterpart release is unconditional, mirroring the slot
            // reservation rather than the enqueue result.
            self.ctx.full().release();

            if jobs_remaining == 0 {
                self.emit(&format!(
                    "Producer({}): No more jobs to generate. Quitting.",
                    self.id
                ))
                .await?;
                return Ok(Outcome::Done);
            }
        }
    }

    async fn consume(&self) -> Result<Outcome> {
        debug!(consumer = self.id, "consumer started");
        let mut last_job: Option<Job> = None;
        loop {
            self.anchor_wait().await?;
            match self
                .ctx
                .full()
                .acquire_timeout(self.timing.acquire_timeout)
                .await
            {
                Ok(AcquireOutcome::Acquired) => {}
                Ok(AcquireOutcome::TimedOut) => {
                    self.emit(&format!("Consumer({}): No jobs left. Quitting.", self.id))
                        .await?;
                    return Ok(Outcome::QuitNoJobs);
                }
                Err(e) => {
                    self.ctx.notifier().emit_error(&format!("Error: {e}")).await?;
                    return Err(e);
                }
            }

            {
                let mut queue = self.ctx.queue().lock().await;
                match queue.try_dequeue() {
                    Some(job) => {
                        self.emit(&format!(
                            "Consumer({}): Job id {} executing sleep duration {}",
                            self.id, job.id, job.duration
                        ))
                        .await?;
                        last_job = Some(job);
                    }
                    None => {
                        debug_assert!(false, "dequeue empty despite reserved full slot");
                        warn!(consumer = self.id, "dequeue empty despite reserved full slot");
                    }
                }
            }
            self.ctx.empty().release();

            // Model execution outside the critical section. If the dequeue
            // hit the defensive branch above, the last held job's duration
            // is reused; a consumer that never held a job skips the sleep.
            if let Some(job) = last_job {
                sleep(self.timing.units(job.duration)).await;
                self.emit(&format!("Consumer({}): Job id {} completed.", self.id, job.id))
                    .await?;
            }
        }
    }

    /// Read the clock that anchors the next bounded wait. Failure is fatal
    /// for this worker only.
    async fn anchor_wait(&self) -> Result<()> {
        match self.clock.now_millis() {
            Ok(now) => {
                trace!(worker = self.id, anchor_ms = now, "bounded wait anchored");
                Ok(())
            }
            Err(e) => {
                self.ctx
                    .notifier()
                    .emit_error("Error: Clock time cannot be retrieved")
                    .await?;
                Err(e)
            }
        }
    }

    async fn emit(&self, line: &str) -> Result<()> {
        self.ctx.notifier().emit(line).await
    }
}

/// Uniform sample in `[1, max]` time units; zero `max` means none.
fn sample_units(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(1..=max)
}
