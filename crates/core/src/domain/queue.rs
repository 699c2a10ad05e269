// Bounded Queue Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::job::{Job, JobId};

/// Fixed-capacity circular buffer of jobs.
///
/// Performs no internal locking: callers must hold exclusive access (the
/// engine wraps the queue in a mutex). Keeping the buffer free of
/// concurrency primitives keeps it testable in isolation.
///
/// Invariant: `0 <= count <= capacity`, and `count` always equals total
/// successful enqueues minus total successful dequeues.
#[derive(Debug)]
pub struct BoundedQueue {
    capacity: usize,
    slots: Box<[Option<Job>]>,
    count: usize,
    /// Next removal slot, modulo capacity
    head: usize,
    /// Next insertion slot, modulo capacity
    tail: usize,
    /// Total successful enqueues over the queue's lifetime
    enqueued: u64,
}

impl BoundedQueue {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DomainError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            slots: vec![None; capacity].into_boxed_slice(),
            count: 0,
            head: 0,
            tail: 0,
            enqueued: 0,
        })
    }

    /// Insert at the tail slot if a slot is free. Returns whether the
    /// insertion occurred.
    pub fn try_enqueue(&mut self, job: Job) -> bool {
        if self.count >= self.capacity {
            return false;
        }
        self.slots[self.tail] = Some(job);
        self.tail = (self.tail + 1) % self.capacity;
        self.count += 1;
        self.enqueued += 1;
        true
    }

    /// Remove and return the job at the head slot, if any.
    pub fn try_dequeue(&mut self) -> Option<Job> {
        if self.count == 0 {
            return None;
        }
        let job = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity;
        self.count -= 1;
        job
    }

    /// The id the next successfully enqueued job will carry: jobs are
    /// numbered by queue-insertion order, starting at 1.
    pub fn next_id(&self) -> JobId {
        self.enqueued + 1
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
