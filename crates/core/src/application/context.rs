// Shared Worker Context
//
// The queue and the semaphores are the only state shared between workers.
// One reference-counted context replaces the original design's raw pointers
// into a process-global semaphore array: the queue is owned here, guarded
// by its mutex, and exposed only through try_enqueue/try_dequeue.

use tokio::sync::Mutex;

use crate::domain::BoundedQueue;
use crate::error::Result;
use crate::notify::NotificationChannel;
use crate::sync::SlotSemaphore;

pub struct WorkerContext {
    /// Queue mutation is serialized through this mutex (the `mutex`
    /// counter of the semaphore set). Not time-bounded: hold time is
    /// bounded by the critical section, never by external waiting.
    queue: Mutex<BoundedQueue>,
    /// Free slots a producer may reserve. Initial value = capacity.
    empty: SlotSemaphore,
    /// Occupied slots a consumer may reserve. Initial value = 0.
    full: SlotSemaphore,
    notifier: NotificationChannel,
}

impl WorkerContext {
    pub fn new(capacity: usize, notifier: NotificationChannel) -> Result<Self> {
        let queue = BoundedQueue::new(capacity)?;
        Ok(Self {
            queue: Mutex::new(queue),
            empty: SlotSemaphore::new("empty", capacity),
            full: SlotSemaphore::new("full", 0),
            notifier,
        })
    }

    pub fn queue(&self) -> &Mutex<BoundedQueue> {
        &self.queue
    }

    pub fn empty(&self) -> &SlotSemaphore {
        &self.empty
    }

    pub fn full(&self) -> &SlotSemaphore {
        &self.full
    }

    pub fn notifier(&self) -> &NotificationChannel {
        &self.notifier
    }
}
