//! Cancellable scheduled tasks and clocks.
//!
//! Time is host-driven: callers pass `now` in milliseconds and poll for due
//! work. A [`Scheduler`] holds at most one pending task, so scheduling a new
//! task always cancels the previous one.

use std::cell::Cell;
use std::fmt;

use tracing::debug;

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTask {
    id: TaskId,
    due_at: f64,
}

/// Single-slot scheduler.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: Option<PendingTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task due at `due_at`, cancelling any pending task.
    pub fn schedule(&mut self, due_at: f64) -> TaskId {
        if let Some(previous) = self.cancel() {
            debug!(task = %previous, "replaced pending task");
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending = Some(PendingTask { id, due_at });
        id
    }

    /// Drop the pending task, if any. A cancelled task never fires.
    pub fn cancel(&mut self) -> Option<TaskId> {
        self.pending.take().map(|task| task.id)
    }

    /// Fire the pending task if it is due at `now`.
    pub fn poll(&mut self, now: f64) -> Option<TaskId> {
        match self.pending {
            Some(task) if now >= task.due_at => {
                self.pending = None;
                Some(task.id)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<TaskId> {
        self.pending.map(|task| task.id)
    }

    pub fn due_at(&self) -> Option<f64> {
        self.pending.map(|task| task.due_at)
    }
}

/// Source of the current time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand. Used for deterministic hosts and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, dt_ms: f64) {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.now.set(self.now.get() + dt_ms);
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
