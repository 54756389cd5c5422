//! Event loop implementation.
//!
//! The event loop is the host facility promises defer their callbacks to.
//! It owns a task queue, a microtask queue and a timer queue driven by a
//! virtual clock, so timer-based code runs deterministically and instantly.

use crate::config::EventLoopConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::task_queue::{MicroTask, MicrotaskQueue, Task, TaskQueue, TimerId, TimerQueue};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct Shared {
    config: EventLoopConfig,
    task_queue: RefCell<TaskQueue>,
    microtask_queue: RefCell<MicrotaskQueue>,
    timers: RefCell<TimerQueue>,
    now: Cell<u64>,
    next_promise_id: Cell<u64>,
}

/// The event loop.
///
/// `EventLoop` is a cheap handle: clones share the same queues. Promises keep
/// a clone so they can schedule their callbacks on the loop that created them.
///
/// Each turn of [`run_until_done`](EventLoop::run_until_done):
/// 1. Drains the microtask queue
/// 2. Runs the oldest task, or, if there is none, advances the clock to the
///    earliest timer and runs that
/// 3. Repeats until every queue is empty
///
/// # Examples
///
/// ```
/// use deferred::{EventLoop, Task};
///
/// let event_loop = EventLoop::new();
/// event_loop.set_timeout(20, Task::new(|| Ok(())));
/// event_loop.run_until_done().unwrap();
/// assert_eq!(event_loop.now(), 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLoop {
    shared: Rc<Shared>,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues and default configuration.
    pub fn new() -> Self {
        Self::with_config(EventLoopConfig::default())
    }

    /// Creates a new EventLoop with the given configuration.
    pub fn with_config(config: EventLoopConfig) -> Self {
        let now = Cell::new(config.start_time_ms);
        Self {
            shared: Rc::new(Shared {
                config,
                now,
                ..Shared::default()
            }),
        }
    }

    /// Returns the configuration this loop was created with.
    pub fn config(&self) -> &EventLoopConfig {
        &self.shared.config
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.shared.now.get()
    }

    /// Adds a task to the task queue.
    pub fn enqueue_task(&self, task: Task) {
        self.shared.task_queue.borrow_mut().enqueue(task);
    }

    /// Adds a microtask to the microtask queue.
    pub fn enqueue_microtask(&self, microtask: MicroTask) {
        self.shared.microtask_queue.borrow_mut().enqueue(microtask);
    }

    /// Runs `f` on a later turn, after the current call stack unwinds.
    ///
    /// Calls made in the same turn run in call order.
    pub fn schedule_later<F>(&self, f: F)
    where
        F: FnOnce() + 'static,
    {
        self.enqueue_microtask(MicroTask::new(f));
    }

    /// Schedules `task` to run once `delay_ms` of virtual time has passed.
    ///
    /// # Arguments
    ///
    /// * `delay_ms` - Delay relative to the current virtual time
    /// * `task` - The host task to run when the timer fires
    ///
    /// # Returns
    ///
    /// A [`TimerId`] that can be passed to [`clear_timeout`](Self::clear_timeout).
    pub fn set_timeout(&self, delay_ms: u64, task: Task) -> TimerId {
        let due = self.now().saturating_add(delay_ms);
        self.shared.timers.borrow_mut().schedule(due, task)
    }

    /// Cancels a timer. Returns false if it already fired or was cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.shared.timers.borrow_mut().cancel(id)
    }

    /// Returns true if the task queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.shared.task_queue.borrow().is_empty()
    }

    /// Returns true if the microtask queue is empty.
    pub fn is_microtask_queue_empty(&self) -> bool {
        self.shared.microtask_queue.borrow().is_empty()
    }

    /// Number of timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.shared.timers.borrow().len()
    }

    /// Runs the event loop until the task, microtask and timer queues are all
    /// empty.
    ///
    /// # Returns
    ///
    /// `Ok(())` once every queue is empty, or the first host task failure.
    /// When a configured limit trips, the work that would have run next stays
    /// queued and the clock is left untouched, so the loop can be resumed.
    pub fn run_until_done(&self) -> RuntimeResult<()> {
        let mut turns = 0usize;
        loop {
            self.run_all_microtasks()?;

            if self.is_task_queue_empty() && self.pending_timers() == 0 {
                break;
            }
            if let Some(limit) = self.shared.config.max_turns {
                if turns >= limit {
                    tracing::warn!(limit, "event loop turn limit reached");
                    return Err(RuntimeError::TurnLimitExceeded { limit });
                }
            }
            let Some(task) = self.next_task().or_else(|| self.fire_next_timer()) else {
                break;
            };

            turns += 1;
            tracing::debug!(turn = turns, now = self.now(), "running task");
            task.run()?;
        }
        tracing::debug!(turns, now = self.now(), "event loop idle");
        Ok(())
    }

    /// Runs all microtasks in the queue until empty.
    ///
    /// Microtasks enqueued while draining run in the same drain. If the
    /// configured budget runs out first, the remaining microtasks stay queued
    /// for the next drain.
    pub fn run_all_microtasks(&self) -> RuntimeResult<()> {
        let mut ran = 0usize;
        loop {
            if let Some(limit) = self.shared.config.microtask_budget {
                if ran >= limit && !self.is_microtask_queue_empty() {
                    tracing::warn!(limit, "microtask budget exhausted");
                    return Err(RuntimeError::MicrotaskBudgetExceeded { limit });
                }
            }
            let Some(microtask) = self.next_microtask() else {
                break;
            };
            ran += 1;
            microtask.run();
        }
        if ran > 0 {
            tracing::trace!(ran, "microtask queue drained");
        }
        Ok(())
    }

    /// Runs all queued tasks without draining microtasks between them.
    ///
    /// Primarily for testing.
    pub fn run_all_tasks(&self) -> RuntimeResult<()> {
        while let Some(task) = self.next_task() {
            task.run()?;
        }
        Ok(())
    }

    /// Processes one cycle: one task (or due timer) followed by all
    /// microtasks.
    pub fn process_one_cycle(&self) -> RuntimeResult<()> {
        if let Some(task) = self.next_task().or_else(|| self.fire_next_timer()) {
            task.run()?;
        }
        self.run_all_microtasks()
    }

    pub(crate) fn next_promise_id(&self) -> u64 {
        let id = self.shared.next_promise_id.get();
        self.shared.next_promise_id.set(id + 1);
        id
    }

    // Each helper releases its queue borrow before the job runs, so jobs can
    // enqueue more work.
    fn next_task(&self) -> Option<Task> {
        self.shared.task_queue.borrow_mut().dequeue()
    }

    fn next_microtask(&self) -> Option<MicroTask> {
        self.shared.microtask_queue.borrow_mut().dequeue()
    }

    fn fire_next_timer(&self) -> Option<Task> {
        let (id, task) = self.shared.timers.borrow_mut().pop_earliest()?;
        if id.due() > self.now() {
            self.shared.now.set(id.due());
        }
        tracing::debug!(due = id.due(), "timer fired");
        Some(task)
    }
}
