// SPDX-License-Identifier: MIT
//
// Conveyor: Bounded Blocking FIFO Queue for Thread Handoff
// Copyright (c) 2026 Conveyor Contributors
//
// https://github.com/conveyor-rs/conveyor

//! Bounded blocking FIFO queue for producer/consumer thread handoff
//!
//! This module implements [`Queue`], a thread-safe FIFO buffer with blocking,
//! non-blocking, and timeout-bounded insert/remove operations.
//!
//! # Design
//!
//! - A single `parking_lot::Mutex` owns all mutable state; `not_full` and
//!   `not_empty` condition variables are paired with it in the standard
//!   monitor discipline. Waits release the lock while suspended and re-check
//!   their predicate on every wake.
//! - A maxsize of `0` means **unbounded**: inserts never block and no bound
//!   check applies. Negative maxsize requests normalize to `0`; this is a
//!   deliberate policy of the queue, not an error.
//! - Timeouts are relative budgets converted to one absolute deadline at call
//!   entry, so spurious wakeups never stretch the total wait.
//! - Failures never corrupt the queue: after any `Full`/`Empty`/`Overflow`/
//!   `InvalidArgument` the buffer and counters are exactly as they were.
//!
//! # Wake order
//!
//! When several threads block on the same condition, which one observes a
//! satisfying signal is unspecified. The queue notifies broadly on every
//! state transition, so at least one eligible waiter always wakes.

use crate::bounds::{self, WaitMode};
use crate::error::{Error, PutError, Result};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Counters for queue activity, updated under the queue lock
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    /// Items committed by `put`/`put_many`
    pub items_put: u64,
    /// Items removed by `get`/`get_many`
    pub items_got: u64,
    /// Committed batch inserts
    pub batch_puts: u64,
    /// Committed batch removals
    pub batch_gets: u64,
    /// Inserts that gave up within their wait budget
    pub failures_full: u64,
    /// Removals that gave up within their wait budget
    pub failures_empty: u64,
}

pub(crate) struct Inner<T> {
    pub(crate) items: VecDeque<T>,
    pub(crate) unfinished_tasks: u64,
    pub(crate) stats: QueueStats,
}

pub(crate) struct Shared<T> {
    pub(crate) maxsize: usize,
    pub(crate) inner: Mutex<Inner<T>>,
    pub(crate) not_full: Condvar,
    pub(crate) not_empty: Condvar,
    pub(crate) all_tasks_done: Condvar,
}

impl<T> Shared<T> {
    /// Wait on `cond` until `ready` holds, within the caller's wait budget.
    ///
    /// Returns `false` when the budget elapsed (or `NoWait` found the
    /// predicate unmet). On `true` the guard is held with the predicate
    /// satisfied under the same lock acquisition.
    pub(crate) fn wait_until<F>(
        &self,
        cond: &Condvar,
        guard: &mut MutexGuard<'_, Inner<T>>,
        mode: WaitMode,
        mut ready: F,
    ) -> bool
    where
        F: FnMut(&Inner<T>) -> bool,
    {
        loop {
            if ready(&**guard) {
                return true;
            }
            match mode {
                WaitMode::NoWait => return false,
                WaitMode::Forever => {
                    cond.wait(guard);
                }
                WaitMode::Until(deadline) => {
                    if cond.wait_until(guard, deadline).timed_out() {
                        // The signal may have landed together with the
                        // deadline; check once more before giving up.
                        return ready(&**guard);
                    }
                }
            }
        }
    }
}

/// Thread-safe bounded FIFO queue with blocking semantics
///
/// A `Queue` hands opaque values from producer threads to consumer threads
/// under backpressure. Cloning the handle yields another reference to the
/// same queue. Items enter in `put`/[`put_many`](Queue::put_many) order and
/// leave in exactly that order; a committed batch occupies consecutive
/// positions.
pub struct Queue<T> {
    pub(crate) shared: Arc<Shared<T>>,
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("maxsize", &self.shared.maxsize)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    /// Create an unbounded queue.
    pub fn new() -> Self {
        Self::bounded(0)
    }

    /// Create a queue holding at most `maxsize` items; `0` means unbounded.
    pub fn bounded(maxsize: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                maxsize,
                inner: Mutex::new(Inner {
                    items: VecDeque::new(),
                    unfinished_tasks: 0,
                    stats: QueueStats::default(),
                }),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
                all_tasks_done: Condvar::new(),
            }),
        }
    }

    /// Create a queue from a raw maxsize request.
    ///
    /// Negative requests normalize to `0` (unbounded); magnitudes that do not
    /// fit the platform size type fail with [`Error::Overflow`].
    pub fn with_maxsize(maxsize: i128) -> Result<Self> {
        Ok(Self::bounded(bounds::normalize_maxsize(maxsize)?))
    }

    /// Insert one item.
    ///
    /// With `block` true and no `timeout`, waits until room is available.
    /// With a `timeout` (seconds), waits at most that long and fails with
    /// `Full` once the budget elapses. With `block` false, or a timeout of
    /// `0`, checks once and fails with `Full` immediately when the queue is
    /// at capacity. Unbounded queues never block here. The rejected item is
    /// handed back inside the error.
    pub fn put(&self, item: T, block: bool, timeout: Option<f64>) -> std::result::Result<(), PutError<T>> {
        let mode = match bounds::wait_mode(block, timeout) {
            Ok(mode) => mode,
            Err(err) => return Err(PutError::new(item, err)),
        };

        let shared = &*self.shared;
        let maxsize = shared.maxsize;
        let mut inner = shared.inner.lock();

        if maxsize > 0
            && !shared.wait_until(&shared.not_full, &mut inner, mode, |q| {
                q.items.len() < maxsize
            })
        {
            inner.stats.failures_full += 1;
            trace!(maxsize, "put gave up waiting for room");
            return Err(PutError::new(item, Error::Full));
        }

        inner.items.push_back(item);
        inner.unfinished_tasks += 1;
        inner.stats.items_put += 1;
        drop(inner);
        shared.not_empty.notify_all();
        Ok(())
    }

    /// Remove and return the head item.
    ///
    /// Symmetric to [`put`](Queue::put): waits per `block`/`timeout` until an
    /// item is available and fails with [`Error::Empty`] when the budget
    /// elapses first.
    pub fn get(&self, block: bool, timeout: Option<f64>) -> Result<T> {
        let mode = bounds::wait_mode(block, timeout)?;

        let shared = &*self.shared;
        let mut inner = shared.inner.lock();

        if !shared.wait_until(&shared.not_empty, &mut inner, mode, |q| {
            !q.items.is_empty()
        }) {
            inner.stats.failures_empty += 1;
            trace!("get gave up waiting for an item");
            return Err(Error::Empty);
        }

        // Predicate held under this same lock acquisition.
        let item = inner.items.pop_front().unwrap();
        inner.stats.items_got += 1;
        drop(inner);
        shared.not_full.notify_all();
        Ok(item)
    }

    /// Insert without blocking; equivalent to `put(item, false, None)`.
    pub fn put_nowait(&self, item: T) -> std::result::Result<(), PutError<T>> {
        self.put(item, false, None)
    }

    /// Remove without blocking; equivalent to `get(false, None)`.
    pub fn get_nowait(&self) -> Result<T> {
        self.get(false, None)
    }

    /// Current item count; a snapshot, not a guarantee.
    pub fn qsize(&self) -> usize {
        self.shared.inner.lock().items.len()
    }

    /// Normalized capacity; `0` means unbounded.
    pub fn maxsize(&self) -> usize {
        self.shared.maxsize
    }

    /// Check whether the queue currently holds no items.
    pub fn is_empty(&self) -> bool {
        self.qsize() == 0
    }

    /// Check whether the queue is at capacity; always `false` when unbounded.
    pub fn is_full(&self) -> bool {
        let maxsize = self.shared.maxsize;
        maxsize > 0 && self.qsize() >= maxsize
    }

    /// Snapshot of the activity counters.
    pub fn stats(&self) -> QueueStats {
        self.shared.inner.lock().stats.clone()
    }

    /// Acknowledge one previously inserted item as processed.
    ///
    /// Fails with [`Error::InvalidArgument`] when called more times than
    /// items were inserted.
    pub fn task_done(&self) -> Result<()> {
        let shared = &*self.shared;
        let mut inner = shared.inner.lock();
        if inner.unfinished_tasks == 0 {
            return Err(Error::InvalidArgument(
                "task_done() called too many times".to_string(),
            ));
        }
        inner.unfinished_tasks -= 1;
        if inner.unfinished_tasks == 0 {
            drop(inner);
            shared.all_tasks_done.notify_all();
        }
        Ok(())
    }

    /// Block until every inserted item has been acknowledged via
    /// [`task_done`](Queue::task_done).
    pub fn join(&self) {
        let shared = &*self.shared;
        let mut inner = shared.inner.lock();
        while inner.unfinished_tasks > 0 {
            shared.all_tasks_done.wait(&mut inner);
        }
    }
}
