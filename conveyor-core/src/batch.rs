//! Atomic multi-item transfer
//!
//! `put_many` and `get_many` move whole batches under a single lock hold, so
//! no other thread ever observes a partial batch. Batch size is validated
//! against the queue's declared capacity rather than its current free space,
//! so a batch that could never fit fails with [`Error::InvalidArgument`] even
//! on an empty queue.

use crate::bounds;
use crate::error::{Error, PutError, Result};
use crate::queue::Queue;
use tracing::trace;

impl<T> Queue<T> {
    /// Insert all of `items` as one atomic batch.
    ///
    /// Waits, per `block`/`timeout`, until the queue has room for the entire
    /// batch, then appends every item under one lock hold; the items occupy
    /// consecutive FIFO positions. A batch larger than the declared maxsize
    /// can never fit and fails up front. On failure the whole batch is
    /// handed back inside the error.
    pub fn put_many(
        &self,
        items: Vec<T>,
        block: bool,
        timeout: Option<f64>,
    ) -> std::result::Result<(), PutError<Vec<T>>> {
        let mode = match bounds::wait_mode(block, timeout) {
            Ok(mode) => mode,
            Err(err) => return Err(PutError::new(items, err)),
        };

        let shared = &*self.shared;
        let maxsize = shared.maxsize;
        let n = items.len();

        if maxsize > 0 && n > maxsize {
            return Err(PutError::new(
                items,
                Error::InvalidArgument(format!(
                    "items of size {} is bigger than maxsize: {}",
                    n, maxsize
                )),
            ));
        }
        if n == 0 {
            return Ok(());
        }

        let mut inner = shared.inner.lock();

        if maxsize > 0
            && !shared.wait_until(&shared.not_full, &mut inner, mode, |q| {
                maxsize - q.items.len() >= n
            })
        {
            inner.stats.failures_full += 1;
            trace!(n, maxsize, "put_many gave up waiting for room");
            return Err(PutError::new(items, Error::Full));
        }

        inner.items.extend(items);
        inner.unfinished_tasks += n as u64;
        inner.stats.items_put += n as u64;
        inner.stats.batch_puts += 1;
        drop(inner);
        shared.not_empty.notify_all();
        Ok(())
    }

    /// Remove exactly `n` items as one atomic batch.
    ///
    /// Waits, per `block`/`timeout`, until `n` items are available, then
    /// removes them under one lock hold and returns them in FIFO order as a
    /// fixed-length sequence. Requesting more than the declared maxsize is
    /// always invalid, whatever the queue currently holds; an insufficient
    /// supply within the wait budget yields [`Error::Empty`].
    pub fn get_many(&self, n: usize, block: bool, timeout: Option<f64>) -> Result<Box<[T]>> {
        let mode = bounds::wait_mode(block, timeout)?;

        let shared = &*self.shared;
        let maxsize = shared.maxsize;

        if maxsize > 0 && n > maxsize {
            return Err(Error::InvalidArgument(format!(
                "you want to get {} but maxsize is {}",
                n, maxsize
            )));
        }
        if n == 0 {
            return Ok(Vec::new().into_boxed_slice());
        }

        let mut inner = shared.inner.lock();

        if !shared.wait_until(&shared.not_empty, &mut inner, mode, |q| q.items.len() >= n) {
            inner.stats.failures_empty += 1;
            trace!(n, "get_many gave up waiting for items");
            return Err(Error::Empty);
        }

        let batch: Vec<T> = inner.items.drain(..n).collect();
        inner.stats.items_got += n as u64;
        inner.stats.batch_gets += 1;
        drop(inner);
        shared.not_full.notify_all();
        Ok(batch.into_boxed_slice())
    }
}
