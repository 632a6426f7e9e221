// SPDX-License-Identifier: MIT
//
// Conveyor: Bounded Blocking FIFO Queue for Thread Handoff
// Copyright (c) 2026 Conveyor Contributors
//
// https://github.com/conveyor-rs/conveyor

//! Conveyor Core Library
//!
//! This crate provides a bounded, thread-safe FIFO queue for handing opaque
//! values between producer and consumer threads under backpressure: blocking,
//! non-blocking, and timeout-bounded single-item operations plus atomic batch
//! transfer, built on a single mutex with paired condition variables.
//!
//! # Architecture
//!
//! The library is organized into modules representing core concerns:
//! - `bounds`: validation and normalization of capacity and timeout inputs
//! - `error`: unified error taxonomy
//! - `queue`: the blocking queue engine (single-item operations, task tracking)
//! - `batch`: atomic multi-item transfer ([`Queue::put_many`]/[`Queue::get_many`])
//!
//! A maxsize of [`UNBOUNDED`] (`0`) means the queue never blocks on insert
//! and skips every bound check; negative maxsize requests normalize to `0`.
//! This normalization is a documented policy of the queue, not an error.
//!
//! # Design Principles
//!
//! 1. **Single monitor**: one mutex owns all queue state; waits release it
//!    while suspended and re-check their predicate on every wake
//! 2. **Deadlines fixed at call entry**: spurious wakeups never stretch a
//!    caller's wait budget
//! 3. **Whole-batch atomicity**: no thread observes a partial batch
//! 4. **Failures are never fatal**: every error leaves the queue usable
//! 5. **Opaque payloads**: the engine never inspects item content

pub mod bounds;
pub mod error;
pub mod queue;

mod batch;

pub use error::{Error, ErrorKind, PutError, Result};
pub use queue::{Queue, QueueStats};

/// Library version for compatibility reporting
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maxsize value denoting an unbounded queue
pub const UNBOUNDED: usize = 0;
