#![forbid(unsafe_code)]

//! Coalesced notifications for a batch of visibility entries.
//!
//! A browser observer delivers several entries per callback. Applying them
//! one by one would notify subscribers once per intermediate active section.
//! Inside a [`BatchScope`] the [`Observable`](super::Observable) value still
//! updates immediately, but notifications are queued and each subscriber is
//! called once, with the final value, when the outermost scope exits.
//!
//! # Invariants
//!
//! 1. Scopes nest; callbacks run when the outermost one drops.
//! 2. `Observable::get()` inside a batch returns the latest value.
//! 3. Queued callbacks run in the order their keys were first queued.
//!
//! # Failure Modes
//!
//! - A panicking subscriber does not stop the others. The first panic is
//!   resumed once every queued callback has run.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use tracing::{debug, field, info_span};
use web_time::Instant;

type Pending = Box<dyn FnOnce()>;

thread_local! {
    static DEPTH: Cell<u32> = const { Cell::new(0) };
    static QUEUE: RefCell<Vec<(usize, Pending)>> = const { RefCell::new(Vec::new()) };
}

/// Whether a [`BatchScope`] is open on this thread.
pub fn is_batching() -> bool {
    DEPTH.with(Cell::get) > 0
}

/// Queue `f` under `key`, or run it now when no batch is open.
///
/// A second call with the same key replaces the queued callback but keeps its
/// original position. Returns `true` if the callback was deferred.
pub fn defer_or_run_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    if !is_batching() {
        f();
        return false;
    }
    QUEUE.with(|queue| {
        let mut queue = queue.borrow_mut();
        match queue.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = Box::new(f),
            None => queue.push((key, Box::new(f))),
        }
    });
    true
}

/// Run every queued callback once the depth is back to zero.
fn propagate() {
    let pending: Vec<Pending> = QUEUE.with(|queue| {
        queue
            .take()
            .into_iter()
            .map(|(_, notify)| notify)
            .collect()
    });
    if pending.is_empty() {
        return;
    }

    let notified = pending.len();
    let span = info_span!("folio.propagate", notified, duration_us = field::Empty);
    let _entered = span.enter();
    let started = Instant::now();

    let mut first_panic: Option<Box<dyn Any + Send>> = None;
    for notify in pending {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(notify)) {
            first_panic.get_or_insert(payload);
        }
    }

    let duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    span.record("duration_us", duration_us);
    debug!(notified, duration_us, "batch flushed");

    if let Some(payload) = first_panic {
        resume_unwind(payload);
    }
}

/// RAII guard for a batch. See the module docs.
pub struct BatchScope {
    outermost: bool,
}

impl BatchScope {
    #[must_use]
    pub fn new() -> Self {
        let depth = DEPTH.with(|d| {
            d.set(d.get() + 1);
            d.get()
        });
        Self {
            outermost: depth == 1,
        }
    }

    /// Callbacks queued in the current batch.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        QUEUE.with(|queue| queue.borrow().len())
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let remaining = DEPTH.with(|d| {
            d.set(d.get().saturating_sub(1));
            d.get()
        });
        // Depth is already zero here, so a panicking callback leaves no
        // batch behind.
        if remaining == 0 {
            propagate();
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("outermost", &self.outermost)
            .field("pending", &self.pending_count())
            .finish()
    }
}
