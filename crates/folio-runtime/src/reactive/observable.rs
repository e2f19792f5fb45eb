#![forbid(unsafe_code)]

//! Shared value with change notification and version tracking.
//!
//! The active section is an [`Observable<RegionId>`](folio_core::RegionId):
//! the observer writes it, nav views and host glue listen to it. Listeners
//! are held weakly. The caller owns the strong side through a
//! [`Subscription`], and entries whose guard was dropped are pruned on the
//! next change or subscription.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug_span, field};
use web_time::Instant;

use super::batch;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<dyn Fn(&T)>>,
}

impl<T> Shared<T> {
    /// Drop dead entries and return the callbacks still alive.
    fn live_listeners(&mut self) -> Vec<Listener<T>> {
        let mut live = Vec::with_capacity(self.listeners.len());
        self.listeners.retain(|weak| match weak.upgrade() {
            Some(cb) => {
                live.push(cb);
                true
            }
            None => false,
        });
        live
    }
}

/// A shared, version-tracked value.
///
/// Clones are handles to the same value and the same listeners.
///
/// # Invariants
///
/// 1. Each value-changing `set` bumps `version` by one.
/// 2. Setting an equal value does nothing.
/// 3. Listeners run in the order they subscribed.
pub struct Observable<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Observable")
            .field("value", &shared.value)
            .field("version", &shared.version)
            .field("listeners", &shared.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        let shared = Shared {
            value,
            version: 0,
            listeners: Vec::new(),
        };
        Self {
            shared: Rc::new(RefCell::new(shared)),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.shared.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.borrow().value)
    }

    /// Replace the value. Returns `true` and notifies listeners only when it
    /// differs from the current one.
    ///
    /// Listeners may call `set` again; the borrow is released before they run.
    pub fn set(&self, value: T) -> bool {
        let listeners = {
            let mut shared = self.shared.borrow_mut();
            if shared.value == value {
                return false;
            }
            shared.value = value;
            shared.version += 1;
            shared.live_listeners()
        };
        if !listeners.is_empty() {
            self.fan_out(listeners);
        }
        true
    }

    /// Register a change callback. It stays registered while the returned
    /// [`Subscription`] is alive.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(callback);
        let mut shared = self.shared.borrow_mut();
        shared.listeners.retain(|weak| weak.strong_count() > 0);
        shared.listeners.push(Rc::downgrade(&listener));
        drop(shared);
        Subscription {
            _listener: Box::new(listener),
        }
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.borrow().version
    }

    /// Registered listeners, counting dropped ones until the next change or
    /// subscription.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.borrow().listeners.len()
    }

    fn fan_out(&self, listeners: Vec<Listener<T>>) {
        if batch::is_batching() {
            // Keyed by listener address: one call per listener per batch,
            // reading whatever value is current when the batch closes.
            for listener in listeners {
                let key = Rc::as_ptr(&listener).cast::<()>() as usize;
                let source = self.clone();
                batch::defer_or_run_keyed(key, move || listener(&source.get()));
            }
            return;
        }

        let value = self.get();
        let span = debug_span!(
            "folio.notify",
            subscribers = listeners.len(),
            duration_us = field::Empty
        );
        let _entered = span.enter();
        let started = Instant::now();
        for listener in &listeners {
            listener(&value);
        }
        let duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        span.record("duration_us", duration_us);
    }
}

/// Keeps a listener registered. Drop it to unsubscribe.
pub struct Subscription {
    _listener: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_basic() {
        let obs = Observable::new("about");
        assert_eq!(obs.get(), "about");
        assert_eq!(obs.version(), 0);

        assert!(obs.set("resume"));
        assert_eq!(obs.get(), "resume");
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn same_value_is_a_no_op() {
        let obs = Observable::new(7);
        assert!(!obs.set(7));
        assert_eq!(obs.version(), 0);
    }

    #[test]
    fn subscriber_sees_new_value() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let seen_clone = Rc::clone(&seen);
        let _sub = obs.subscribe(move |v| seen_clone.set(*v));

        obs.set(42);
        assert_eq!(seen.get(), 42);
        obs.set(42);
        obs.set(5);
        assert_eq!(seen.get(), 5);
    }

    #[test]
    fn dropping_subscription_stops_callbacks() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let sub = obs.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        obs.set(1);
        drop(sub);
        obs.set(2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dead_subscribers_pruned_on_notify() {
        let obs = Observable::new(0);
        let _keep = obs.subscribe(|_| {});
        let gone = obs.subscribe(|_| {});
        assert_eq!(obs.subscriber_count(), 2);

        drop(gone);
        assert_eq!(obs.subscriber_count(), 2);
        obs.set(1);
        assert_eq!(obs.subscriber_count(), 1);
    }

    #[test]
    fn resubscribing_without_changes_does_not_accumulate() {
        let obs = Observable::new(0);
        for _ in 0..50 {
            let sub = obs.subscribe(|_| {});
            drop(sub);
        }
        let _live = obs.subscribe(|_| {});
        assert_eq!(obs.subscriber_count(), 1);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = obs.subscribe(move |_| l1.borrow_mut().push('A'));
        let l2 = Rc::clone(&log);
        let _b = obs.subscribe(move |_| l2.borrow_mut().push('B'));

        obs.set(1);
        assert_eq!(*log.borrow(), vec!['A', 'B']);
    }

    #[test]
    fn clones_share_value_and_subscribers() {
        let a = Observable::new(0);
        let b = a.clone();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = a.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        b.set(3);
        assert_eq!(a.get(), 3);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn set_from_inside_callback_does_not_panic() {
        let obs = Observable::new(0);
        let inner = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v == 1 {
                inner.set(2);
            }
        });
        obs.set(1);
        assert_eq!(obs.get(), 2);
    }

    #[test]
    fn debug_format_mentions_version() {
        let obs = Observable::new(42);
        let dbg = format!("{obs:?}");
        assert!(dbg.contains("42"));
        assert!(dbg.contains("version"));
    }
}
