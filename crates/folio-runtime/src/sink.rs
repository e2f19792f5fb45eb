#![forbid(unsafe_code)]

//! Weak delivery handle given to visibility sources.

use std::rc::{Rc, Weak};

use folio_core::IntersectionEntry;
use tracing::trace;

/// Batch callback owned by a [`VisibilityObserver`](crate::VisibilityObserver).
pub type Dispatch = dyn Fn(&[IntersectionEntry]);

/// Where a source sends entry batches.
///
/// A sink only holds a weak reference to its dispatcher. Once the owning
/// observer stops, the dispatcher is gone and deliveries become no-ops, so a
/// source that fires late cannot mutate state.
#[derive(Clone)]
pub struct EntrySink {
    target: Weak<Dispatch>,
}

impl EntrySink {
    #[must_use]
    pub fn new(dispatch: &Rc<Dispatch>) -> Self {
        Self {
            target: Rc::downgrade(dispatch),
        }
    }

    /// A sink that drops everything.
    #[must_use]
    pub fn detached() -> Self {
        let target: Weak<Dispatch> = Weak::<fn(&[IntersectionEntry])>::new();
        Self { target }
    }

    /// Deliver one batch. Returns `false` if the dispatcher is gone.
    pub fn deliver(&self, entries: &[IntersectionEntry]) -> bool {
        match self.target.upgrade() {
            Some(dispatch) => {
                dispatch(entries);
                true
            }
            None => {
                trace!(entries = entries.len(), "late delivery ignored");
                false
            }
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Whether both sinks feed the same dispatcher.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.target, &other.target)
    }
}

impl std::fmt::Debug for EntrySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntrySink")
            .field("live", &self.is_live())
            .finish()
    }
}
