#![forbid(unsafe_code)]

//! Active-section state.
//!
//! [`ActiveSection`] is the single source of truth for which region is
//! highlighted. It always holds an id from its registry, starting at the
//! first registered region. Anyone can read and subscribe; only the
//! crate-internal observer dispatch can write.

use folio_core::{RegionId, RegionRegistry};
use tracing::debug;

use crate::reactive::{Observable, Subscription};

/// Read handle to the current active region.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct ActiveSection {
    registry: RegionRegistry,
    current: Observable<RegionId>,
}

impl ActiveSection {
    /// State for `registry`, set to its first region.
    #[must_use]
    pub fn new(registry: RegionRegistry) -> Self {
        let current = Observable::new(registry.first().id().clone());
        Self { registry, current }
    }

    /// The active region id.
    #[must_use]
    pub fn get(&self) -> RegionId {
        self.current.get()
    }

    /// Whether `id` is the active region.
    #[must_use]
    pub fn is(&self, id: &str) -> bool {
        self.current.with(|current| current.as_str() == id)
    }

    /// Number of changes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.current.version()
    }

    /// Call `f` with the new id whenever the active region changes.
    pub fn subscribe(&self, f: impl Fn(&RegionId) + 'static) -> Subscription {
        self.current.subscribe(f)
    }

    #[must_use]
    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// Make `id` active. Ids outside the registry are ignored.
    ///
    /// Returns `true` if the value changed.
    pub(crate) fn assign(&self, id: &RegionId) -> bool {
        let Some(region) = self.registry.get(id) else {
            debug!(region = %id, "ignoring entry for unregistered region");
            return false;
        };
        let changed = self.current.set(region.id().clone());
        if changed {
            debug!(region = %id, "active section changed");
        }
        changed
    }
}

impl std::fmt::Debug for ActiveSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSection")
            .field("current", &self.get())
            .field("version", &self.version())
            .field("regions", &self.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn state() -> ActiveSection {
        ActiveSection::new(
            RegionRegistry::from_pairs([("about", "About"), ("resume", "Resume")])
                .expect("valid registry"),
        )
    }

    #[test]
    fn starts_at_first_region() {
        let s = state();
        assert_eq!(s.get(), "about");
        assert!(s.is("about"));
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn assign_member_changes_and_notifies() {
        let s = state();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = s.subscribe(move |id| seen_clone.borrow_mut().push(id.to_string()));

        assert!(s.assign(&RegionId::new("resume")));
        assert!(!s.assign(&RegionId::new("resume")));
        assert_eq!(*seen.borrow(), vec!["resume".to_string()]);
        assert_eq!(s.version(), 1);
    }

    #[test]
    fn assign_foreign_id_is_ignored() {
        let s = state();
        assert!(!s.assign(&RegionId::new("contact")));
        assert_eq!(s.get(), "about");
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn clones_share_state() {
        let a = state();
        let b = a.clone();
        a.assign(&RegionId::new("resume"));
        assert!(b.is("resume"));
    }
}
