#![forbid(unsafe_code)]

//! Visibility event sources.
//!
//! A [`VisibilitySource`] turns "watch this container" requests into batches
//! of [`IntersectionEntry`](folio_core::IntersectionEntry) values pushed
//! through an [`EntrySink`]. The browser implementation lives in
//! `folio-web`; this module ships two deterministic ones:
//!
//! - [`LayoutSource`]: containers are [`Rect`](folio_core::Rect)s and the
//!   caller scrolls a virtual viewport. Entries come from the real band
//!   geometry.
//! - [`ScriptedSource`]: containers carry no geometry and the caller
//!   delivers entry batches by hand.

use std::fmt;

use folio_core::{ObserverOptions, RegionId};

use crate::sink::EntrySink;

mod layout;
mod scripted;

pub use layout::LayoutSource;
pub use scripted::{ScriptedError, ScriptedSource};

/// Handle for one established watch, unique per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(u64);

impl WatchId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// Something that can watch region containers against an activation band.
pub trait VisibilitySource {
    /// What a resolved region looks like to this source.
    type Container;
    /// Why a watch could not be established.
    type Error: fmt::Display;

    /// Start watching `container` on behalf of `region`.
    ///
    /// Entries for this watch go to `sink`. Sources may deliver the first
    /// entry later, never from inside this call.
    fn observe(
        &mut self,
        region: &RegionId,
        container: Self::Container,
        options: &ObserverOptions,
        sink: EntrySink,
    ) -> Result<WatchId, Self::Error>;

    /// Stop watching. Unknown or already released ids are ignored.
    fn unobserve(&mut self, watch: WatchId);
}

/// Collect entries into one batch per distinct sink, keeping first-seen order.
pub(crate) fn group_by_sink<T>(
    items: impl IntoIterator<Item = (EntrySink, T)>,
) -> Vec<(EntrySink, Vec<T>)> {
    let mut groups: Vec<(EntrySink, Vec<T>)> = Vec::new();
    for (sink, item) in items {
        match groups.iter_mut().find(|(s, _)| s.same_target(&sink)) {
            Some((_, batch)) => batch.push(item),
            None => groups.push((sink, vec![item])),
        }
    }
    groups
}
