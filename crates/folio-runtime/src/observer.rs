#![forbid(unsafe_code)]

//! Visibility observer: owns every region watch and the only writer of the
//! active-section state.
//!
//! # Lifecycle
//!
//! ```text
//!   Idle ──start()──▶ Running ──stop()──▶ Stopped
//!                       ▲  │                 │
//!                       └──┘ start()         │
//!                       ▲   (stop + start)   │
//!                       └─────start()────────┘
//! ```
//!
//! `start` resolves each registered region to a container and asks the
//! source to watch it. Regions without a container are skipped. `stop`
//! releases every watch and drops the dispatcher, so sinks still held by a
//! source turn into no-ops. `stop` is idempotent and runs on drop.
//!
//! # Batch semantics
//!
//! Entries are applied in delivery order. Each intersecting entry for a
//! registered region becomes the active section, so the last one in a batch
//! wins. Non-intersecting entries and foreign ids never change the state.
//! The batch runs inside a [`BatchScope`], so subscribers hear about the
//! final value once.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::BuildHasher;
use std::rc::Rc;

use folio_core::{IntersectionEntry, ObserverOptions, RegionId, RegionRegistry};
use tracing::{debug, info, trace, warn};

use crate::active::ActiveSection;
use crate::reactive::BatchScope;
use crate::sink::{Dispatch, EntrySink};
use crate::source::{VisibilitySource, WatchId};

/// Maps a region id to its on-page container, if present.
pub trait ContainerResolver<C> {
    fn resolve(&self, id: &RegionId) -> Option<C>;
}

impl<C: Clone, H: BuildHasher> ContainerResolver<C> for HashMap<RegionId, C, H> {
    fn resolve(&self, id: &RegionId) -> Option<C> {
        self.get(id).cloned()
    }
}

impl<C: Clone> ContainerResolver<C> for BTreeMap<RegionId, C> {
    fn resolve(&self, id: &RegionId) -> Option<C> {
        self.get(id).cloned()
    }
}

/// A set of present ids, for sources whose container is `()`.
impl<H: BuildHasher> ContainerResolver<()> for HashSet<RegionId, H> {
    fn resolve(&self, id: &RegionId) -> Option<()> {
        self.contains(id).then_some(())
    }
}

impl ContainerResolver<()> for BTreeSet<RegionId> {
    fn resolve(&self, id: &RegionId) -> Option<()> {
        self.contains(id).then_some(())
    }
}

impl<C, R: ContainerResolver<C> + ?Sized> ContainerResolver<C> for &R {
    fn resolve(&self, id: &RegionId) -> Option<C> {
        (**self).resolve(id)
    }
}

/// Adapts a closure `Fn(&RegionId) -> Option<C>` into a resolver.
///
/// ```
/// use folio_core::RegionId;
/// use folio_runtime::{ContainerResolver, FnResolver};
///
/// let present = FnResolver(|id: &RegionId| (id.as_str() != "skills").then_some(()));
/// assert_eq!(present.resolve(&RegionId::new("about")), Some(()));
/// assert_eq!(present.resolve(&RegionId::new("skills")), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnResolver<F>(pub F);

impl<C, F: Fn(&RegionId) -> Option<C>> ContainerResolver<C> for FnResolver<F> {
    fn resolve(&self, id: &RegionId) -> Option<C> {
        (self.0)(id)
    }
}

/// Outcome of [`VisibilityObserver::start`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartReport {
    /// Watches established.
    pub observed: usize,
    /// Regions with no container in the document.
    pub missing: usize,
    /// Regions the source refused to watch.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverPhase {
    Idle,
    Running,
    Stopped,
}

/// Watches every registered region through a [`VisibilitySource`] and keeps
/// an [`ActiveSection`] current.
pub struct VisibilityObserver<S: VisibilitySource> {
    source: S,
    options: ObserverOptions,
    active: ActiveSection,
    dispatch: Option<Rc<Dispatch>>,
    watches: Vec<(RegionId, WatchId)>,
    phase: ObserverPhase,
}

impl<S: VisibilitySource> VisibilityObserver<S> {
    /// An idle observer with the default activation band.
    pub fn new(source: S, registry: RegionRegistry) -> Self {
        Self::with_options(source, registry, ObserverOptions::default())
    }

    pub fn with_options(source: S, registry: RegionRegistry, options: ObserverOptions) -> Self {
        Self {
            source,
            options,
            active: ActiveSection::new(registry),
            dispatch: None,
            watches: Vec::new(),
            phase: ObserverPhase::Idle,
        }
    }

    /// Read handle to the state this observer writes.
    #[must_use]
    pub fn active(&self) -> &ActiveSection {
        &self.active
    }

    #[must_use]
    pub fn registry(&self) -> &RegionRegistry {
        self.active.registry()
    }

    #[must_use]
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    #[must_use]
    pub fn phase(&self) -> ObserverPhase {
        self.phase
    }

    /// Watches currently held.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.watches.len()
    }

    /// Regions with a live watch, in registry order.
    pub fn observed_regions(&self) -> impl Iterator<Item = &RegionId> + '_ {
        self.watches.iter().map(|(region, _)| region)
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Watch every registered region that `resolver` can find.
    ///
    /// A running observer is stopped first. Missing containers and refused
    /// watches are counted in the report, never returned as errors.
    pub fn start<R>(&mut self, resolver: &R) -> StartReport
    where
        R: ContainerResolver<S::Container> + ?Sized,
    {
        if self.phase == ObserverPhase::Running {
            debug!("restarting visibility observer");
            self.stop();
        }

        let active = self.active.clone();
        let options = self.options.clone();
        let dispatch: Rc<Dispatch> = Rc::new(move |entries: &[IntersectionEntry]| {
            apply_batch(&active, &options, entries);
        });

        let registry = self.active.registry().clone();
        let mut report = StartReport::default();
        for id in registry.ids() {
            let Some(container) = resolver.resolve(id) else {
                debug!(region = %id, "no container; region not observed");
                report.missing += 1;
                continue;
            };
            match self
                .source
                .observe(id, container, &self.options, EntrySink::new(&dispatch))
            {
                Ok(watch) => {
                    debug!(region = %id, %watch, "observing region");
                    self.watches.push((id.clone(), watch));
                    report.observed += 1;
                }
                Err(err) => {
                    warn!(region = %id, error = %err, "failed to observe region");
                    report.failed += 1;
                }
            }
        }

        self.dispatch = Some(dispatch);
        self.phase = ObserverPhase::Running;
        info!(
            observed = report.observed,
            missing = report.missing,
            failed = report.failed,
            "visibility observer started"
        );
        report
    }

    /// Release every watch. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.phase != ObserverPhase::Running {
            return;
        }
        for (region, watch) in self.watches.drain(..) {
            self.source.unobserve(watch);
            debug!(region = %region, %watch, "released region watch");
        }
        self.dispatch = None;
        self.phase = ObserverPhase::Stopped;
        debug!("visibility observer stopped");
    }
}

impl<S: VisibilitySource> Drop for VisibilityObserver<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: VisibilitySource + std::fmt::Debug> std::fmt::Debug for VisibilityObserver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityObserver")
            .field("phase", &self.phase)
            .field("active", &self.active.get())
            .field("watches", &self.watches.len())
            .field("source", &self.source)
            .finish()
    }
}

/// Apply one delivered batch to `active`. Entries below the smallest
/// threshold are skipped.
pub(crate) fn apply_batch(
    active: &ActiveSection,
    options: &ObserverOptions,
    entries: &[IntersectionEntry],
) {
    let _batch = BatchScope::new();
    let mut applied = 0usize;
    for entry in entries.iter().filter(|e| options.admits(e)) {
        active.assign(&entry.region);
        applied += 1;
    }
    trace!(
        entries = entries.len(),
        intersecting = applied,
        active = %active.get(),
        "applied visibility batch"
    );
}
