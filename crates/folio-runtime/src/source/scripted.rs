#![forbid(unsafe_code)]

//! Hand-driven source for tests and simulations.

use std::collections::HashSet;
use std::fmt;

use folio_core::{IntersectionEntry, ObserverOptions, RegionId};

use super::{VisibilitySource, WatchId, group_by_sink};
use crate::sink::EntrySink;

#[derive(Debug)]
struct ScriptedWatch {
    id: WatchId,
    region: RegionId,
    sink: EntrySink,
}

/// A source whose entry batches are supplied by the caller.
///
/// Released watches move to a retired list so a test can replay a delivery
/// that arrives after teardown with [`deliver_late`](Self::deliver_late).
#[derive(Debug, Default)]
pub struct ScriptedSource {
    next_id: u64,
    live: Vec<ScriptedWatch>,
    retired: Vec<ScriptedWatch>,
    refused: HashSet<RegionId>,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `observe` of `region` fail.
    pub fn refuse(&mut self, region: impl Into<RegionId>) {
        self.refused.insert(region.into());
    }

    /// Deliver `entries` as one batch to every live sink.
    ///
    /// Returns the number of sinks that accepted the batch.
    pub fn deliver(&self, entries: &[IntersectionEntry]) -> usize {
        Self::fan_out(&self.live, entries)
    }

    /// Deliver a batch reporting each of `ids` as entering the band.
    pub fn deliver_entering(&self, ids: &[&str]) -> usize {
        let batch: Vec<IntersectionEntry> =
            ids.iter().map(|id| IntersectionEntry::entering(*id)).collect();
        self.deliver(&batch)
    }

    /// Deliver `entries` only through the watch established for `region`.
    pub fn deliver_via(&self, region: &str, entries: &[IntersectionEntry]) -> usize {
        self.live
            .iter()
            .filter(|w| w.region == region)
            .filter(|w| w.sink.deliver(entries))
            .count()
    }

    /// Deliver `entries` through the sinks of released watches.
    pub fn deliver_late(&self, entries: &[IntersectionEntry]) -> usize {
        Self::fan_out(&self.retired, entries)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Regions with a live watch, in observe order.
    #[must_use]
    pub fn observed(&self) -> Vec<RegionId> {
        self.live.iter().map(|w| w.region.clone()).collect()
    }

    fn fan_out(watches: &[ScriptedWatch], entries: &[IntersectionEntry]) -> usize {
        group_by_sink(watches.iter().map(|w| (w.sink.clone(), ())))
            .into_iter()
            .filter(|(sink, _)| sink.deliver(entries))
            .count()
    }
}

impl VisibilitySource for ScriptedSource {
    type Container = ();
    type Error = ScriptedError;

    fn observe(
        &mut self,
        region: &RegionId,
        _container: (),
        _options: &ObserverOptions,
        sink: EntrySink,
    ) -> Result<WatchId, ScriptedError> {
        if self.refused.contains(region) {
            return Err(ScriptedError::Refused(region.clone()));
        }
        self.next_id += 1;
        let id = WatchId::new(self.next_id);
        self.live.push(ScriptedWatch {
            id,
            region: region.clone(),
            sink,
        });
        Ok(id)
    }

    fn unobserve(&mut self, watch: WatchId) {
        if let Some(pos) = self.live.iter().position(|w| w.id == watch) {
            let released = self.live.remove(pos);
            self.retired.push(released);
        }
    }
}

/// Failure injected with [`ScriptedSource::refuse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedError {
    Refused(RegionId),
}

impl fmt::Display for ScriptedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused(id) => write!(f, "observe refused for region {id}"),
        }
    }
}

impl std::error::Error for ScriptedError {}
