#![forbid(unsafe_code)]

//! Geometry-driven source over a virtual viewport.

use std::time::Duration;

use folio_core::{IntersectionEntry, ObserverOptions, Rect, RegionId};
use tracing::trace;

use super::{VisibilitySource, WatchId, group_by_sink};
use crate::sink::EntrySink;

struct LayoutWatch {
    id: WatchId,
    region: RegionId,
    target: Rect,
    options: ObserverOptions,
    sink: EntrySink,
    /// Threshold bucket at the last report; `None` until first evaluated.
    last_bucket: Option<usize>,
}

/// A page laid out as rectangles in document coordinates.
///
/// The viewport's `y` is the scroll offset. Geometry changes re-evaluate
/// every watch and deliver one batch per sink for the watches whose
/// threshold bucket changed. Timestamps come from a manual clock.
///
/// ```
/// use folio_core::Rect;
/// use folio_runtime::LayoutSource;
///
/// let mut page = LayoutSource::new(1280.0, 1000.0);
/// page.scroll_to(400.0);
/// assert_eq!(page.viewport(), Rect::new(0.0, 400.0, 1280.0, 1000.0));
/// ```
pub struct LayoutSource {
    viewport: Rect,
    clock: Duration,
    next_id: u64,
    watches: Vec<LayoutWatch>,
}

impl LayoutSource {
    /// A viewport of `width` x `height`, scrolled to the top.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Rect::from_size(width, height),
            clock: Duration::ZERO,
            next_id: 1,
            watches: Vec::new(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn advance(&mut self, dt: Duration) {
        self.clock = self.clock.saturating_add(dt);
    }

    /// Scroll to `y` (clamped at 0). Returns the number of entries delivered.
    pub fn scroll_to(&mut self, y: f64) -> usize {
        self.viewport.y = y.max(0.0);
        self.flush()
    }

    pub fn scroll_by(&mut self, dy: f64) -> usize {
        self.scroll_to(self.viewport.y + dy)
    }

    pub fn resize(&mut self, width: f64, height: f64) -> usize {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
        self.flush()
    }

    /// Move every watched container of `region` to `target`.
    pub fn move_target(&mut self, region: &str, target: Rect) -> usize {
        for watch in self.watches.iter_mut().filter(|w| w.region == region) {
            watch.target = target;
        }
        self.flush()
    }

    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// Evaluate all watches and deliver pending entries.
    ///
    /// Newly observed watches always report once. Returns the number of
    /// entries delivered.
    pub fn flush(&mut self) -> usize {
        let viewport = self.viewport;
        let now = self.clock;
        let mut pending = Vec::new();

        for watch in &mut self.watches {
            let m = watch.options.measure(watch.target, viewport);
            if watch.last_bucket == Some(m.bucket) {
                continue;
            }
            watch.last_bucket = Some(m.bucket);
            let entry = IntersectionEntry::measured(watch.region.clone(), watch.target, &m, now);
            pending.push((watch.sink.clone(), entry));
        }

        let count = pending.len();
        if count == 0 {
            return 0;
        }
        trace!(entries = count, scroll_y = viewport.y, "layout entries pending");
        for (sink, batch) in group_by_sink(pending) {
            sink.deliver(&batch);
        }
        count
    }
}

impl VisibilitySource for LayoutSource {
    type Container = Rect;
    type Error = std::convert::Infallible;

    fn observe(
        &mut self,
        region: &RegionId,
        container: Rect,
        options: &ObserverOptions,
        sink: EntrySink,
    ) -> Result<WatchId, Self::Error> {
        let id = WatchId::new(self.next_id);
        self.next_id += 1;
        self.watches.push(LayoutWatch {
            id,
            region: region.clone(),
            target: container,
            options: options.clone(),
            sink,
            last_bucket: None,
        });
        Ok(id)
    }

    fn unobserve(&mut self, watch: WatchId) {
        self.watches.retain(|w| w.id != watch);
    }
}

impl std::fmt::Debug for LayoutSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutSource")
            .field("viewport", &self.viewport)
            .field("clock", &self.clock)
            .field("watches", &self.watches.len())
            .finish()
    }
}
