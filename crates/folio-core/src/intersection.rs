#![forbid(unsafe_code)]

//! Intersection options, measurement, and entries.
//!
//! # Activation band
//!
//! The band is the viewport with [`ObserverOptions::root_margin`] applied.
//! With the default margin `0px 0px -70% 0px` it is the top 30% of the
//! viewport, so a region only counts once it has scrolled into the upper
//! part of the screen.
//!
//! # Measurement
//!
//! For a target box `t` and band `b`:
//!
//! - `ratio = area(t ∩ b) / area(t)`; a zero-area target that touches the
//!   band has ratio `1.0`.
//! - the target is intersecting when it overlaps the band and `ratio` is at
//!   least the smallest threshold.
//! - the threshold bucket is the number of thresholds `<= ratio` (zero when
//!   there is no overlap). Sources report an entry whenever the bucket
//!   changes, and once when a target is first observed.

use std::fmt;
use std::time::Duration;

use crate::geometry::Rect;
use crate::margin::{Length, RootMargin};
use crate::region::RegionId;

/// Root margin of the default activation band.
pub const DEFAULT_ROOT_MARGIN: RootMargin = RootMargin::new(
    Length::Px(0.0),
    Length::Px(0.0),
    Length::Percent(-70.0),
    Length::Px(0.0),
);

/// Minimum visible fraction before a region counts as intersecting.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// How targets are tested against the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    root_margin: RootMargin,
    /// Sorted, deduplicated, each in `[0, 1]`, never empty.
    thresholds: Vec<f64>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: DEFAULT_ROOT_MARGIN,
            thresholds: vec![DEFAULT_THRESHOLD],
        }
    }
}

impl ObserverOptions {
    /// Create options, normalizing the threshold list.
    ///
    /// An empty threshold list means `[0.0]`.
    pub fn new(
        root_margin: RootMargin,
        thresholds: impl IntoIterator<Item = f64>,
    ) -> Result<Self, OptionsError> {
        let mut list = Vec::new();
        for t in thresholds {
            if !(0.0..=1.0).contains(&t) {
                return Err(OptionsError::ThresholdOutOfRange(t));
            }
            list.push(t);
        }
        if list.is_empty() {
            list.push(0.0);
        }
        list.sort_by(f64::total_cmp);
        list.dedup();
        Ok(Self {
            root_margin,
            thresholds: list,
        })
    }

    #[must_use]
    pub fn root_margin(&self) -> &RootMargin {
        &self.root_margin
    }

    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    #[must_use]
    pub fn min_threshold(&self) -> f64 {
        self.thresholds[0]
    }

    /// The activation band for a viewport.
    #[must_use]
    pub fn band(&self, viewport: Rect) -> Rect {
        self.root_margin.apply(viewport)
    }

    /// Measure a target box against the band of `viewport`.
    #[must_use]
    pub fn measure(&self, target: Rect, viewport: Rect) -> Measurement {
        let band = self.band(viewport);
        let Some(overlap) = target.intersection_opt(&band) else {
            return Measurement::OUTSIDE;
        };

        let target_area = target.area();
        let ratio = if target_area > 0.0 {
            (overlap.area() / target_area).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let bucket = self.thresholds.iter().filter(|&&t| ratio >= t).count();

        Measurement {
            ratio,
            is_intersecting: bucket > 0,
            bucket,
            overlap,
        }
    }

    /// Whether a reported entry makes its region active.
    ///
    /// Hosts such as the browser set `is_intersecting` for any overlap, so
    /// the ratio is checked against the smallest threshold here as well.
    #[must_use]
    pub fn admits(&self, entry: &IntersectionEntry) -> bool {
        entry.is_intersecting && entry.intersection_ratio >= self.min_threshold()
    }
}

/// Result of measuring one target against the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub ratio: f64,
    pub is_intersecting: bool,
    pub bucket: usize,
    pub overlap: Rect,
}

impl Measurement {
    const OUTSIDE: Self = Self {
        ratio: 0.0,
        is_intersecting: false,
        bucket: 0,
        overlap: Rect::new(0.0, 0.0, 0.0, 0.0),
    };
}

/// A single visibility report for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub region: RegionId,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
    /// Target box at the time of the report.
    pub bounding: Rect,
    /// Source-relative timestamp.
    pub time: Duration,
}

impl IntersectionEntry {
    /// Build an entry from a measurement.
    #[must_use]
    pub fn measured(region: RegionId, bounding: Rect, m: &Measurement, time: Duration) -> Self {
        Self {
            region,
            is_intersecting: m.is_intersecting,
            intersection_ratio: m.ratio,
            bounding,
            time,
        }
    }

    /// A synthetic report that `region` entered the band.
    #[must_use]
    pub fn entering(region: impl Into<RegionId>) -> Self {
        Self {
            region: region.into(),
            is_intersecting: true,
            intersection_ratio: 1.0,
            bounding: Rect::default(),
            time: Duration::ZERO,
        }
    }

    /// A synthetic report that `region` left the band.
    #[must_use]
    pub fn leaving(region: impl Into<RegionId>) -> Self {
        Self {
            region: region.into(),
            is_intersecting: false,
            intersection_ratio: 0.0,
            bounding: Rect::default(),
            time: Duration::ZERO,
        }
    }
}

/// Invalid observer options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionsError {
    /// A threshold was NaN or outside `[0, 1]`.
    ThresholdOutOfRange(f64),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdOutOfRange(t) => write!(f, "threshold {t} is outside [0, 1]"),
        }
    }
}

impl std::error::Error for OptionsError {}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT_H: f64 = 1000.0;

    fn viewport_at(scroll_y: f64) -> Rect {
        Rect::new(0.0, scroll_y, 1280.0, VIEWPORT_H)
    }

    #[test]
    fn default_band_is_top_thirty_percent() {
        let band = ObserverOptions::default().band(viewport_at(200.0));
        assert_eq!(band.y, 200.0);
        assert!((band.height - 300.0).abs() < 1e-9);
        assert_eq!(DEFAULT_ROOT_MARGIN.to_string(), "0px 0px -70% 0px");
    }

    #[test]
    fn region_below_band_is_not_intersecting() {
        let opts = ObserverOptions::default();
        // Visible on screen, but under the top 30%.
        let m = opts.measure(Rect::new(0.0, 500.0, 1280.0, 400.0), viewport_at(0.0));
        assert!(!m.is_intersecting);
        assert_eq!(m.bucket, 0);
        assert_eq!(m.ratio, 0.0);
    }

    #[test]
    fn small_overlap_below_threshold_does_not_count() {
        let opts = ObserverOptions::default();
        // 1000px tall target with 50px inside the band: ratio 0.05.
        let m = opts.measure(Rect::new(0.0, 250.0, 1280.0, 1000.0), viewport_at(0.0));
        assert!((m.ratio - 0.05).abs() < 1e-9);
        assert!(!m.is_intersecting);
        assert_eq!(m.bucket, 0);
    }

    #[test]
    fn overlap_at_threshold_counts() {
        let opts = ObserverOptions::default();
        // 1000px tall target with 100px inside the band: ratio 0.1.
        let m = opts.measure(Rect::new(0.0, 200.0, 1280.0, 1000.0), viewport_at(0.0));
        assert!((m.ratio - 0.1).abs() < 1e-9);
        assert!(m.is_intersecting);
        assert_eq!(m.bucket, 1);
    }

    #[test]
    fn tall_region_never_reaches_threshold() {
        let opts = ObserverOptions::default();
        // Band is 300px; a 4000px section can show at most 7.5% of itself.
        let target = Rect::new(0.0, 0.0, 1280.0, 4000.0);
        let best = (0..40)
            .map(|step| opts.measure(target, viewport_at(f64::from(step) * 100.0)).ratio)
            .fold(0.0, f64::max);
        assert!(best < DEFAULT_THRESHOLD);
    }

    #[test]
    fn admits_requires_flag_and_min_threshold() {
        let opts = ObserverOptions::default();
        let mut entry = IntersectionEntry::entering("resume");
        assert!(opts.admits(&entry));

        // Overlapping but under 10%: a browser still reports intersecting.
        entry.intersection_ratio = 0.05;
        assert!(!opts.admits(&entry));

        entry.intersection_ratio = DEFAULT_THRESHOLD;
        assert!(opts.admits(&entry));

        entry.is_intersecting = false;
        assert!(!opts.admits(&entry));
    }

    #[test]
    fn zero_area_target_touching_band_has_full_ratio() {
        let opts = ObserverOptions::default();
        let m = opts.measure(Rect::new(0.0, 100.0, 1280.0, 0.0), viewport_at(0.0));
        assert_eq!(m.ratio, 1.0);
        assert!(m.is_intersecting);
    }

    #[test]
    fn thresholds_are_sorted_and_deduplicated() {
        let opts = ObserverOptions::new(RootMargin::NONE, [0.5, 0.1, 0.5, 1.0]).unwrap();
        assert_eq!(opts.thresholds(), &[0.1, 0.5, 1.0]);
        assert_eq!(opts.min_threshold(), 0.1);
    }

    #[test]
    fn empty_thresholds_default_to_zero() {
        let opts = ObserverOptions::new(RootMargin::NONE, []).unwrap();
        assert_eq!(opts.thresholds(), &[0.0]);
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        assert_eq!(
            ObserverOptions::new(RootMargin::NONE, [1.5]),
            Err(OptionsError::ThresholdOutOfRange(1.5))
        );
        assert!(ObserverOptions::new(RootMargin::NONE, [f64::NAN]).is_err());
    }

    #[test]
    fn bucket_counts_crossed_thresholds() {
        let opts = ObserverOptions::new(RootMargin::NONE, [0.25, 0.5, 0.75]).unwrap();
        let vp = Rect::new(0.0, 0.0, 100.0, 100.0);
        let half_in = Rect::new(0.0, 50.0, 100.0, 100.0);
        let m = opts.measure(half_in, vp);
        assert_eq!(m.bucket, 2);
        assert!(m.is_intersecting);
    }

    #[test]
    fn synthetic_entries() {
        let e = IntersectionEntry::entering("resume");
        assert!(e.is_intersecting);
        assert_eq!(e.region, "resume");
        let l = IntersectionEntry::leaving("resume");
        assert!(!l.is_intersecting);
    }
}
