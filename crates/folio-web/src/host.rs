#![forbid(unsafe_code)]

//! Host logic that does not touch JS values.
//!
//! The wasm exports read DOM objects into these plain types and back, so
//! everything decided here runs under native `cargo test`.

use std::time::Duration;

use folio::SiteConfig;
use folio_core::{IntersectionEntry, ObserverOptions, Rect, RegionId, RegionRegistry};
use folio_widgets::NavStyle;
use tracing::debug;

/// The fields of a DOM `IntersectionObserverEntry` that folio reads.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySnapshot {
    /// `entry.target.id`.
    pub target_id: String,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
    pub bounding: Rect,
    /// `entry.time`, milliseconds since page load.
    pub time_ms: f64,
}

impl EntrySnapshot {
    /// Convert into a core entry.
    ///
    /// A target without an id cannot name a region and a non-finite ratio
    /// cannot be compared against thresholds; both are rejected. Negative or
    /// non-finite timestamps become zero.
    pub fn into_entry(self) -> Result<IntersectionEntry, WebHostError> {
        if self.target_id.is_empty() {
            return Err(WebHostError::MissingTargetId);
        }
        if !self.intersection_ratio.is_finite() {
            return Err(WebHostError::InvalidRatio(self.intersection_ratio));
        }
        let time = if self.time_ms.is_finite() && self.time_ms > 0.0 {
            Duration::from_secs_f64(self.time_ms / 1000.0)
        } else {
            Duration::ZERO
        };
        Ok(IntersectionEntry {
            region: RegionId::from(self.target_id),
            is_intersecting: self.is_intersecting,
            intersection_ratio: self.intersection_ratio.clamp(0.0, 1.0),
            bounding: self.bounding,
            time,
        })
    }
}

/// Classes to add and remove on one nav item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassToggle {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl ClassToggle {
    /// Move an item into its active or inactive state. Base classes are
    /// never touched; a class shared by both states is kept.
    #[must_use]
    pub fn for_item(style: &NavStyle, active: bool) -> Self {
        let (on, off) = if active {
            (&style.active, &style.inactive)
        } else {
            (&style.inactive, &style.active)
        };
        let add: Vec<String> = on.split_whitespace().map(str::to_string).collect();
        let remove = off
            .split_whitespace()
            .filter(|class| !add.iter().any(|a| a == class))
            .map(str::to_string)
            .collect();
        Self { add, remove }
    }
}

/// The `classList` of one nav item.
pub trait ClassList {
    fn add_class(&self, class: &str) -> Result<(), WebHostError>;
    fn remove_class(&self, class: &str) -> Result<(), WebHostError>;
}

impl ClassToggle {
    /// Apply to one item. Failures are logged and skipped; returns how many
    /// class changes failed.
    pub fn apply_to<L: ClassList + ?Sized>(&self, region: &RegionId, list: &L) -> usize {
        let mut failed = 0;
        for class in &self.remove {
            if let Err(err) = list.remove_class(class) {
                debug!(
                    region = %region,
                    class = %class,
                    error = %err,
                    "nav class not removed"
                );
                failed += 1;
            }
        }
        for class in &self.add {
            if let Err(err) = list.add_class(class) {
                debug!(
                    region = %region,
                    class = %class,
                    error = %err,
                    "nav class not added"
                );
                failed += 1;
            }
        }
        failed
    }
}

/// One toggle per registered region for the given active id.
#[must_use]
pub fn class_updates(
    style: &NavStyle,
    registry: &RegionRegistry,
    active: &RegionId,
) -> Vec<(RegionId, ClassToggle)> {
    registry
        .ids()
        .map(|id| (id.clone(), ClassToggle::for_item(style, id == active)))
        .collect()
}

/// CSS selector for the nav items of `id`.
#[must_use]
pub fn item_selector(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for ch in id.chars() {
        if matches!(ch, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("[data-section=\"{escaped}\"]")
}

/// Sections and band settings for a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub registry: RegionRegistry,
    pub options: ObserverOptions,
}

impl Site {
    /// Read the site from optional JSON; `None` means the built-in site.
    pub fn from_json(json: Option<&str>) -> Result<Self, WebHostError> {
        let config = match json {
            Some(text) => SiteConfig::from_json_str(text)
                .map_err(|e| WebHostError::Config(e.to_string()))?,
            None => SiteConfig::default(),
        };
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(WebHostError::Config(errors.join("; ")));
        }
        Ok(Self {
            registry: config
                .registry()
                .map_err(|e| WebHostError::Config(e.to_string()))?,
            options: config
                .observer_options()
                .map_err(|e| WebHostError::Config(e.to_string()))?,
        })
    }
}

/// Failures surfaced to JS.
#[derive(Debug, Clone, PartialEq)]
pub enum WebHostError {
    NoWindow,
    NoDocument,
    /// An observed element has an empty `id`.
    MissingTargetId,
    InvalidRatio(f64),
    /// A JS call threw.
    Js(String),
    Config(String),
}

impl core::fmt::Display for WebHostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::MissingTargetId => write!(f, "intersection target has no id"),
            Self::InvalidRatio(r) => write!(f, "intersection ratio {r} is not finite"),
            Self::Js(msg) => write!(f, "javascript error: {msg}"),
            Self::Config(msg) => write!(f, "invalid site config: {msg}"),
        }
    }
}

impl std::error::Error for WebHostError {}
