#![forbid(unsafe_code)]

//! Core types for folio section tracking.
//!
//! # Role in folio
//! `folio-core` holds the pure, platform-free pieces: the [`RegionRegistry`]
//! of trackable page regions, viewport [`Rect`]s, CSS-style
//! [`RootMargin`]s, and the [`ObserverOptions`] that define the activation
//! band. Nothing here allocates callbacks or touches a DOM.
//!
//! # How it fits in the system
//! `folio-runtime` feeds [`IntersectionEntry`] batches built from these
//! types into the active-section state; `folio-web` converts browser
//! entries into the same shape.

pub mod geometry;
pub mod intersection;
pub mod margin;
pub mod region;

pub use geometry::Rect;
pub use intersection::{
    DEFAULT_ROOT_MARGIN, DEFAULT_THRESHOLD, IntersectionEntry, Measurement, ObserverOptions,
    OptionsError,
};
pub use margin::{Length, MarginParseError, RootMargin};
pub use region::{Region, RegionId, RegionRegistry, RegistryError};
