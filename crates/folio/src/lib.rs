#![forbid(unsafe_code)]

//! folio public facade crate.
//!
//! Re-exports the section-tracking stack and adds what a host needs around
//! it: the built-in [`site`] definition, file-based [`config`], and
//! subscriber setup in [`logging`].
//!
//! ```
//! use folio::prelude::*;
//!
//! let page = PageLayout::default();
//! let mut observer = VisibilityObserver::new(LayoutSource::new(1280.0, 1000.0), default_registry());
//! observer.start(&page.containers());
//! let nav = NavView::new(observer.active().clone());
//!
//! observer.source_mut().scroll_to(page.rect("resume").unwrap().y);
//! assert_eq!(observer.active().get(), "resume");
//! assert!(nav.render_line(80).contains("[Resume]"));
//! ```

#[cfg(feature = "config")]
pub mod config;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod site;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use folio_core::{
    IntersectionEntry, Length, ObserverOptions, Rect, Region, RegionId, RegionRegistry,
    RootMargin,
};

// --- Runtime re-exports ----------------------------------------------------

pub use folio_runtime::{
    ActiveSection, ContainerResolver, FnResolver, LayoutSource, ObserverPhase, ScriptedSource,
    StartReport, Subscription, VisibilityObserver, VisibilitySource,
};

// --- Widget re-exports -----------------------------------------------------

pub use folio_widgets::{NavEntry, NavRequest, NavStyle, NavView};

#[cfg(feature = "config")]
pub use config::{ConfigError, SiteConfig};
pub use site::{PageLayout, default_registry};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActiveSection, Error, LayoutSource, NavView, ObserverOptions, PageLayout, Rect, RegionId,
        RegionRegistry, Result, VisibilityObserver, default_registry,
    };

    #[cfg(feature = "config")]
    pub use crate::SiteConfig;

    pub use crate::{core, runtime, widgets};
}

pub use folio_core as core;
#[cfg(feature = "extras")]
pub use folio_extras as extras;
pub use folio_runtime as runtime;
pub use folio_widgets as widgets;
