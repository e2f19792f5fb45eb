#![forbid(unsafe_code)]

//! Folio runtime.
//!
//! # Key Components
//!
//! - [`ActiveSection`] - which region is current; read-only outside this crate
//! - [`VisibilityObserver`] - owns region watches, the sole state writer
//! - [`VisibilitySource`] - event-source abstraction behind the observer
//! - [`EntrySink`] - weak handle sources deliver batches through
//! - [`LayoutSource`] / [`ScriptedSource`] - deterministic sources
//! - [`reactive`] - `Observable` and `BatchScope`
//!
//! # Role in folio
//! `folio-runtime` sits between `folio-core` (pure geometry and ids) and the
//! display layers. `folio-widgets` reads the [`ActiveSection`]; `folio-web`
//! implements [`VisibilitySource`] over the browser's IntersectionObserver.

pub mod active;
pub mod observer;
pub mod reactive;
pub mod sink;
pub mod source;

pub use active::ActiveSection;
pub use observer::{ContainerResolver, FnResolver, ObserverPhase, StartReport, VisibilityObserver};
pub use reactive::{BatchScope, Observable, Subscription};
pub use sink::{Dispatch, EntrySink};
pub use source::{LayoutSource, ScriptedError, ScriptedSource, VisibilitySource, WatchId};
