#![forbid(unsafe_code)]

//! Display surfaces for folio.
//!
//! # Role in folio
//! `folio-widgets` reads the [`ActiveSection`](folio_runtime::ActiveSection)
//! and renders navigation. Nothing here writes state; activating an entry
//! produces a [`NavRequest`] that the host turns into an anchor jump.

pub mod nav;

pub use nav::{NavEntry, NavRequest, NavStyle, NavView};
