#![forbid(unsafe_code)]

//! Browser host for folio.
//!
//! On `wasm32` this crate exports [`FolioNav`], which tracks the active
//! section with one `IntersectionObserver` per region and toggles the nav
//! item classes to match. The JS side only constructs it, calls `mount()`
//! after the sections are in the document, and `unmount()` on teardown.
//!
//! ```js
//! import init, { FolioNav } from "./folio_web.js";
//!
//! await init();
//! const nav = new FolioNav();          // built-in sections
//! document.querySelector("header nav").innerHTML = nav.navHtml();
//! nav.mount();
//! ```
//!
//! The conversion and class bookkeeping in [`host`] is plain Rust and is
//! tested natively.

pub mod host;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use host::{
    ClassList, ClassToggle, EntrySnapshot, Site, WebHostError, class_updates, item_selector,
};

#[cfg(target_arch = "wasm32")]
pub use wasm::{DocumentResolver, DomVisibilitySource, FolioNav};
