#![forbid(unsafe_code)]

//! Headless driver for folio: lays the page out, scrolls a virtual viewport
//! through it, and reports which section the navigation highlights.

pub mod check;
pub mod cli;
pub mod error;
pub mod scroll;
pub mod sections;

pub use cli::{run, run_from_env};
pub use error::{DemoError, Result};
