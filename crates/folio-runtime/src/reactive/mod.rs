#![forbid(unsafe_code)]

//! Single-threaded reactive primitives.
//!
//! - [`Observable`]: shared value with version tracking and change
//!   notification.
//! - [`BatchScope`]: RAII guard that coalesces notifications.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription};
