#![forbid(unsafe_code)]

//! Collaborators a folio page talks to but does not implement.
//!
//! Each module models the contract with a third-party service as a trait and
//! keeps only the state the page shows to the visitor.

#[cfg(feature = "contact")]
pub mod contact;

#[cfg(feature = "preview")]
pub mod preview;
