//! Library crate for student-roster.
//!
//! This crate exposes the building blocks of the TUI:
//! - The in-memory student roster (`roster`)
//! - Numeric input validation for the prompts (`input`)
//! - Application state, keymap and update loop (`app`)
//! - Error and result types (`error`)
//! - Search over the roster into the results pane (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `student-roster` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod error;
pub mod input;
pub mod roster;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result, RosterError};
pub use roster::{Roster, StudentRecord};
