//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All user-facing output goes through this module so the quiet flag is
//! honoured in one place.

pub mod output;
