//! tracker
//!
//! Abstraction for the remote issue tracker.
//!
//! # Architecture
//!
//! The `Tracker` trait defines the three operations the reconciler needs:
//! list labels, create a label, create an issue. Reconcile code depends on
//! `&dyn Tracker` only, so the GitHub client and the in-memory mock are
//! interchangeable.
//!
//! # Modules
//!
//! - `traits`: Core `Tracker` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;
