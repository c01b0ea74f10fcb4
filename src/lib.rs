//! Backlog Blueprint - apply a declarative backlog to a GitHub repository
//!
//! A blueprint is a YAML document naming labels and epics, each epic with
//! its child issue titles. Applying it ensures every label exists, then
//! creates one issue per epic and one per child, each child linking back to
//! its epic by number.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates)
//! - [`core`] - Blueprint ingestion, configuration, and fixed policy
//! - [`reconcile`] - Label and issue reconciliation against a tracker
//! - [`tracker`] - Abstraction for the remote issue tracker (GitHub v1)
//! - [`ui`] - User-facing output
//!
//! # Guarantees
//!
//! 1. No tracker request is made until the document, repository, and
//!    credential are all resolved
//! 2. Every label request completes before the first issue request
//! 3. A child issue is only created after its epic's number is known
//! 4. The run is not idempotent for issues; labels converge

pub mod cli;
pub mod core;
pub mod reconcile;
pub mod tracker;
pub mod ui;
