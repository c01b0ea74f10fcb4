//! core
//!
//! Core domain types, policy, and configuration for the blueprint reconciler.
//!
//! # Modules
//!
//! - [`blueprint`] - The backlog document model and its loader
//! - [`config`] - Config file loading and run-setting resolution
//! - [`policy`] - Control labels, label defaults, and issue templates
//! - [`types`] - Strong types: RepoCoordinate
//!
//! # Design Principles
//!
//! - Nothing in `core` performs network I/O
//! - Invalid coordinates cannot be constructed
//! - Policy data lives apart from the reconcile logic that applies it

pub mod blueprint;
pub mod config;
pub mod policy;
pub mod types;
