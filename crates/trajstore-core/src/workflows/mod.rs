//! # Workflows Module
//!
//! High-level entry points that drive a complete conversion from a trajectory log
//! to a finished store.
//!
//! - **Conversion Workflow** ([`convert`]) - writes the simulation parameters, pulls
//!   snapshot blocks from the scanner, builds their atom records and writes one table
//!   per snapshot before closing the store.
//! - **Progress** ([`progress`]) - events emitted while a workflow runs, delivered
//!   through an optional callback so front ends can render them however they like.

pub mod convert;
pub mod progress;
