//! # trajstore Core Library
//!
//! Streaming conversion of molecular-dynamics trajectory logs into a compact,
//! randomly-accessible columnar store with one table per snapshot.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers so that parsing, persistence and
//! orchestration can be tested in isolation.
//!
//! - **[`core`]: The Foundation.** Plain data models (`AtomRecord`,
//!   `SimulationParameters`), the streaming snapshot scanner, the record builder,
//!   small fixed-format readers and geometry helpers.
//!
//! - **[`store`]: The Persistence Layer.** The on-disk schema (a directory bundle of
//!   Parquet tables grouped like a hierarchical container) together with a write-once
//!   writer and a reader for inspecting finished or partially written stores.
//!
//! - **[`workflows`]: The Public API.** Ties the scanner, builder and store together
//!   into a single pull-based conversion loop with progress reporting.

pub mod core;
pub mod store;
pub mod workflows;
