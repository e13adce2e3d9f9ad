//! Provides input functionality for trajectory logs and their companion files.
//!
//! The [`scanner`] splits an unbounded trajectory stream into raw snapshot blocks,
//! and the [`builder`] turns each block into atom records. The remaining readers
//! share the [`traits::TextFormat`] interface.

pub mod box_params;
pub mod builder;
pub mod scanner;
pub mod traits;
pub mod xyz;
