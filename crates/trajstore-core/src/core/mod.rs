//! # Core Module
//!
//! Fundamental building blocks for reading trajectory logs.
//!
//! - **Data Models** ([`models`]) - Atom records, snapshots and simulation parameters
//! - **File I/O** ([`io`]) - The snapshot boundary scanner, the record builder and the
//!   small companion-file readers (box parameters, `.xyz` geometries)
//! - **Utilities** ([`utils`]) - The static element table and pair/triple geometry
//!
//! Nothing in this module touches the output store; everything here operates on
//! in-memory values or on a `BufRead` source consumed front to back.

pub mod io;
pub mod models;
pub mod utils;
