//! # Store Module
//!
//! Persistence of trajectories as a hierarchical bundle of columnar tables.
//!
//! A store is a directory. Each *group* is a subdirectory and each *table* is an
//! Apache Parquet file carrying its Arrow schema, so the bundle can be read by any
//! Parquet-capable tool as well as by [`reader::TrajectoryStoreReader`].
//!
//! ```text
//! run.mdstore/
//! ├── manifest.toml
//! ├── calculation_input/
//! │   └── md_params.parquet          # box_x, box_y, box_z
//! └── simulation/
//!     ├── SS_0000000001.parquet      # atomic_number, pos, momentum
//!     └── SS_0000000002.parquet
//! ```
//!
//! Tables are write-once: [`writer::TrajectoryStore`] creates every table with
//! exclusive-create semantics and syncs it to disk before returning, so a crash
//! never damages tables that were already written.

pub mod error;
pub mod manifest;
pub mod reader;
pub mod schema;
pub mod writer;

pub use error::StoreError;
pub use reader::TrajectoryStoreReader;
pub use writer::{OpenMode, StoreSummary, TrajectoryStore};
