use super::error::StoreError;
use super::manifest::{StoreManifest, sync_dir};
use super::schema::{
    self, MANIFEST_FILE, PARAMS_GROUP, PARAMS_TABLE, SIMULATION_GROUP, TABLE_EXTENSION,
};
use crate::core::models::atom::AtomRecord;
use crate::core::models::trajectory::SimulationParameters;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How [`TrajectoryStore::open`] treats an existing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Fail with [`StoreError::StoreAlreadyExists`] if anything exists at the path.
    #[default]
    CreateNew,
    /// Replace an existing store. Paths that are not stores are never deleted.
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    AwaitingParameters,
    Writing { last_index: Option<u64> },
    Closed,
}

/// Totals reported when a store is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreSummary {
    pub snapshots_written: u64,
    pub atoms_written: u64,
}

/// Write-once writer for a trajectory store.
///
/// The expected call sequence is `open`, `write_parameters` once,
/// `write_snapshot` for each snapshot in increasing index order, then `close`.
/// Any deviation is rejected with a [`StoreError`] and leaves everything written so
/// far untouched. Each table is synced to disk before its write call returns.
#[derive(Debug)]
pub struct TrajectoryStore {
    root: PathBuf,
    manifest: StoreManifest,
    properties: WriterProperties,
    state: WriterState,
    summary: StoreSummary,
}

impl TrajectoryStore {
    /// Creates a new store at `path`.
    ///
    /// The store title is the file stem of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StoreAlreadyExists`] in [`OpenMode::CreateNew`] if the path
    /// exists, [`StoreError::NotAStore`] in [`OpenMode::Overwrite`] if the existing path
    /// is not a store, and [`StoreError::Io`] if the directories cannot be created.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();

        if root.exists() {
            match mode {
                OpenMode::CreateNew => {
                    return Err(StoreError::StoreAlreadyExists { path: root });
                }
                OpenMode::Overwrite => {
                    if !root.join(MANIFEST_FILE).is_file() {
                        return Err(StoreError::NotAStore { path: root });
                    }
                    warn!("Overwriting existing store at {:?}", root);
                    fs::remove_dir_all(&root).map_err(StoreError::io(&root))?;
                }
            }
        }

        fs::create_dir(&root).map_err(|source| match source.kind() {
            std::io::ErrorKind::AlreadyExists => StoreError::StoreAlreadyExists {
                path: root.clone(),
            },
            _ => StoreError::Io {
                path: root.clone(),
                source,
            },
        })?;
        for group in [PARAMS_GROUP, SIMULATION_GROUP] {
            let group_path = root.join(group);
            fs::create_dir(&group_path).map_err(StoreError::io(&group_path))?;
        }

        let title = root
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let manifest = StoreManifest::new(title);
        manifest.save(&root)?;

        info!("Created trajectory store at {:?}", root);

        Ok(Self {
            root,
            manifest,
            properties: WriterProperties::builder()
                .set_compression(Compression::ZSTD(ZstdLevel::default()))
                .build(),
            state: WriterState::AwaitingParameters,
            summary: StoreSummary::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn summary(&self) -> StoreSummary {
        self.summary
    }

    pub fn is_closed(&self) -> bool {
        self.state == WriterState::Closed
    }

    /// Path of the table `name` in `group`.
    pub fn table_path(&self, group: &str, name: &str) -> PathBuf {
        self.root
            .join(group)
            .join(format!("{name}.{TABLE_EXTENSION}"))
    }

    /// Writes the single row of the `md_params` table.
    pub fn write_parameters(&mut self, params: &SimulationParameters) -> Result<(), StoreError> {
        match self.state {
            WriterState::Closed => return Err(StoreError::WriteAfterClose),
            WriterState::Writing { .. } => return Err(StoreError::ParametersAlreadyWritten),
            WriterState::AwaitingParameters => {}
        }

        let path = self.table_path(PARAMS_GROUP, PARAMS_TABLE);
        let batch = schema::params_to_batch(params).map_err(StoreError::arrow(&path))?;
        self.write_table(&path, &batch)?;

        debug!(
            "Wrote simulation parameters: box = ({}, {}, {})",
            params.box_x, params.box_y, params.box_z
        );
        self.state = WriterState::Writing { last_index: None };
        Ok(())
    }

    /// Writes one snapshot table named after `index`, one row per record in order.
    pub fn write_snapshot(&mut self, index: u64, records: &[AtomRecord]) -> Result<(), StoreError> {
        let last_index = match self.state {
            WriterState::Closed => return Err(StoreError::WriteAfterClose),
            WriterState::AwaitingParameters => return Err(StoreError::ParametersNotWritten),
            WriterState::Writing { last_index } => last_index,
        };
        if index == 0 || last_index.is_some_and(|last| index <= last) {
            return Err(StoreError::SnapshotOutOfOrder {
                index,
                last: last_index,
            });
        }

        let name = schema::snapshot_table_name(index);
        let path = self.table_path(SIMULATION_GROUP, &name);
        let batch = schema::records_to_batch(records).map_err(StoreError::arrow(&path))?;
        self.write_table(&path, &batch)?;

        self.state = WriterState::Writing {
            last_index: Some(index),
        };
        self.summary.snapshots_written += 1;
        self.summary.atoms_written += records.len() as u64;
        debug!("Wrote table {} with {} rows.", name, records.len());
        Ok(())
    }

    /// Finalizes the store by marking its manifest complete.
    ///
    /// After `close` every write, including another `close`, fails with
    /// [`StoreError::WriteAfterClose`].
    pub fn close(&mut self) -> Result<StoreSummary, StoreError> {
        match self.state {
            WriterState::Closed => return Err(StoreError::WriteAfterClose),
            WriterState::AwaitingParameters => return Err(StoreError::ParametersNotWritten),
            WriterState::Writing { .. } => {}
        }

        self.manifest.complete = true;
        self.manifest.snapshot_count = self.summary.snapshots_written;
        self.manifest.save(&self.root)?;
        self.state = WriterState::Closed;

        info!(
            "Closed store {:?}: {} snapshot(s), {} atom row(s).",
            self.root, self.summary.snapshots_written, self.summary.atoms_written
        );
        Ok(self.summary)
    }

    fn write_table(&self, path: &Path, batch: &RecordBatch) -> Result<(), StoreError> {
        // create_new: a table is never reopened once written.
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(StoreError::io(path))?;

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(self.properties.clone()))
            .map_err(StoreError::parquet(path))?;
        writer.write(batch).map_err(StoreError::parquet(path))?;
        let file = writer.into_inner().map_err(StoreError::parquet(path))?;
        file.sync_all().map_err(StoreError::io(path))?;

        // The table's directory entry must be durable too.
        match path.parent() {
            Some(group) => sync_dir(group),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn params() -> SimulationParameters {
        SimulationParameters::new(10.0, 20.0, 30.0)
    }

    fn atoms(n: usize) -> Vec<AtomRecord> {
        (0..n)
            .map(|i| AtomRecord::from_arrays(1, [i as f64, 0.0, 0.0], [0.0, i as f64, 0.0]))
            .collect()
    }

    #[test]
    fn open_creates_groups_and_manifest() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("run.mdstore");
        let store = TrajectoryStore::open(&root, OpenMode::CreateNew).unwrap();

        assert!(root.join(PARAMS_GROUP).is_dir());
        assert!(root.join(SIMULATION_GROUP).is_dir());
        assert!(root.join(MANIFEST_FILE).is_file());
        assert_eq!(store.root(), root.as_path());

        let manifest = StoreManifest::load(&root).unwrap();
        assert_eq!(manifest.title, "run");
        assert!(!manifest.complete);
    }

    #[test]
    fn create_new_refuses_existing_path() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("run.mdstore");
        TrajectoryStore::open(&root, OpenMode::CreateNew).unwrap();

        let result = TrajectoryStore::open(&root, OpenMode::CreateNew);
        assert!(matches!(result, Err(StoreError::StoreAlreadyExists { .. })));
    }

    #[test]
    fn overwrite_replaces_existing_store() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("run.mdstore");
        let mut first = TrajectoryStore::open(&root, OpenMode::CreateNew).unwrap();
        first.write_parameters(&params()).unwrap();
        first.write_snapshot(1, &atoms(2)).unwrap();
        first.close().unwrap();

        let _second = TrajectoryStore::open(&root, OpenMode::Overwrite).unwrap();
        assert!(!root.join(SIMULATION_GROUP).join("SS_0000000001.parquet").exists());
        assert!(!StoreManifest::load(&root).unwrap().complete);
    }

    #[test]
    fn overwrite_refuses_to_delete_non_store_paths() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("precious");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("data.txt"), "keep me").unwrap();

        let result = TrajectoryStore::open(&root, OpenMode::Overwrite);
        assert!(matches!(result, Err(StoreError::NotAStore { .. })));
        assert!(root.join("data.txt").exists());
    }

    #[test]
    fn snapshot_before_parameters_is_rejected() {
        let dir = tempdir().unwrap();
        let mut store = TrajectoryStore::open(dir.path().join("s"), OpenMode::CreateNew).unwrap();

        let result = store.write_snapshot(1, &atoms(1));
        assert!(matches!(result, Err(StoreError::ParametersNotWritten)));
    }

    #[test]
    fn parameters_can_only_be_written_once() {
        let dir = tempdir().unwrap();
        let mut store = TrajectoryStore::open(dir.path().join("s"), OpenMode::CreateNew).unwrap();
        store.write_parameters(&params()).unwrap();

        let result = store.write_parameters(&params());
        assert!(matches!(result, Err(StoreError::ParametersAlreadyWritten)));
    }

    #[test]
    fn snapshot_indices_must_start_at_one_and_increase() {
        let dir = tempdir().unwrap();
        let mut store = TrajectoryStore::open(dir.path().join("s"), OpenMode::CreateNew).unwrap();
        store.write_parameters(&params()).unwrap();

        assert!(matches!(
            store.write_snapshot(0, &atoms(1)),
            Err(StoreError::SnapshotOutOfOrder {
                index: 0,
                last: None
            })
        ));
        store.write_snapshot(1, &atoms(1)).unwrap();
        store.write_snapshot(2, &atoms(1)).unwrap();
        assert!(matches!(
            store.write_snapshot(2, &atoms(1)),
            Err(StoreError::SnapshotOutOfOrder {
                index: 2,
                last: Some(2)
            })
        ));
    }

    #[test]
    fn writes_after_close_are_rejected() {
        let dir = tempdir().unwrap();
        let mut store = TrajectoryStore::open(dir.path().join("s"), OpenMode::CreateNew).unwrap();
        store.write_parameters(&params()).unwrap();
        store.write_snapshot(1, &atoms(3)).unwrap();
        let summary = store.close().unwrap();

        assert!(store.is_closed());
        assert_eq!(
            summary,
            StoreSummary {
                snapshots_written: 1,
                atoms_written: 3
            }
        );
        assert!(matches!(
            store.write_snapshot(2, &atoms(1)),
            Err(StoreError::WriteAfterClose)
        ));
        assert!(matches!(
            store.write_parameters(&params()),
            Err(StoreError::WriteAfterClose)
        ));
        assert!(matches!(store.close(), Err(StoreError::WriteAfterClose)));
    }

    #[test]
    fn close_marks_manifest_complete() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        let mut store = TrajectoryStore::open(&root, OpenMode::CreateNew).unwrap();
        store.write_parameters(&params()).unwrap();
        store.write_snapshot(1, &atoms(1)).unwrap();
        store.write_snapshot(5, &atoms(1)).unwrap();
        store.close().unwrap();

        let manifest = StoreManifest::load(&root).unwrap();
        assert!(manifest.complete);
        assert_eq!(manifest.snapshot_count, 2);
    }

    #[test]
    fn tables_are_complete_on_disk_before_close() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        let mut store = TrajectoryStore::open(&root, OpenMode::CreateNew).unwrap();
        store.write_parameters(&params()).unwrap();
        store.write_snapshot(1, &atoms(4)).unwrap();

        let table = store.table_path(SIMULATION_GROUP, "SS_0000000001");
        let bytes = fs::read(&table).unwrap();
        assert!(bytes.starts_with(b"PAR1") && bytes.ends_with(b"PAR1"));
        assert!(!root.join(format!("{MANIFEST_FILE}.tmp")).exists());
        assert_eq!(store.summary().atoms_written, 4);
    }

    #[test]
    fn table_files_are_named_after_snapshot_index() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        let mut store = TrajectoryStore::open(&root, OpenMode::CreateNew).unwrap();
        store.write_parameters(&params()).unwrap();
        store.write_snapshot(42, &atoms(1)).unwrap();

        assert!(root.join("calculation_input/md_params.parquet").is_file());
        assert!(root.join("simulation/SS_0000000042.parquet").is_file());
    }
}
