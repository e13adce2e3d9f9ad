use super::error::StoreError;
use super::manifest::StoreManifest;
use super::schema::{self, PARAMS_GROUP, PARAMS_TABLE, SIMULATION_GROUP, TABLE_EXTENSION};
use crate::core::models::atom::AtomRecord;
use crate::core::models::trajectory::{SimulationParameters, Snapshot};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read-only view of a trajectory store.
#[derive(Debug, Clone)]
pub struct TrajectoryStoreReader {
    root: PathBuf,
    manifest: StoreManifest,
}

impl TrajectoryStoreReader {
    /// Opens the store at `path`.
    ///
    /// Stores whose writer never closed can still be opened; their manifest reports
    /// `complete = false` and a warning is logged.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        let manifest = StoreManifest::load(&root)?;
        if !manifest.complete {
            warn!(
                "Store {:?} was not closed cleanly; it may be missing trailing snapshots.",
                root
            );
        }
        Ok(Self { root, manifest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &StoreManifest {
        &self.manifest
    }

    pub fn parameters(&self) -> Result<SimulationParameters, StoreError> {
        let path = self.table_path(PARAMS_GROUP, PARAMS_TABLE);
        let batches = read_table(&path)?;

        let mut rows = Vec::new();
        for batch in &batches {
            let decoded = schema::batch_to_params(batch).map_err(|reason| {
                StoreError::SchemaMismatch {
                    path: path.clone(),
                    reason,
                }
            })?;
            rows.extend(decoded);
        }

        match rows.as_slice() {
            [params] => Ok(*params),
            _ => Err(StoreError::SchemaMismatch {
                path,
                reason: format!("expected exactly one row, found {}", rows.len()),
            }),
        }
    }

    /// Names of the snapshot tables in ascending index order.
    pub fn snapshot_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .snapshot_indices()?
            .into_iter()
            .map(schema::snapshot_table_name)
            .collect())
    }

    /// Indices of the snapshot tables in ascending order.
    ///
    /// Files in the simulation group that are not snapshot tables are ignored.
    pub fn snapshot_indices(&self) -> Result<Vec<u64>, StoreError> {
        let group = self.root.join(SIMULATION_GROUP);
        let entries = fs::read_dir(&group).map_err(StoreError::io(&group))?;

        let mut indices = Vec::new();
        for entry in entries {
            let entry = entry.map_err(StoreError::io(&group))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TABLE_EXTENSION) {
                continue;
            }
            match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(schema::parse_snapshot_table_name)
            {
                Some(index) => indices.push(index),
                None => debug!("Ignoring non-snapshot file {:?}", path),
            }
        }
        indices.sort_unstable();
        Ok(indices)
    }

    pub fn read_snapshot(&self, index: u64) -> Result<Snapshot, StoreError> {
        let path = self.table_path(SIMULATION_GROUP, &schema::snapshot_table_name(index));
        let batches = read_table(&path)?;

        let mut atoms: Vec<AtomRecord> = Vec::new();
        for batch in &batches {
            let decoded = schema::batch_to_records(batch).map_err(|reason| {
                StoreError::SchemaMismatch {
                    path: path.clone(),
                    reason,
                }
            })?;
            atoms.extend(decoded);
        }
        Ok(Snapshot::new(index, atoms))
    }

    fn table_path(&self, group: &str, name: &str) -> PathBuf {
        self.root
            .join(group)
            .join(format!("{name}.{TABLE_EXTENSION}"))
    }
}

fn read_table(path: &Path) -> Result<Vec<RecordBatch>, StoreError> {
    if !path.is_file() {
        return Err(StoreError::TableNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(StoreError::io(path))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(StoreError::parquet(path))?
        .build()
        .map_err(StoreError::parquet(path))?;

    reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::arrow(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::writer::{OpenMode, TrajectoryStore};
    use tempfile::tempdir;

    fn write_store(root: &Path, snapshots: &[(u64, usize)], close: bool) {
        let mut store = TrajectoryStore::open(root, OpenMode::CreateNew).unwrap();
        store
            .write_parameters(&SimulationParameters::new(1.5, 2.5, 3.5))
            .unwrap();
        for &(index, count) in snapshots {
            let atoms: Vec<AtomRecord> = (0..count)
                .map(|i| {
                    AtomRecord::from_arrays(
                        (i % 8 + 1) as u8,
                        [i as f64, index as f64, -1.0],
                        [0.5, 0.25, i as f64],
                    )
                })
                .collect();
            store.write_snapshot(index, &atoms).unwrap();
        }
        if close {
            store.close().unwrap();
        }
    }

    #[test]
    fn reads_parameters_back() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("run.mdstore");
        write_store(&root, &[(1, 2)], true);

        let reader = TrajectoryStoreReader::open(&root).unwrap();
        assert_eq!(
            reader.parameters().unwrap(),
            SimulationParameters::new(1.5, 2.5, 3.5)
        );
        assert!(reader.manifest().complete);
        assert_eq!(reader.manifest().title, "run");
    }

    #[test]
    fn lists_snapshots_in_index_order() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        write_store(&root, &[(1, 1), (2, 1), (10, 1), (11, 1)], true);

        let reader = TrajectoryStoreReader::open(&root).unwrap();
        assert_eq!(reader.snapshot_indices().unwrap(), vec![1, 2, 10, 11]);
        assert_eq!(
            reader.snapshot_names().unwrap(),
            vec![
                "SS_0000000001",
                "SS_0000000002",
                "SS_0000000010",
                "SS_0000000011"
            ]
        );
    }

    #[test]
    fn reads_snapshot_rows_in_written_order() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        write_store(&root, &[(1, 5)], true);

        let snapshot = TrajectoryStoreReader::open(&root)
            .unwrap()
            .read_snapshot(1)
            .unwrap();
        assert_eq!(snapshot.index, 1);
        assert_eq!(snapshot.len(), 5);
        for (i, atom) in snapshot.atoms.iter().enumerate() {
            assert_eq!(atom.atomic_number, (i % 8 + 1) as u8);
            assert_eq!(atom.position_array(), [i as f64, 1.0, -1.0]);
            assert_eq!(atom.momentum_array(), [0.5, 0.25, i as f64]);
        }
    }

    #[test]
    fn empty_snapshot_table_reads_as_empty() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        write_store(&root, &[(1, 0)], true);

        let snapshot = TrajectoryStoreReader::open(&root)
            .unwrap()
            .read_snapshot(1)
            .unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn missing_snapshot_is_table_not_found() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        write_store(&root, &[(1, 1)], true);

        let result = TrajectoryStoreReader::open(&root).unwrap().read_snapshot(7);
        assert!(matches!(result, Err(StoreError::TableNotFound { .. })));
    }

    #[test]
    fn unclosed_store_is_readable_up_to_last_write() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        write_store(&root, &[(1, 2), (2, 3)], false);

        let reader = TrajectoryStoreReader::open(&root).unwrap();
        assert!(!reader.manifest().complete);
        assert_eq!(reader.snapshot_indices().unwrap(), vec![1, 2]);
        assert_eq!(reader.read_snapshot(2).unwrap().len(), 3);
    }

    #[test]
    fn foreign_files_in_simulation_group_are_ignored() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("s");
        write_store(&root, &[(3, 1)], true);
        fs::write(root.join(SIMULATION_GROUP).join("notes.txt"), "hi").unwrap();
        fs::write(root.join(SIMULATION_GROUP).join("SS_3.parquet"), "bogus").unwrap();

        let reader = TrajectoryStoreReader::open(&root).unwrap();
        assert_eq!(reader.snapshot_indices().unwrap(), vec![3]);
    }

    #[test]
    fn opening_a_plain_directory_fails() {
        let dir = tempdir().unwrap();
        let result = TrajectoryStoreReader::open(dir.path());
        assert!(matches!(result, Err(StoreError::NotAStore { .. })));
    }
}
