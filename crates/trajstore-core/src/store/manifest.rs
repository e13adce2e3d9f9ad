use super::error::StoreError;
use super::schema::{
    MANIFEST_FILE, PARAMS_GROUP, PARAMS_GROUP_TITLE, SIMULATION_GROUP, SIMULATION_GROUP_TITLE,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Current on-disk layout version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupEntry {
    pub name: String,
    pub title: String,
}

/// Human-readable description of a store, kept at its root as `manifest.toml`.
///
/// The manifest is written when the store is created and rewritten when it is
/// closed. `complete = false` on disk means the writer never reached `close`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreManifest {
    pub format_version: u32,
    pub title: String,
    pub complete: bool,
    pub snapshot_count: u64,
    pub groups: Vec<GroupEntry>,
}

impl StoreManifest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            title: title.into(),
            complete: false,
            snapshot_count: 0,
            groups: vec![
                GroupEntry {
                    name: PARAMS_GROUP.to_string(),
                    title: PARAMS_GROUP_TITLE.to_string(),
                },
                GroupEntry {
                    name: SIMULATION_GROUP.to_string(),
                    title: SIMULATION_GROUP_TITLE.to_string(),
                },
            ],
        }
    }

    pub fn group_title(&self, name: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.title.as_str())
    }

    pub fn load(store_root: &Path) -> Result<Self, StoreError> {
        let path = store_root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(StoreError::NotAStore {
                path: store_root.to_path_buf(),
            });
        }
        let content = fs::read_to_string(&path).map_err(StoreError::io(&path))?;
        toml::from_str(&content).map_err(|e| StoreError::Manifest {
            path,
            message: e.to_string(),
        })
    }

    /// Writes the manifest through a temporary file and a rename so readers never
    /// observe a half-written manifest.
    pub fn save(&self, store_root: &Path) -> Result<(), StoreError> {
        let path = store_root.join(MANIFEST_FILE);
        let tmp_path = store_root.join(format!("{MANIFEST_FILE}.tmp"));
        let content = toml::to_string(self).map_err(|e| StoreError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let mut tmp = File::create(&tmp_path).map_err(StoreError::io(&tmp_path))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.sync_all())
            .map_err(StoreError::io(&tmp_path))?;
        drop(tmp);

        fs::rename(&tmp_path, &path).map_err(StoreError::io(&path))?;
        sync_dir(store_root)
    }
}

/// Makes renames and newly created entries in `dir` durable.
///
/// Directories cannot be opened for syncing on every platform; there this is a no-op.
pub(crate) fn sync_dir(dir: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        File::open(dir)
            .and_then(|d| d.sync_all())
            .map_err(StoreError::io(dir))?;
    }
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}
