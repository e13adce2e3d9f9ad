use std::path::PathBuf;
use trajstore::store::OpenMode;

/// Fully resolved settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub trajectory_path: PathBuf,
    pub box_file_path: PathBuf,
    pub output_path: PathBuf,
    pub open_mode: OpenMode,
}
