use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::fs::File;
use std::io::BufReader;
use tracing::info;
use trajstore::{
    core::io::{box_params::BoxParamsFile, traits::TextFormat},
    store::{
        TrajectoryStore, TrajectoryStoreReader,
        schema::{PARAMS_GROUP, SIMULATION_GROUP},
    },
    workflows::{
        self,
        convert::ConversionSummary,
        progress::ProgressReporter,
    },
};

pub fn run(config: &AppConfig, progress_handler: &CliProgressHandler) -> Result<ConversionSummary> {
    info!("Loading box parameters from {:?}", &config.box_file_path);
    let params =
        BoxParamsFile::read_from_path(&config.box_file_path).map_err(|e| CliError::FileParsing {
            path: config.box_file_path.clone(),
            source: e.into(),
        })?;

    info!("Opening trajectory {:?}", &config.trajectory_path);
    let trajectory = File::open(&config.trajectory_path).map_err(|e| CliError::FileParsing {
        path: config.trajectory_path.clone(),
        source: e.into(),
    })?;

    let mut store = TrajectoryStore::open(&config.output_path, config.open_mode)?;

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Converting {} -> {}",
        config.trajectory_path.display(),
        config.output_path.display()
    );
    info!("Invoking the core conversion workflow...");

    let summary = workflows::convert::run(
        BufReader::new(trajectory),
        &params,
        &mut store,
        &reporter,
    )?;

    println!(
        "✓ Wrote {} snapshot(s) ({} atom records) to: {}",
        summary.snapshots,
        summary.atoms,
        config.output_path.display()
    );

    let reader = TrajectoryStoreReader::open(&config.output_path)?;
    for line in describe_store(&reader) {
        println!("  {}", line);
    }
    Ok(summary)
}

/// One line per group of a finished store, with its title and table count.
fn describe_store(reader: &TrajectoryStoreReader) -> Vec<String> {
    let manifest = reader.manifest();
    let mut lines = vec![format!("Store '{}'", manifest.title)];
    for (group, tables) in [
        (PARAMS_GROUP, 1),
        (SIMULATION_GROUP, manifest.snapshot_count),
    ] {
        let title = manifest.group_title(group).unwrap_or(group);
        lines.push(format!("{}/ \"{}\": {} table(s)", group, title, tables));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;
    use trajstore::store::OpenMode;

    fn write_inputs(dir: &Path) -> AppConfig {
        let m = format!("#{}", "-".repeat(80));
        let trajectory_path = dir.join("run.xvg");
        let box_file_path = dir.join("run.sle");
        fs::write(
            &trajectory_path,
            format!("{m}\n{m}\n8 0.0,0.0,0.0 0.1,0.2,0.3\n1 1.0,0.0,0.0 0.0,0.0,0.0\n{m}\n"),
        )
        .unwrap();
        fs::write(&box_file_path, "title\nBOX 0 0 5.0 6.0 7.0\n").unwrap();

        AppConfig {
            trajectory_path,
            box_file_path,
            output_path: dir.join("run.mdstore"),
            open_mode: OpenMode::CreateNew,
        }
    }

    fn handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn converts_trajectory_into_store() {
        let dir = tempdir().unwrap();
        let config = write_inputs(dir.path());

        let summary = run(&config, &handler()).unwrap();
        assert_eq!(summary.snapshots, 1);
        assert_eq!(summary.atoms, 2);

        let reader = TrajectoryStoreReader::open(&config.output_path).unwrap();
        assert_eq!(reader.parameters().unwrap().box_z, 7.0);
        assert_eq!(reader.read_snapshot(1).unwrap().atoms[0].atomic_number, 8);
    }

    #[test]
    fn store_description_lists_group_titles() {
        let dir = tempdir().unwrap();
        let config = write_inputs(dir.path());
        run(&config, &handler()).unwrap();

        let reader = TrajectoryStoreReader::open(&config.output_path).unwrap();
        assert_eq!(
            describe_store(&reader),
            vec![
                "Store 'run'".to_string(),
                "calculation_input/ \"MD Calculation Input\": 1 table(s)".to_string(),
                "simulation/ \"Full MD simulation (all snapshots)\": 1 table(s)".to_string(),
            ]
        );
    }

    #[test]
    fn missing_box_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let mut config = write_inputs(dir.path());
        config.box_file_path = dir.path().join("absent.sle");

        let result = run(&config, &handler());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
        assert!(!config.output_path.exists());
    }

    #[test]
    fn existing_store_requires_overwrite() {
        let dir = tempdir().unwrap();
        let mut config = write_inputs(dir.path());
        run(&config, &handler()).unwrap();

        let result = run(&config, &handler());
        assert!(matches!(result, Err(CliError::Store(_))));

        config.open_mode = OpenMode::Overwrite;
        assert!(run(&config, &handler()).is_ok());
    }
}
