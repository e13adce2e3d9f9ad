use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use trajstore::store::OpenMode;

/// Resolves the run settings. Precedence is CLI flag, then config file, then defaults.
pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let input_file = file_config.input.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let box_file_extension = input_file
        .box_file_extension
        .unwrap_or(defaults.box_file_extension);
    let output_extension = output_file
        .extension
        .unwrap_or(defaults.output_extension);
    let overwrite = args
        .overwrite
        .as_option()
        .or(output_file.overwrite)
        .unwrap_or(defaults.overwrite);

    let box_file_path = match &args.box_file {
        Some(path) => path.clone(),
        None => sibling_path(&args.trajectory, &box_file_extension, "input.box-file-extension")?,
    };
    let output_path = match &args.output {
        Some(path) => path.clone(),
        None => sibling_path(&args.trajectory, &output_extension, "output.extension")?,
    };

    if output_path == args.trajectory || output_path == box_file_path {
        return Err(CliError::Argument(format!(
            "Output store path {:?} would replace an input file",
            output_path
        )));
    }

    Ok(AppConfig {
        trajectory_path: args.trajectory.clone(),
        box_file_path,
        output_path,
        open_mode: if overwrite {
            OpenMode::Overwrite
        } else {
            OpenMode::CreateNew
        },
    })
}

/// Returns `trajectory` with its extension replaced by `extension`.
fn sibling_path(trajectory: &Path, extension: &str, key: &str) -> Result<PathBuf> {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        return Err(CliError::Config(format!("`{}` must not be empty", key)));
    }
    if trajectory.file_stem().is_none() {
        return Err(CliError::Argument(format!(
            "Cannot derive a file name from trajectory path {:?}",
            trajectory
        )));
    }
    Ok(trajectory.with_extension(extension))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "input.box-file-extension" => {
                config
                    .input
                    .get_or_insert_with(Default::default)
                    .box_file_extension = Some(value_str.to_string());
            }
            "output.extension" => {
                config.output.get_or_insert_with(Default::default).extension =
                    Some(value_str.to_string());
            }
            "output.overwrite" => {
                config.output.get_or_insert_with(Default::default).overwrite =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid boolean value for {}: {}",
                            key, value_str
                        ))
                    })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
