use clap::{Args, Parser};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "xvg2store - Convert a molecular-dynamics trajectory log into a columnar trajectory store with one table per snapshot.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Path to the trajectory log (e.g., run.xvg).
    #[arg(required = true, value_name = "TRAJECTORY")]
    pub trajectory: PathBuf,

    /// Path to the box parameter file.
    /// Defaults to the trajectory path with the configured box-file extension.
    #[arg(short, long, value_name = "PATH")]
    pub box_file: Option<PathBuf>,

    /// Path of the output store.
    /// Defaults to the trajectory path with the configured output extension.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override `output.overwrite` from the config file.
    #[command(flatten)]
    pub overwrite: OverwriteFlag,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.extension=h5store
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Mutually exclusive flags deciding whether an existing store may be replaced.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct OverwriteFlag {
    /// Replace an existing store at the output path.
    #[arg(long)]
    pub overwrite: bool,
    /// Refuse to replace an existing store, even if the config file allows it.
    #[arg(long)]
    pub no_overwrite: bool,
}

impl OverwriteFlag {
    pub fn as_option(self) -> Option<bool> {
        match (self.overwrite, self.no_overwrite) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}
