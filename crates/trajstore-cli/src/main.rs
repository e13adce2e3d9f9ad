mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::Cli;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use clap::Parser;
use std::time::Instant;
use tracing::{debug, error, info};

const RUN_TIME_RULE_WIDTH: usize = 80;

fn main() {
    let started = Instant::now();
    let result = run_app();
    print_run_time(started);

    if let Err(e) = result {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let command_result = (|| {
        info!(
            "🚀 xvg2store v{} starting up.",
            env!("CARGO_PKG_VERSION")
        );
        debug!("Full CLI arguments parsed: {:?}", &cli);

        let app_config = config::build_config(&cli)?;
        debug!("Resolved configuration: {:?}", &app_config);

        let progress_handler = CliProgressHandler::new();
        commands::convert::run(&app_config, &progress_handler).map(|_| ())
    })();

    match &command_result {
        Ok(_) => {
            info!("✅ Conversion completed successfully.");
            println!("✅ Conversion completed successfully.");
        }
        Err(e) => {
            error!("❌ Conversion failed: {}", e);
        }
    }

    command_result
}

fn print_run_time(started: Instant) {
    let rule = "#".repeat(RUN_TIME_RULE_WIDTH);
    println!("{rule}");
    println!("Run time (m): {}", started.elapsed().as_secs_f64() / 60.0);
    println!("{rule}");
}
