use anyhow::Result;
use clap::Parser;
use drivepick::{cli, logging, workflow};
use log::LevelFilter;

fn main() -> Result<()> {
    let cli_args = cli::Cli::parse();

    let default_level = if cli_args.headless {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    logging::init(cli_args.log_file.as_deref(), default_level, !cli_args.headless);

    // Delegate the main application logic to the workflow module
    workflow::run_drivepick(cli_args)
}
