use crate::gate::VerdictPolicy;
use clap::Parser;
use std::path::PathBuf;

/// drivepick – choose the drives to flash an image to
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Image file that will be written to the selected drives.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Recommended drive size for the image, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub recommended_size: Option<u64>,

    /// How often to look for newly attached or removed drives.
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// How to treat drives whose compatibility cannot be determined.
    #[arg(long, value_enum, default_value_t = VerdictPolicy::Permissive)]
    pub unknown_verdict: VerdictPolicy,

    /// Drives larger than this (in GB) get a "Large drive" warning.
    #[arg(long, value_name = "GB", default_value_t = 64)]
    pub large_drive_gb: u64,

    /// Also list fixed disks, including the one the system runs from.
    #[arg(long)]
    pub all_drives: bool,

    /// Device to select up front (e.g. /dev/sdb). Can be given multiple times.
    #[arg(long, value_name = "DEVICE")]
    pub preselect: Vec<String>,

    /// Run without the TUI: list drives, apply --preselect and print the result.
    #[arg(long)]
    pub headless: bool,

    /// Print the final result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write log output to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
