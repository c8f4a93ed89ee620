use env_logger::Target;
use log::LevelFilter;
use std::fs::{self, File};
use std::path::Path;

/// Sets up `env_logger`. `RUST_LOG` overrides `default_level`.
///
/// With `terminal_owned` set, a full-screen view draws on the terminal, so
/// records only go to `log_file`; without a usable file, logging is off.
pub fn init(log_file: Option<&Path>, default_level: LevelFilter, terminal_owned: bool) {
    let file = log_file.and_then(|path| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let (target, level, honour_env) = log_target(file, default_level, terminal_owned);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if honour_env {
        builder.parse_default_env();
    }
    builder.target(target).init();
}

// Picks the sink, its level, and whether `RUST_LOG` may raise it.
fn log_target(
    file: Option<File>,
    default_level: LevelFilter,
    terminal_owned: bool,
) -> (Target, LevelFilter, bool) {
    match file {
        Some(file) => (Target::Pipe(Box::new(file)), default_level, true),
        None if terminal_owned => (Target::Stderr, LevelFilter::Off, false),
        None => (Target::Stderr, default_level, true),
    }
}
