use crate::cli::Cli;
use crate::drive::Image;
use crate::error::SelectorError;
use crate::gate::VerdictPolicy;
use crate::poller::DEFAULT_POLL_INTERVAL;
use crate::constraints::DEFAULT_LARGE_DRIVE_BYTES;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    pub image_path: Option<PathBuf>,
    pub recommended_size: Option<u64>,
    pub poll_interval: Duration,
    pub unknown_verdict: VerdictPolicy,
    pub large_drive_threshold: u64,
    pub show_all_drives: bool,
    pub preselect: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            image_path: None,
            recommended_size: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            unknown_verdict: VerdictPolicy::default(),
            large_drive_threshold: DEFAULT_LARGE_DRIVE_BYTES,
            show_all_drives: false,
            preselect: Vec::new(),
        }
    }
}

impl SelectorConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, SelectorError> {
        if cli.poll_interval_ms == 0 {
            return Err(SelectorError::Config(
                "--poll-interval-ms must be greater than zero".to_string(),
            ));
        }
        let large_drive_threshold = cli
            .large_drive_gb
            .checked_mul(1_000_000_000)
            .ok_or_else(|| SelectorError::Config("--large-drive-gb is too large".to_string()))?;

        Ok(SelectorConfig {
            image_path: cli.image.clone(),
            recommended_size: cli.recommended_size,
            poll_interval: Duration::from_millis(cli.poll_interval_ms),
            unknown_verdict: cli.unknown_verdict,
            large_drive_threshold,
            show_all_drives: cli.all_drives,
            preselect: cli.preselect.clone(),
        })
    }

    /// Reads the image's size from disk. `Ok(None)` when no image was given.
    pub fn load_image(&self) -> Result<Option<Image>, SelectorError> {
        let Some(path) = &self.image_path else {
            return Ok(None);
        };
        let metadata = fs::metadata(path).map_err(|e| {
            SelectorError::Config(format!("cannot read image {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(SelectorError::Config(format!(
                "image {} is not a file",
                path.display()
            )));
        }
        let path = path.canonicalize().unwrap_or_else(|_| path.clone());
        Ok(Some(Image {
            path,
            size: metadata.len(),
            recommended_drive_size: self.recommended_size,
        }))
    }
}
