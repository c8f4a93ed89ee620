use crate::drive::{CompatibilityStatus, Drive, Image, StatusKind};
use crate::error::SelectorError;
use std::path::Path;

pub const DEFAULT_LARGE_DRIVE_BYTES: u64 = 64_000_000_000;

pub const LOCKED: &str = "Locked";
pub const CONTAINS_IMAGE: &str = "Contains Image";
pub const TOO_SMALL: &str = "Too small";
pub const SYSTEM_DRIVE: &str = "System Drive";
pub const LARGE_DRIVE: &str = "Large drive";
pub const NOT_RECOMMENDED: &str = "Not Recommended";

/// Grades how suitable a drive is for an image.
pub trait CompatibilityEvaluator {
    /// Ordered statuses for `drive`. `Err(EvaluatorUnavailable)` means no verdict.
    fn statuses_for(
        &self,
        drive: &Drive,
        image: Option<&Image>,
    ) -> Result<Vec<CompatibilityStatus>, SelectorError>;

    /// No ERROR statuses. A drive without a verdict counts as valid.
    fn is_valid(&self, drive: &Drive, image: Option<&Image>) -> bool {
        self.statuses_for(drive, image)
            .map(|statuses| statuses.iter().all(|s| s.kind != StatusKind::Error))
            .unwrap_or(true)
    }

    fn has_any_warning_or_error(&self, drives: &[Drive], image: Option<&Image>) -> bool {
        drives.iter().any(|drive| {
            self.statuses_for(drive, image)
                .map(|statuses| statuses.iter().any(CompatibilityStatus::is_warning_or_error))
                .unwrap_or(false)
        })
    }
}

/// Rules a flasher applies before writing an image to a drive.
#[derive(Debug, Clone)]
pub struct DriveConstraints {
    pub large_drive_threshold: u64,
}

impl Default for DriveConstraints {
    fn default() -> Self {
        DriveConstraints {
            large_drive_threshold: DEFAULT_LARGE_DRIVE_BYTES,
        }
    }
}

impl DriveConstraints {
    pub fn new(large_drive_threshold: u64) -> Self {
        DriveConstraints {
            large_drive_threshold,
        }
    }

    /// The image file lives on one of the drive's mounted filesystems.
    pub fn is_source_drive(drive: &Drive, image: &Image) -> bool {
        drive
            .mountpoints
            .iter()
            .filter(|m| m.starts_with('/'))
            .any(|mountpoint| image.path.starts_with(Path::new(mountpoint)))
    }

    pub fn is_large_enough(drive: &Drive, image: &Image) -> bool {
        drive.size >= image.size
    }

    pub fn is_size_recommended(drive: &Drive, image: &Image) -> bool {
        drive.size >= image.recommended_drive_size.unwrap_or(0)
    }

    pub fn is_size_large(&self, drive: &Drive) -> bool {
        drive.size > self.large_drive_threshold
    }
}

impl CompatibilityEvaluator for DriveConstraints {
    fn statuses_for(
        &self,
        drive: &Drive,
        image: Option<&Image>,
    ) -> Result<Vec<CompatibilityStatus>, SelectorError> {
        if drive.size == 0 {
            return Err(SelectorError::EvaluatorUnavailable {
                device: drive.device.clone(),
            });
        }

        let mut statuses = Vec::new();
        if drive.is_read_only {
            statuses.push(CompatibilityStatus::error(LOCKED));
        }
        if let Some(image) = image {
            if Self::is_source_drive(drive, image) {
                statuses.push(CompatibilityStatus::error(CONTAINS_IMAGE));
            }
            if !Self::is_large_enough(drive, image) {
                statuses.push(CompatibilityStatus::error(TOO_SMALL));
                return Ok(statuses);
            }
        }

        if drive.is_system {
            statuses.push(CompatibilityStatus::warning(SYSTEM_DRIVE));
        }
        if self.is_size_large(drive) {
            statuses.push(CompatibilityStatus::warning(LARGE_DRIVE));
        }
        if let Some(image) = image {
            if !Self::is_size_recommended(drive, image) {
                statuses.push(CompatibilityStatus::warning(NOT_RECOMMENDED));
            }
        }
        Ok(statuses)
    }
}
