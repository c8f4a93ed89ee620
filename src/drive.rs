use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A removable storage device that can be flashed.
///
/// Two `Drive` values describe the same physical device when their `device`
/// fields match, even if the rest of the data was refreshed in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drive {
    pub device: String,
    pub description: String,
    pub display_name: String,
    pub size: u64,
    #[serde(default)]
    pub mountpoints: Vec<String>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_read_only: bool,
}

impl Drive {
    pub fn new(
        device: impl Into<String>,
        description: impl Into<String>,
        display_name: impl Into<String>,
        size: u64,
    ) -> Self {
        Drive {
            device: device.into(),
            description: description.into(),
            display_name: display_name.into(),
            size,
            mountpoints: Vec::new(),
            is_system: false,
            is_read_only: false,
        }
    }

    /// `"<description>(<displayName>)"`, as shown in tooltips and detail lists.
    pub fn tooltip(&self) -> String {
        format!("{}({})", self.description, self.display_name)
    }
}

/// The image to be written. Only the compatibility rules look inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub path: PathBuf,
    pub size: u64,
    pub recommended_drive_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl CompatibilityStatus {
    pub fn warning(message: impl Into<String>) -> Self {
        CompatibilityStatus {
            kind: StatusKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        CompatibilityStatus {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_warning_or_error(&self) -> bool {
        matches!(self.kind, StatusKind::Warning | StatusKind::Error)
    }
}
