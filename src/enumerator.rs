use crate::drive::Drive;
use crate::error::SelectorError;
use log::debug;
use serde::Deserialize;
use std::process::Command;

/// Source of the drives currently attached to the machine.
///
/// Implementations must be cheap enough to call on every poll tick.
pub trait DeviceEnumerator {
    fn list_available_drives(&self) -> Result<Vec<Drive>, SelectorError>;
}

/// Lists block devices through `lsblk`.
#[derive(Debug, Clone, Default)]
pub struct LsblkEnumerator {
    /// Also list fixed, non-USB disks (the system drive included).
    pub show_all: bool,
}

impl LsblkEnumerator {
    pub fn new(show_all: bool) -> Self {
        LsblkEnumerator { show_all }
    }
}

impl DeviceEnumerator for LsblkEnumerator {
    fn list_available_drives(&self) -> Result<Vec<Drive>, SelectorError> {
        let out = Command::new("lsblk")
            .args([
                "-J",
                "-b",
                "-o",
                "NAME,MODEL,SIZE,RM,RO,TRAN,TYPE,MOUNTPOINT",
            ])
            .output()
            .map_err(|e| SelectorError::EnumerationUnavailable(format!("lsblk: {}", e)))?;
        if !out.status.success() {
            return Err(SelectorError::EnumerationUnavailable(
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            ));
        }
        parse_lsblk(&String::from_utf8_lossy(&out.stdout), self.show_all)
    }
}

#[derive(Debug, Deserialize)]
struct Lsblk {
    blockdevices: Vec<BlockDev>,
}

#[derive(Debug, Deserialize)]
struct BlockDev {
    name: String,
    model: Option<String>,
    size: Option<Number>,
    rm: Option<Flag>,
    ro: Option<Flag>,
    tran: Option<String>,
    #[serde(rename = "type")]
    dtype: String,
    mountpoint: Option<String>,
    #[serde(default)]
    children: Vec<BlockDev>,
}

// Older lsblk releases print every column as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Number {
    Int(u64),
    Text(String),
}

impl Number {
    fn value(&self) -> u64 {
        match self {
            Number::Int(n) => *n,
            Number::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
    Text(String),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(n) => *n == 1,
            Flag::Text(s) => s.trim() == "1" || s.trim().eq_ignore_ascii_case("true"),
        }
    }
}

fn collect_mountpoints(dev: &BlockDev, out: &mut Vec<String>) {
    if let Some(mountpoint) = &dev.mountpoint {
        out.push(mountpoint.clone());
    }
    for child in &dev.children {
        collect_mountpoints(child, out);
    }
}

pub(crate) fn parse_lsblk(json: &str, show_all: bool) -> Result<Vec<Drive>, SelectorError> {
    let parsed: Lsblk = serde_json::from_str(json).map_err(|e| {
        SelectorError::EnumerationUnavailable(format!("could not parse lsblk output: {}", e))
    })?;

    let mut drives = Vec::new();
    for dev in parsed.blockdevices {
        if dev.dtype != "disk" {
            continue;
        }
        if dev.name.starts_with("loop") || dev.name.starts_with("ram") || dev.name.starts_with("zram") {
            continue;
        }
        let removable = dev.rm.as_ref().is_some_and(Flag::is_set);
        let usb = dev
            .tran
            .as_deref()
            .unwrap_or("")
            .eq_ignore_ascii_case("usb");
        if !(show_all || removable || usb) {
            debug!("skipping fixed disk {}", dev.name);
            continue;
        }

        let mut mountpoints = Vec::new();
        collect_mountpoints(&dev, &mut mountpoints);
        let device = format!("/dev/{}", dev.name);
        let description = dev
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Disk {}", dev.name));

        drives.push(Drive {
            display_name: device.clone(),
            device,
            description,
            size: dev.size.as_ref().map(Number::value).unwrap_or(0),
            is_system: mountpoints.iter().any(|m| m == "/"),
            is_read_only: dev.ro.as_ref().is_some_and(Flag::is_set),
            mountpoints,
        });
    }
    Ok(drives)
}
