use crate::drive::Drive;
use crate::utils::{bytes_to_closest_unit, middle_ellipsis};
use serde::Serialize;

const TITLE_LIMIT: usize = 20;
const FOOTER_LIMIT: usize = 14;

/// Ordered set of drives the user intends to flash, unique by `device`.
///
/// A `Selection` is a value: `toggle` hands back a new selection and leaves
/// the receiver untouched, so a view and a caller never share a mutable list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    drives: Vec<Drive>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    /// Adds or removes `drive` by device id. Invalid drives are a no-op.
    pub fn toggle(&self, drive: &Drive, is_valid_for_image: bool) -> Selection {
        if !is_valid_for_image {
            return self.clone();
        }
        let mut drives = self.drives.clone();
        match drives.iter().position(|d| d.device == drive.device) {
            Some(idx) => {
                drives.remove(idx);
            }
            None => drives.push(drive.clone()),
        }
        Selection { drives }
    }

    pub fn contains(&self, device: &str) -> bool {
        self.drives.iter().any(|d| d.device == device)
    }

    pub fn len(&self) -> usize {
        self.drives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drives.is_empty()
    }

    pub fn drives(&self) -> &[Drive] {
        &self.drives
    }

    pub fn into_drives(self) -> Vec<Drive> {
        self.drives
    }

    /// Replaces entries with fresher data for the same device. Membership and
    /// order are unchanged; drives missing from `available` are kept as they are.
    pub fn refreshed(&self, available: &[Drive]) -> Selection {
        let drives = self
            .drives
            .iter()
            .map(|selected| {
                available
                    .iter()
                    .find(|d| d.device == selected.device)
                    .unwrap_or(selected)
                    .clone()
            })
            .collect();
        Selection { drives }
    }

    pub fn summary(&self) -> SelectionSummary {
        let tooltips: Vec<String> = self.drives.iter().map(Drive::tooltip).collect();
        let title = match self.drives.as_slice() {
            [] => "Select drive".to_string(),
            [only] => middle_ellipsis(&only.description, TITLE_LIMIT),
            many => middle_ellipsis(&format!("{} Devices", many.len()), TITLE_LIMIT),
        };
        let size_label = match self.drives.as_slice() {
            [only] => bytes_to_closest_unit(only.size),
            _ => String::new(),
        };
        let footer = if self.drives.len() > 1 {
            self.drives
                .iter()
                .map(|d| middle_ellipsis(&d.description, FOOTER_LIMIT))
                .collect()
        } else {
            Vec::new()
        };
        SelectionSummary {
            count: self.drives.len(),
            title,
            size_label,
            tooltips,
            footer,
        }
    }
}

/// Display-only digest of a selection, used by the summary button and the details overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub count: usize,
    pub title: String,
    pub size_label: String,
    pub tooltips: Vec<String>,
    pub footer: Vec<String>,
}
