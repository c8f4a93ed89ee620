use crate::constraints::CompatibilityEvaluator;
use crate::drive::{CompatibilityStatus, Drive, Image};
use crate::gate::{CompatibilityGate, ContinueAffordance};
use crate::selection::{Selection, SelectionSummary};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowOutcome {
    Done,
    Cancel,
}

/// What the caller receives when the selector closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowResult {
    pub outcome: FlowOutcome,
    pub drives: Vec<Drive>,
}

impl FlowResult {
    pub fn cancelled() -> Self {
        FlowResult {
            outcome: FlowOutcome::Cancel,
            drives: Vec::new(),
        }
    }
}

/// State behind the drive selector: available drives, the current selection
/// and the image they are checked against.
pub struct DriveSelectorFlow<E> {
    gate: CompatibilityGate<E>,
    image: Option<Image>,
    available: Vec<Drive>,
    selection: Selection,
}

impl<E: CompatibilityEvaluator> DriveSelectorFlow<E> {
    pub fn new(gate: CompatibilityGate<E>, image: Option<Image>, available: Vec<Drive>) -> Self {
        DriveSelectorFlow {
            gate,
            image,
            available,
            selection: Selection::new(),
        }
    }

    /// Seeds the selection. Seeds still go through the gate; rejected ones are dropped.
    pub fn with_selection(mut self, seed: impl IntoIterator<Item = Drive>) -> Self {
        for drive in seed {
            if !self.selection.contains(&drive.device) {
                self.on_toggle(&drive);
            }
        }
        self
    }

    pub fn available_drives(&self) -> &[Drive] {
        &self.available
    }

    pub fn has_available_drives(&self) -> bool {
        !self.available.is_empty()
    }

    pub fn is_connected(&self, drive: &Drive) -> bool {
        self.available.iter().any(|d| d.device == drive.device)
    }

    /// Drives a view should list: the available ones, followed by selected
    /// drives that are no longer connected so they can still be deselected.
    pub fn listed_drives(&self) -> Vec<Drive> {
        let mut listed = self.available.clone();
        listed.extend(
            self.selection
                .drives()
                .iter()
                .filter(|drive| !self.is_connected(drive))
                .cloned(),
        );
        listed
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn summary(&self) -> SelectionSummary {
        self.selection.summary()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn statuses_for(&self, drive: &Drive) -> Vec<CompatibilityStatus> {
        self.gate.graded_statuses(drive, self.image.as_ref())
    }

    pub fn is_valid(&self, drive: &Drive) -> bool {
        self.gate.is_valid(drive, self.image.as_ref())
    }

    /// User asked to add or remove `drive`. Returns whether the selection changed.
    pub fn on_toggle(&mut self, drive: &Drive) -> bool {
        match self.gate.toggle(&self.selection, drive, self.image.as_ref()) {
            Ok(selection) => {
                debug!(
                    "{} {}",
                    if selection.contains(&drive.device) { "selected" } else { "deselected" },
                    drive.device
                );
                self.selection = selection;
                true
            }
            Err(err) => {
                debug!("ignored: {}", err);
                false
            }
        }
    }

    /// New drive list from the enumerator. Selected drives that vanished stay
    /// selected until the user toggles them off.
    pub fn on_drives_changed(&mut self, drives: Vec<Drive>) {
        self.selection = self.selection.refreshed(&drives);
        self.available = drives;
    }

    pub fn set_image(&mut self, image: Option<Image>) {
        self.image = image;
    }

    pub fn continue_affordance(&self) -> ContinueAffordance {
        self.gate
            .continue_affordance(&self.selection, self.image.as_ref())
    }

    pub fn shows_warning_notice(&self) -> bool {
        self.continue_affordance() == ContinueAffordance::Caution
    }

    /// Closes the selector. `Done` only with a non-empty selection.
    pub fn on_confirm(self) -> FlowResult {
        if self.selection.is_empty() {
            info!("nothing selected, closing as cancelled");
            return FlowResult::cancelled();
        }
        info!("confirmed {} drive(s)", self.selection.len());
        FlowResult {
            outcome: FlowOutcome::Done,
            drives: self.selection.into_drives(),
        }
    }

    pub fn on_cancel(self) -> FlowResult {
        info!("drive selection cancelled");
        FlowResult::cancelled()
    }
}
