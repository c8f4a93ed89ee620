use crate::constraints::CompatibilityEvaluator;
use crate::drive::{CompatibilityStatus, Drive, Image};
use crate::error::SelectorError;
use crate::selection::Selection;
use clap::ValueEnum;
use log::debug;
use serde::Serialize;

pub const UNVERIFIED: &str = "Unverified";

/// What to do with a drive the evaluator cannot grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
pub enum VerdictPolicy {
    /// Treat it as having no statuses.
    #[default]
    Permissive,
    /// Report an "Unverified" error, making the drive unselectable.
    Block,
    /// Report an "Unverified" warning.
    Caution,
}

/// Presentation of the "continue" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContinueAffordance {
    /// Nothing selected; continue is disabled.
    Blocked,
    /// Something selected, but at least one selected drive has a warning or error.
    Caution,
    /// Something selected and every selected drive is clean.
    Ready,
}

impl ContinueAffordance {
    pub fn is_enabled(self) -> bool {
        self != ContinueAffordance::Blocked
    }
}

/// Keeps drives the evaluator rejects out of the selection.
pub struct CompatibilityGate<E> {
    evaluator: E,
    policy: VerdictPolicy,
}

impl<E: CompatibilityEvaluator> CompatibilityGate<E> {
    pub fn new(evaluator: E, policy: VerdictPolicy) -> Self {
        CompatibilityGate { evaluator, policy }
    }

    pub fn policy(&self) -> VerdictPolicy {
        self.policy
    }

    /// Statuses for `drive`, with the policy standing in for a missing verdict.
    pub fn graded_statuses(&self, drive: &Drive, image: Option<&Image>) -> Vec<CompatibilityStatus> {
        match self.evaluator.statuses_for(drive, image) {
            Ok(statuses) => statuses,
            Err(err) => {
                debug!("{} (policy: {:?})", err, self.policy);
                match self.policy {
                    VerdictPolicy::Permissive => Vec::new(),
                    VerdictPolicy::Block => vec![CompatibilityStatus::error(UNVERIFIED)],
                    VerdictPolicy::Caution => vec![CompatibilityStatus::warning(UNVERIFIED)],
                }
            }
        }
    }

    pub fn continue_affordance(
        &self,
        selection: &Selection,
        image: Option<&Image>,
    ) -> ContinueAffordance {
        if selection.is_empty() {
            ContinueAffordance::Blocked
        } else if self.has_any_warning_or_error(selection.drives(), image) {
            ContinueAffordance::Caution
        } else {
            ContinueAffordance::Ready
        }
    }

    /// Toggles `drive` if the gate accepts it.
    pub fn toggle(
        &self,
        selection: &Selection,
        drive: &Drive,
        image: Option<&Image>,
    ) -> Result<Selection, SelectorError> {
        if !self.is_valid(drive, image) {
            return Err(SelectorError::InvalidToggleAttempt {
                device: drive.device.clone(),
            });
        }
        Ok(selection.toggle(drive, true))
    }
}

// The gate is itself an evaluator, so `is_valid` and
// `has_any_warning_or_error` always see the policy-applied statuses.
impl<E: CompatibilityEvaluator> CompatibilityEvaluator for CompatibilityGate<E> {
    fn statuses_for(
        &self,
        drive: &Drive,
        image: Option<&Image>,
    ) -> Result<Vec<CompatibilityStatus>, SelectorError> {
        Ok(self.graded_statuses(drive, image))
    }
}
