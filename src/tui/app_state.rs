#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum AppMode {
    Selecting,
    // Overlay listing the selected drives.
    Details,
}

/// How the user closed the selector.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(super) enum FinishAction {
    Continue,
    Cancel,
}
