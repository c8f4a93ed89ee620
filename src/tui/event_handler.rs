use super::app_logic::TuiApp;
use super::app_state::AppMode;
use crate::constraints::CompatibilityEvaluator;
use crate::poller::DrivePoller;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;

pub(super) fn handle_events<E: CompatibilityEvaluator>(
    app: &mut TuiApp<E>,
    poller: &DrivePoller,
) -> Result<()> {
    // Drive list changes are applied on this thread, between key presses.
    while let Some(drives) = poller.try_next() {
        app.apply_drive_update(drives);
    }
    if event::poll(Duration::from_millis(50))? {
        if let Event::Key(key_event) = event::read()? {
            if key_event.kind == KeyEventKind::Press {
                match app.mode {
                    AppMode::Selecting => app.handle_selecting_input(key_event),
                    AppMode::Details => app.handle_details_input(key_event),
                }
            }
        }
    }
    Ok(())
}
