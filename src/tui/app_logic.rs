use super::app_state::{AppMode, FinishAction};
use crate::constraints::CompatibilityEvaluator;
use crate::drive::Drive;
use crate::flow::{DriveSelectorFlow, FlowResult};
use crossterm::event::{KeyCode, KeyEvent};

pub struct TuiApp<E> {
    pub(super) flow: DriveSelectorFlow<E>,
    pub(super) cursor: usize,
    pub(super) scroll_offset: usize,
    pub(super) quit: bool,
    pub(super) finish: Option<FinishAction>,
    pub(super) mode: AppMode,
    pub(super) list_viewport_height: usize,
}

impl<E: CompatibilityEvaluator> TuiApp<E> {
    pub fn new(flow: DriveSelectorFlow<E>) -> Self {
        TuiApp {
            flow,
            cursor: 0,
            scroll_offset: 0,
            quit: false,
            finish: None,
            mode: AppMode::Selecting,
            list_viewport_height: 0, // Will be updated by ui_renderer
        }
    }

    pub(super) fn current_drive(&self) -> Option<Drive> {
        self.flow.listed_drives().into_iter().nth(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        let count = self.flow.listed_drives().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    pub(super) fn move_cursor(&mut self, delta: i32) {
        let count = self.flow.listed_drives().len();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor as i32 + delta).rem_euclid(count as i32) as usize;
        self.ensure_cursor_is_visible_in_viewport();
    }

    pub(super) fn toggle_current_drive(&mut self) {
        if let Some(drive) = self.current_drive() {
            // Deselecting a disconnected drive removes its row.
            if self.flow.on_toggle(&drive) && !self.flow.is_connected(&drive) {
                self.clamp_cursor();
                self.ensure_cursor_is_visible_in_viewport();
            }
        }
    }

    pub(super) fn request_continue(&mut self) {
        // Disabled while nothing is selected.
        if self.flow.continue_affordance().is_enabled() {
            self.finish = Some(FinishAction::Continue);
            self.quit = true;
        }
    }

    pub(super) fn cancel(&mut self) {
        self.finish = Some(FinishAction::Cancel);
        self.quit = true;
    }

    /// Applies a changed drive list, keeping the cursor on the same device when it is still listed.
    pub(super) fn apply_drive_update(&mut self, drives: Vec<Drive>) {
        let focused = self.current_drive().map(|d| d.device);
        self.flow.on_drives_changed(drives);
        let listed = self.flow.listed_drives();
        let fallback = self.cursor.min(listed.len().saturating_sub(1));
        self.cursor = focused
            .and_then(|device| listed.iter().position(|d| d.device == device))
            .unwrap_or(fallback);
        self.ensure_cursor_is_visible_in_viewport();
    }

    pub(super) fn ensure_cursor_is_visible_in_viewport(&mut self) {
        let count = self.flow.listed_drives().len();
        if count == 0 || self.list_viewport_height == 0 {
            self.scroll_offset = 0;
            return;
        }
        let list_height = self.list_viewport_height;
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + list_height {
            self.scroll_offset = self.cursor.saturating_sub(list_height - 1);
        }
        if count <= list_height {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = self.scroll_offset.min(count - list_height);
        }
    }

    // --- Event handling sub-methods ---
    pub(super) fn handle_selecting_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.cancel(),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char(' ') => self.toggle_current_drive(),
            KeyCode::Enter | KeyCode::Char('c') => self.request_continue(),
            KeyCode::Char('d') => {
                if !self.flow.selection().is_empty() {
                    self.mode = AppMode::Details;
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_details_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char('q') => {
                self.mode = AppMode::Selecting;
            }
            _ => {}
        }
    }

    pub fn into_result(self) -> FlowResult {
        match self.finish {
            Some(FinishAction::Continue) => self.flow.on_confirm(),
            Some(FinishAction::Cancel) | None => self.flow.on_cancel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::DriveConstraints;
    use crate::flow::FlowOutcome;
    use crate::gate::{CompatibilityGate, VerdictPolicy};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn drive(device: &str) -> Drive {
        Drive::new(device, "stick", device, 16_000_000_000)
    }

    fn app(drives: Vec<Drive>) -> TuiApp<DriveConstraints> {
        let gate = CompatibilityGate::new(DriveConstraints::default(), VerdictPolicy::Permissive);
        TuiApp::new(DriveSelectorFlow::new(gate, None, drives))
    }

    #[test]
    fn continue_is_ignored_while_blocked() {
        let mut app = app(vec![drive("/dev/sdb")]);
        app.handle_selecting_input(key(KeyCode::Enter));
        assert!(!app.quit);

        app.handle_selecting_input(key(KeyCode::Char(' ')));
        app.handle_selecting_input(key(KeyCode::Enter));
        assert!(app.quit);
        let result = app.into_result();
        assert_eq!(result.outcome, FlowOutcome::Done);
        assert_eq!(result.drives, vec![drive("/dev/sdb")]);
    }

    #[test]
    fn escape_cancels() {
        let mut app = app(vec![drive("/dev/sdb")]);
        app.handle_selecting_input(key(KeyCode::Char(' ')));
        app.handle_selecting_input(key(KeyCode::Esc));
        assert!(app.quit);
        assert_eq!(app.into_result(), FlowResult::cancelled());
    }

    #[test]
    fn cursor_wraps_around() {
        let mut app = app(vec![drive("/dev/sdb"), drive("/dev/sdc")]);
        app.handle_selecting_input(key(KeyCode::Up));
        assert_eq!(app.cursor, 1);
        app.handle_selecting_input(key(KeyCode::Down));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn cursor_follows_device_across_updates() {
        let mut app = app(vec![drive("/dev/sdb"), drive("/dev/sdc")]);
        app.move_cursor(1);
        app.apply_drive_update(vec![drive("/dev/sda"), drive("/dev/sdb"), drive("/dev/sdc")]);
        assert_eq!(app.current_drive().map(|d| d.device), Some("/dev/sdc".to_string()));

        app.apply_drive_update(vec![drive("/dev/sda")]);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn details_only_with_selection() {
        let mut app = app(vec![drive("/dev/sdb")]);
        app.handle_selecting_input(key(KeyCode::Char('d')));
        assert_eq!(app.mode, AppMode::Selecting);
        app.handle_selecting_input(key(KeyCode::Char(' ')));
        app.handle_selecting_input(key(KeyCode::Char('d')));
        assert_eq!(app.mode, AppMode::Details);
        app.handle_details_input(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Selecting);
    }

    #[test]
    fn disconnected_selection_can_be_deselected() {
        let mut app = app(vec![drive("/dev/sdb"), drive("/dev/sdc")]);
        app.handle_selecting_input(key(KeyCode::Char(' ')));
        app.apply_drive_update(vec![drive("/dev/sdc")]);

        let listed: Vec<String> = app.flow.listed_drives().into_iter().map(|d| d.device).collect();
        assert_eq!(listed, vec!["/dev/sdc".to_string(), "/dev/sdb".to_string()]);
        // The cursor stays on the drive it was on, now below the connected ones.
        assert_eq!(app.cursor, 1);

        app.handle_selecting_input(key(KeyCode::Char(' ')));
        assert!(app.flow.selection().is_empty());
        assert_eq!(app.cursor, 0);

        app.handle_selecting_input(key(KeyCode::Enter));
        assert!(!app.quit);
        app.handle_selecting_input(key(KeyCode::Esc));
        assert_eq!(app.into_result(), FlowResult::cancelled());
    }
}
