mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

// The main function to run the TUI
pub use self::run_tui::run_drive_selector;

// Main TUI loop and terminal setup/teardown
mod run_tui {
    use super::app_logic::TuiApp;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use crate::constraints::CompatibilityEvaluator;
    use crate::enumerator::DeviceEnumerator;
    use crate::flow::{DriveSelectorFlow, FlowResult};
    use crate::poller::DrivePoller;
    use anyhow::{Context, Result};
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};
    use std::sync::Arc;
    use std::time::Duration;

    /// Shows the selector until the user continues or cancels.
    ///
    /// The drive poller runs only while the selector is on screen and is
    /// stopped before the terminal is restored, whether the loop ended
    /// normally or with an error.
    pub fn run_drive_selector<E, D>(
        flow: DriveSelectorFlow<E>,
        enumerator: Arc<D>,
        poll_interval: Duration,
    ) -> Result<FlowResult>
    where
        E: CompatibilityEvaluator,
        D: DeviceEnumerator + Send + Sync + 'static,
    {
        let initial = flow.available_drives().to_vec();
        let mut app = TuiApp::new(flow);

        let poller = DrivePoller::start(enumerator, initial, poll_interval)
            .context("failed to start drive poller")?;
        let mut terminal = init_terminal()?;

        let loop_result = event_loop(&mut terminal, &mut app, &poller);

        poller.stop();
        restore_terminal(terminal)?;
        loop_result?;

        Ok(app.into_result())
    }

    fn event_loop<E: CompatibilityEvaluator>(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut TuiApp<E>,
        poller: &DrivePoller,
    ) -> Result<()> {
        while !app.quit {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app, poller)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enter_then(enable_raw_mode, setup_terminal, reset_terminal)
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    // Best effort: the setup error is the one worth reporting.
    fn reset_terminal() {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = disable_raw_mode();
    }

    /// Runs `setup` once `enter` succeeded; a failing `setup` runs `undo`
    /// before its error is returned.
    fn enter_then<T>(
        enter: impl FnOnce() -> io::Result<()>,
        setup: impl FnOnce() -> Result<T>,
        undo: impl FnOnce(),
    ) -> Result<T> {
        enter()?;
        setup().inspect_err(|_| undo())
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor().map_err(Into::into)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use anyhow::anyhow;
        use std::cell::Cell;

        #[test]
        fn failed_setup_undoes_enter() {
            let undone = Cell::new(false);
            let result: Result<()> = enter_then(
                || Ok(()),
                || Err(anyhow!("no alternate screen")),
                || undone.set(true),
            );
            assert!(result.is_err());
            assert!(undone.get());
        }

        #[test]
        fn successful_setup_keeps_state() {
            let undone = Cell::new(false);
            let result = enter_then(|| Ok(()), || Ok(7), || undone.set(true));
            assert_eq!(result.unwrap(), 7);
            assert!(!undone.get());
        }

        #[test]
        fn failed_enter_skips_setup() {
            let set_up = Cell::new(false);
            let undone = Cell::new(false);
            let result: Result<()> = enter_then(
                || Err(io::Error::other("not a tty")),
                || {
                    set_up.set(true);
                    Ok(())
                },
                || undone.set(true),
            );
            assert!(result.is_err());
            assert!(!set_up.get());
            assert!(!undone.get());
        }
    }
}
