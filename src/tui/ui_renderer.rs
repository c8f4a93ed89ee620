use super::app_logic::TuiApp;
use super::app_state::AppMode;
use crate::constraints::CompatibilityEvaluator;
use crate::drive::StatusKind;
use crate::gate::ContinueAffordance;
use crate::utils::bytes_to_closest_unit;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

const WARNING_NOTICE: &str =
    "WARNING: You have chosen one or more drives with warning label. Proceed with caution!";

fn draw_help_block(f: &mut Frame, area: Rect) {
    let help_text_lines_content = vec![
        Line::from("Arrows/jk: Nav | Space: Toggle drive | Enter/c: Continue | d: Details | q/Esc: Cancel"),
    ];
    let help_paragraph = Paragraph::new(help_text_lines_content).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Select Drives"),
    );
    f.render_widget(help_paragraph, area);
}

fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Error => Style::default().fg(Color::Black).bg(Color::Red),
        StatusKind::Warning => Style::default().fg(Color::Black).bg(Color::Yellow),
        StatusKind::Ok => Style::default().fg(Color::White).bg(Color::DarkGray),
    }
}

fn draw_empty_state(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("Connect a drive!").bold(),
        Line::from("No removable drive connected.").fg(Color::DarkGray),
    ];
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Drives"));
    f.render_widget(paragraph, area);
}

fn draw_drive_list_block<E: CompatibilityEvaluator>(f: &mut Frame, app: &mut TuiApp<E>, area: Rect) {
    let drives = app.flow.listed_drives();
    if drives.is_empty() {
        draw_empty_state(f, area);
        return;
    }
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_cursor_is_visible_in_viewport();

    let end = (app.scroll_offset + app.list_viewport_height).min(drives.len());
    let list_items: Vec<ListItem> = drives
        .get(app.scroll_offset..end)
        .unwrap_or(&[])
        .iter()
        .map(|drive| {
            let valid = app.flow.is_valid(drive);
            let tick = if app.flow.selection().contains(&drive.device) {
                "[x] "
            } else if valid {
                "[ ] "
            } else {
                "[-] "
            };
            let text_style = if valid {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![
                Span::styled(tick, text_style),
                Span::styled(
                    format!("{} - {}", drive.description, bytes_to_closest_unit(drive.size)),
                    text_style,
                ),
                Span::styled(format!("  {}", drive.device), Style::default().fg(Color::DarkGray)),
            ];
            if !app.flow.is_connected(drive) {
                spans.push(Span::styled(" (disconnected)", Style::default().fg(Color::Red)));
            }
            for status in app.flow.statuses_for(drive) {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(format!(" {} ", status.message), status_style(status.kind)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title("Drives"))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ratatui::widgets::ListState::default();
    if app.cursor >= app.scroll_offset && app.cursor < end {
        list_state_for_view.select(Some(app.cursor - app.scroll_offset));
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

fn continue_span(affordance: ContinueAffordance) -> Span<'static> {
    match affordance {
        ContinueAffordance::Blocked => Span::styled("[ Continue ]", Style::default().fg(Color::DarkGray)),
        ContinueAffordance::Caution => Span::styled(
            "[ Continue ]",
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        ContinueAffordance::Ready => Span::styled(
            "[ Continue ]",
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    }
}

fn draw_summary_block<E: CompatibilityEvaluator>(f: &mut Frame, app: &TuiApp<E>, area: Rect) {
    let summary = app.flow.summary();
    let mut title_line = vec![Span::styled(summary.title.clone(), Style::default().bold())];
    if !summary.size_label.is_empty() {
        title_line.push(Span::raw(format!("  {}", summary.size_label)));
    }
    title_line.push(Span::raw("   "));
    title_line.push(continue_span(app.flow.continue_affordance()));

    let mut lines = vec![Line::from(title_line)];
    if !summary.footer.is_empty() {
        lines.push(Line::from(summary.footer.join("  ")).fg(Color::DarkGray));
    }
    if app.flow.shows_warning_notice() {
        lines.push(Line::from(WARNING_NOTICE).fg(Color::Yellow));
    }
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Selected ({})", summary.count)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

fn draw_details_overlay<E: CompatibilityEvaluator>(f: &mut Frame, app: &TuiApp<E>) {
    let area = centered_rect(60, 50, f.area());
    let lines: Vec<Line> = app
        .flow
        .summary()
        .tooltips
        .into_iter()
        .map(Line::from)
        .collect();
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Selected Drives (Esc to close)"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

pub(super) fn ui_frame<E: CompatibilityEvaluator>(frame: &mut Frame, app: &mut TuiApp<E>) {
    let summary_height = if app.flow.shows_warning_notice() { 6 } else { 5 };
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(summary_height),
        ])
        .split(frame.area());

    draw_help_block(frame, main_chunks[0]);
    draw_drive_list_block(frame, app, main_chunks[1]);
    draw_summary_block(frame, app, main_chunks[2]);

    if app.mode == AppMode::Details {
        draw_details_overlay(frame, app);
    }
}
