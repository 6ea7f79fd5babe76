use super::common::{create_dialog_block, create_instructions_paragraph, shortcuts};
use super::scroll_behavior::ScrollState;
use crate::constants::DIALOG_TITLE_DEBUG_LOGS;
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

const HELP_TEXT: &str = r"
LOADWATCH - Vehicle Weight Monitoring
=====================================

VIEWS
-----
Tab / Shift+Tab   Next / previous view
1-5               Dashboard, Vehicles, Alerts, Reports, Penalties

LISTS
-----
j/k  ↑/↓          Move selection
]/[  →/←          Next / previous page
PgDn/PgUp         Next / previous page
Home/End          First / last page
/  f              Open filters
c                 Clear filters

VEHICLES
--------
a                 Add vehicle
e  Enter          Edit selected vehicle
d  Del            Delete selected vehicle
s                 Cycle status filter
x / P             Export CSV / PDF

ALERTS
------
s                 Cycle severity filter
x                 Export CSV

REPORTS
-------
d                 Change date range

PENALTIES
---------
v                 Toggle per-vehicle totals
m                 Mark selected penalty as paid
s                 Change penalty status
R                 Update penalty rate
u                 Cycle paid / unpaid filter
x                 Export per-vehicle CSV

GENERAL
-------
r                 Refresh / retry
L                 Log out
G                 Show logs
?                 Toggle this help
q  Ctrl+C         Quit

Press 'Esc' or '?' to close this help
";

fn render_scrollbar(f: &mut Frame, area: Rect, scroll: &mut ScrollState) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("▐")
        .style(Style::default().fg(Color::Gray))
        .thumb_style(Style::default().fg(Color::White));

    f.render_stateful_widget(scrollbar, area, &mut scroll.scrollbar);
}

/// Full-screen overlay for long read-only text (help, logs)
fn render_text_overlay(f: &mut Frame, area: Rect, title: &str, content: &str, scroll: &mut ScrollState) {
    let overlay = LayoutManager::centered_rect(90, 90, area);
    f.render_widget(Clear, overlay);

    let content_area = overlay.inner(ratatui::layout::Margin {
        horizontal: 2,
        vertical: 1,
    });

    let lines: Vec<&str> = content.lines().collect();
    let visible_height = content_area.height.saturating_sub(2) as usize;
    let offset = scroll.clamp(lines.len(), visible_height);
    let text = lines
        .iter()
        .skip(offset)
        .take(visible_height)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(paragraph, content_area);

    if lines.len() > visible_height {
        render_scrollbar(f, content_area, scroll);
    }
}

pub fn render_help_dialog(f: &mut Frame, area: Rect, scroll: &mut ScrollState) {
    render_text_overlay(f, area, "📖 Help - Press 'Esc' or '?' to close", HELP_TEXT, scroll);
}

pub fn render_logs_dialog(f: &mut Frame, area: Rect, logs: &[String], scroll: &mut ScrollState) {
    let content = if logs.is_empty() {
        "No logs yet".to_string()
    } else {
        logs.join("\n")
    };
    render_text_overlay(f, area, DIALOG_TITLE_DEBUG_LOGS, &content, scroll);
}

/// Info or error message; any non-scroll key dismisses it
pub fn render_message_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    color: Color,
    message: &str,
    scroll: &mut ScrollState,
) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 10, area);
    f.render_widget(Clear, dialog_area);
    f.render_widget(create_dialog_block(title, color), dialog_area);

    let inner = dialog_area.inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 1,
    });
    let [content_area, instructions_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let lines: Vec<&str> = message.lines().collect();
    let visible_height = content_area.height as usize;
    let offset = scroll.clamp(lines.len(), visible_height);

    let message_paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true })
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    f.render_widget(message_paragraph, content_area);

    let instructions = Paragraph::new("Press any key to continue • j/k to scroll if needed")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(instructions, instructions_area);

    if lines.len() > visible_height {
        render_scrollbar(f, content_area, scroll);
    }
}

/// Yes/no confirmation for destructive actions
pub fn render_confirm_dialog(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let dialog_area = LayoutManager::centered_rect_lines(50, 6, area);
    f.render_widget(Clear, dialog_area);
    f.render_widget(create_dialog_block(title, Color::Red), dialog_area);

    let inner = dialog_area.inner(ratatui::layout::Margin {
        horizontal: 1,
        vertical: 1,
    });
    let [message_area, _, instructions_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let message_paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message_paragraph, message_area);
    f.render_widget(
        create_instructions_paragraph(&[shortcuts::ENTER_CONFIRM, shortcuts::SEPARATOR, shortcuts::ESC_CANCEL]),
        instructions_area,
    );
}
