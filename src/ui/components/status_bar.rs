//! Status bar component

use crate::constants::LOADING_INDICATOR;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows for the current frame
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub loading: bool,
    /// Last notification, e.g. the outcome of a background action
    pub notice: Option<String>,
    /// Key hints of the active view
    pub hints: &'static str,
    pub user: Option<String>,
}

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    pub fn render(f: &mut Frame, area: Rect, status: &StatusInfo) {
        let (text, color) = if status.loading {
            (LOADING_INDICATOR.to_string(), Color::Yellow)
        } else if let Some(notice) = &status.notice {
            (notice.clone(), Color::Green)
        } else {
            (format!("{} • ?: help • q: quit", status.hints), Color::Gray)
        };

        let mut spans = vec![Span::styled(text, Style::default().fg(color))];
        if let Some(user) = &status.user {
            spans.push(Span::styled(format!("  [{}]", user), Style::default().fg(Color::DarkGray)));
        }

        let status_bar = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        f.render_widget(status_bar, area);
    }

    /// Inline error banner with a retry hint, shown above a view whose last load failed
    pub fn render_error_banner(f: &mut Frame, area: Rect, message: &str) {
        let banner = Paragraph::new(format!("⚠ {} • press r to retry", message))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).bg(Color::Red));
        f.render_widget(banner, area);
    }
}
