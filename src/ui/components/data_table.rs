//! Paged table shared by the vehicle, alert and penalty views.
//!
//! Columns come from the row type's [`Tabular`] definition, the same one the
//! CSV and PDF exports use, so what is exported matches what is on screen.

use crate::export::Tabular;
use crate::list::PaginationWindow;
use crate::ui::core::Action;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, TableState},
    Frame,
};

/// Row selection within the visible page
#[derive(Debug, Default)]
pub struct DataTable {
    state: TableState,
}

impl DataTable {
    pub fn new() -> Self {
        Self {
            state: TableState::default().with_selected(Some(0)),
        }
    }

    pub fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.state.select(Some((self.selected() + 1).min(len - 1)));
        }
    }

    pub fn select_previous(&mut self) {
        self.state.select(Some(self.selected().saturating_sub(1)));
    }

    /// Keep the selection on the page after the page contents changed
    pub fn clamp(&mut self, len: usize) {
        self.state.select(Some(self.selected().min(len.saturating_sub(1))));
    }

    pub fn reset(&mut self) {
        self.state.select(Some(0));
    }

    pub fn selected_item<'a, T>(&self, visible: &'a [T]) -> Option<&'a T> {
        visible.get(self.selected())
    }

    /// Render one page of rows with the pagination summary in the bottom border
    pub fn render<T, F>(
        &mut self,
        f: &mut Frame,
        area: Rect,
        title: &str,
        rows: &[T],
        pagination: &PaginationWindow,
        row_style: F,
    ) where
        T: Tabular,
        F: Fn(&T) -> Style,
    {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" {} ", title))
            .title_bottom(Line::from(pagination_label(pagination)).alignment(Alignment::Right))
            .style(Style::default().fg(Color::Gray));

        if rows.is_empty() {
            let empty = Paragraph::new("No records match the current filters")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(T::headers())
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let body = rows.iter().map(|row| Row::new(row.display_cells()).style(row_style(row)));
        let widths = T::column_widths().into_iter().map(Constraint::Fill);

        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        self.clamp(rows.len());
        f.render_stateful_widget(table, area, &mut self.state);
    }
}

/// "Showing 1-10 of 23 · Page 1/3"
pub fn pagination_label(pagination: &PaginationWindow) -> String {
    format!(
        " {} · Page {}/{} ",
        pagination.describe(),
        pagination.current_page(),
        pagination.total_pages().max(1)
    )
}

/// Keys every paged list shares: row movement and page changes
pub fn navigation_action(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => Action::NextRow,
        KeyCode::Up | KeyCode::Char('k') => Action::PreviousRow,
        KeyCode::Right | KeyCode::Char(']') | KeyCode::PageDown => Action::NextPage,
        KeyCode::Left | KeyCode::Char('[') | KeyCode::PageUp => Action::PreviousPage,
        KeyCode::Home => Action::FirstPage,
        KeyCode::End => Action::LastPage,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn selection_stays_within_the_page() {
        let mut table = DataTable::new();
        table.select_next(3);
        table.select_next(3);
        table.select_next(3);
        assert_eq!(table.selected(), 2);

        table.clamp(1);
        assert_eq!(table.selected(), 0);

        table.select_previous();
        assert_eq!(table.selected(), 0);
    }

    #[test]
    fn label_reports_at_least_one_page() {
        let pagination = PaginationWindow::new(10);
        assert_eq!(pagination_label(&pagination), " Showing 0 of 0 · Page 1/1 ");
    }

    #[test]
    fn paging_keys_map_to_page_actions() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert!(matches!(navigation_action(key(KeyCode::Char(']'))), Action::NextPage));
        assert!(matches!(navigation_action(key(KeyCode::Home)), Action::FirstPage));
        assert!(matches!(navigation_action(key(KeyCode::Char('x'))), Action::None));
    }
}
