//! Alerts view: every weight alert with severity, location and overload filters.

use crate::api::ApiError;
use crate::export::ExportFormat;
use crate::list::{AlertFilter, ListController, LoadOutcome, PageReset, RequestTicket};
use crate::models::Alert;
use crate::ui::components::data_table::{navigation_action, DataTable};
use crate::ui::core::{Action, Component, DialogType};
use crate::utils::color::severity_color;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

pub const HINTS: &str = "/: filter • s: severity • c: clear • x: CSV";

pub struct AlertsComponent {
    pub list: ListController<Alert>,
    pub filter: AlertFilter,
    table: DataTable,
}

impl AlertsComponent {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListController::new(page_size),
            filter: AlertFilter::default(),
            table: DataTable::new(),
        }
    }

    pub fn selected(&self) -> Option<&Alert> {
        self.table.selected_item(self.list.visible())
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.list.begin_load()
    }

    pub fn finish_load(&mut self, ticket: RequestTicket, result: Result<Vec<Alert>, ApiError>, reset: PageReset) -> LoadOutcome {
        let outcome = self.list.complete_load(ticket, result, reset);
        self.table.clamp(self.list.visible().len());
        outcome
    }

    pub fn set_filter(&mut self, filter: AlertFilter) {
        if filter.is_active() {
            self.list.apply_filter(filter.predicate());
        } else {
            self.list.clear_filter();
        }
        self.filter = filter;
        self.table.reset();
    }

    fn row_style(alert: &Alert) -> Style {
        let style = Style::default().fg(severity_color(alert.severity));
        if alert.notified {
            style
        } else {
            style.add_modifier(Modifier::BOLD)
        }
    }

    fn filter_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(severity) = self.filter.severity {
            parts.push(format!("severity: {}", severity.label()));
        }
        if !self.filter.location.trim().is_empty() {
            parts.push(format!("location: {}", self.filter.location.trim()));
        }
        if let Some(min) = self.filter.min_overload {
            parts.push(format!("overload ≥ {}", min));
        }
        if !self.filter.vehicle.trim().is_empty() {
            parts.push(format!("vehicle: {}", self.filter.vehicle.trim()));
        }
        parts.join(" • ")
    }

    fn render_details(&self, f: &mut Frame, area: Rect) {
        let lines = match self.selected() {
            Some(alert) => vec![
                Line::from(vec![
                    Span::styled(
                        format!("{} ", alert.severity.label()),
                        Style::default().fg(severity_color(alert.severity)).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("{} • {}", alert.alert_type.label(), alert.vehicle_plate)),
                    Span::styled(
                        if alert.notified { "  notified" } else { "  not notified" },
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(alert.message.clone()),
                Line::from(Span::styled(
                    alert.map_url.clone().unwrap_or_default(),
                    Style::default().fg(Color::Blue),
                )),
            ],
            None => vec![Line::from("No alert selected")],
        };
        let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Details ")
                .style(Style::default().fg(Color::Gray)),
        );
        f.render_widget(details, area);
    }
}

impl Component for AlertsComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('/') | KeyCode::Char('f') => Action::ShowDialog(DialogType::AlertFilter(self.filter.clone())),
            KeyCode::Char('s') => {
                let mut filter = self.filter.clone();
                filter.cycle_severity();
                Action::ApplyAlertFilter(filter)
            }
            KeyCode::Char('c') => Action::ClearFilter,
            KeyCode::Char('x') => Action::Export(ExportFormat::Csv),
            _ => navigation_action(key),
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::NextRow => self.table.select_next(self.list.visible().len()),
            Action::PreviousRow => self.table.select_previous(),
            Action::NextPage => self.list.next_page(),
            Action::PreviousPage => self.list.prev_page(),
            Action::FirstPage => self.list.first_page(),
            Action::LastPage => self.list.last_page(),
            Action::ApplyAlertFilter(filter) => self.set_filter(filter),
            Action::ClearFilter => self.set_filter(AlertFilter::default()),
            other => return other,
        }
        Action::None
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let [table_area, details_area] = Layout::vertical([Constraint::Min(6), Constraint::Length(5)]).areas(rect);

        let mut title = format!("Alerts ({})", self.list.all().len());
        if self.filter.is_active() {
            title.push_str(&format!(" • {} • shown: {}", self.filter_summary(), self.list.filtered().len()));
        }
        let pagination = *self.list.pagination();
        self.table
            .render(f, table_area, &title, self.list.visible(), &pagination, Self::row_style);
        self.render_details(f, details_area);
    }
}
