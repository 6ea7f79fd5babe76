//! Penalties view: individual penalties or per-vehicle totals, with payment actions.

use crate::aggregate::{grand_total, group_penalties_by_vehicle, outstanding_total, VehiclePenaltySummary};
use crate::api::ApiError;
use crate::export::ExportFormat;
use crate::list::{ListController, LoadOutcome, PageReset, PaginationWindow, PenaltyFilter, RequestTicket};
use crate::constants::INFO_PENALTY_ALREADY_PAID;
use crate::models::{Penalty, PenaltyRate, PenaltyStatus};
use crate::ui::components::data_table::{navigation_action, DataTable};
use crate::ui::core::{Action, Component, DialogType};
use crate::utils::color::penalty_status_color;
use crate::utils::format::format_currency;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const HINTS: &str = "v: by vehicle • m: mark paid • s: status • R: rate • /: filter • u: paid • x: CSV";

pub struct PenaltiesComponent {
    pub list: ListController<Penalty>,
    pub filter: PenaltyFilter,
    pub rate: Option<PenaltyRate>,
    pub grouped: bool,
    groups: Vec<VehiclePenaltySummary>,
    group_pages: PaginationWindow,
    table: DataTable,
    group_table: DataTable,
    currency: String,
}

impl PenaltiesComponent {
    pub fn new(page_size: usize, currency: impl Into<String>) -> Self {
        Self {
            list: ListController::new(page_size),
            filter: PenaltyFilter::default(),
            rate: None,
            grouped: false,
            groups: Vec::new(),
            group_pages: PaginationWindow::new(page_size),
            table: DataTable::new(),
            group_table: DataTable::new(),
            currency: currency.into(),
        }
    }

    pub fn selected(&self) -> Option<&Penalty> {
        if self.grouped {
            return None;
        }
        self.table.selected_item(self.list.visible())
    }

    /// Per-vehicle totals of the filtered penalties
    pub fn groups(&self) -> &[VehiclePenaltySummary] {
        &self.groups
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.list.begin_load()
    }

    pub fn finish_load(&mut self, ticket: RequestTicket, result: Result<Vec<Penalty>, ApiError>, reset: PageReset) -> LoadOutcome {
        let outcome = self.list.complete_load(ticket, result, reset);
        if outcome == LoadOutcome::Applied {
            self.regroup(reset);
        }
        self.table.clamp(self.list.visible().len());
        outcome
    }

    pub fn set_filter(&mut self, filter: PenaltyFilter) {
        if filter.is_active() {
            self.list.apply_filter(filter.predicate());
        } else {
            self.list.clear_filter();
        }
        self.filter = filter;
        self.regroup(PageReset::Reset);
        self.table.reset();
        self.group_table.reset();
    }

    /// Sum of all grouped amounts
    pub fn total_amount(&self) -> f64 {
        grand_total(self.groups.iter().map(|g| &g.summary))
    }

    /// Sum of unpaid amounts
    pub fn outstanding_amount(&self) -> f64 {
        outstanding_total(self.groups.iter().map(|g| &g.summary))
    }

    fn regroup(&mut self, reset: PageReset) {
        self.groups = group_penalties_by_vehicle(self.list.filtered());
        self.group_pages.set_total_items(self.groups.len());
        if reset == PageReset::Reset {
            self.group_pages.reset();
        }
    }

    fn row_style(penalty: &Penalty) -> Style {
        Style::default().fg(penalty_status_color(penalty.status))
    }

    fn group_style(group: &VehiclePenaltySummary) -> Style {
        if group.summary.outstanding_amount > 0.0 {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        }
    }

    fn render_totals(&self, f: &mut Frame, area: Rect) {
        let rate = self
            .rate
            .as_ref()
            .map(|r| format_currency(r.amount, &self.currency))
            .unwrap_or_else(|| "…".to_string());
        let line = Line::from(vec![
            Span::styled("Total: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_currency(self.total_amount(), &self.currency),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Outstanding: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_currency(self.outstanding_amount(), &self.currency),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Rate per overload: ", Style::default().fg(Color::Gray)),
            Span::styled(rate, Style::default().fg(Color::Cyan)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}

impl Component for PenaltiesComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('v') => Action::TogglePenaltyGrouping,
            KeyCode::Char('m') => match self.selected() {
                Some(penalty) if !penalty.paid => Action::ShowDialog(DialogType::MarkPenaltyPaid { id: penalty.id }),
                Some(_) => Action::ShowDialog(DialogType::Info(INFO_PENALTY_ALREADY_PAID.to_string())),
                None => Action::None,
            },
            KeyCode::Char('s') => match self.selected() {
                Some(penalty) if penalty.paid || penalty.status == PenaltyStatus::Paid => {
                    Action::ShowDialog(DialogType::Info(INFO_PENALTY_ALREADY_PAID.to_string()))
                }
                Some(penalty) => Action::ShowDialog(DialogType::PenaltyStatus {
                    id: penalty.id,
                    current: penalty.status,
                }),
                None => Action::None,
            },
            KeyCode::Char('R') => Action::ShowDialog(DialogType::PenaltyRate {
                current: self.rate.clone().unwrap_or_default(),
            }),
            KeyCode::Char('/') | KeyCode::Char('f') => Action::ShowDialog(DialogType::PenaltyFilter(self.filter.clone())),
            KeyCode::Char('u') => {
                let mut filter = self.filter.clone();
                filter.cycle_paid();
                Action::ApplyPenaltyFilter(filter)
            }
            KeyCode::Char('c') => Action::ClearFilter,
            KeyCode::Char('x') => Action::Export(ExportFormat::Csv),
            _ => navigation_action(key),
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::TogglePenaltyGrouping => self.grouped = !self.grouped,
            Action::NextRow if self.grouped => {
                let len = self.group_pages.slice(&self.groups).len();
                self.group_table.select_next(len);
            }
            Action::PreviousRow if self.grouped => self.group_table.select_previous(),
            Action::NextPage if self.grouped => self.group_pages.next_page(),
            Action::PreviousPage if self.grouped => self.group_pages.prev_page(),
            Action::FirstPage if self.grouped => self.group_pages.first_page(),
            Action::LastPage if self.grouped => self.group_pages.last_page(),
            Action::NextRow => self.table.select_next(self.list.visible().len()),
            Action::PreviousRow => self.table.select_previous(),
            Action::NextPage => self.list.next_page(),
            Action::PreviousPage => self.list.prev_page(),
            Action::FirstPage => self.list.first_page(),
            Action::LastPage => self.list.last_page(),
            // Filters also go to the server, so the app refetches afterwards
            Action::ApplyPenaltyFilter(filter) => {
                self.set_filter(filter.clone());
                return Action::ApplyPenaltyFilter(filter);
            }
            Action::ClearFilter => {
                self.set_filter(PenaltyFilter::default());
                return Action::ApplyPenaltyFilter(PenaltyFilter::default());
            }
            other => return other,
        }
        Action::None
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let [totals_area, table_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(rect);
        self.render_totals(f, totals_area);

        if self.grouped {
            let title = format!("Penalties by vehicle ({})", self.groups.len());
            let pagination = self.group_pages;
            let rows = pagination.slice(&self.groups);
            self.group_table
                .render(f, table_area, &title, rows, &pagination, Self::group_style);
        } else {
            let mut title = format!("Penalties ({})", self.list.all().len());
            if self.filter.is_active() || self.filter.range.is_some() {
                title.push_str(&format!(" • filtered: {}", self.list.filtered().len()));
                if let Some(range) = self.filter.range {
                    title.push_str(&format!(" • {}", range));
                }
                match self.filter.paid {
                    Some(true) => title.push_str(" • paid"),
                    Some(false) => title.push_str(" • unpaid"),
                    None => {}
                }
                if let Some(status) = self.filter.status {
                    title.push_str(&format!(" • {}", status));
                }
            }
            let pagination = *self.list.pagination();
            self.table
                .render(f, table_area, &title, self.list.visible(), &pagination, Self::row_style);
        }
    }
}
