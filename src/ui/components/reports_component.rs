//! Reports view: summary counters, alert frequency, weight trends and overload alerts.

use crate::api::ApiError;
use crate::list::{LoadOutcome, PaginationWindow, RequestSequence, RequestTicket};
use crate::models::{Alert, AlertFrequency, WeightTrend};
use crate::service::ReportBundle;
use crate::ui::components::data_table::{navigation_action, DataTable};
use crate::ui::core::{Action, Component, DialogType};
use crate::utils::color::severity_color;
use crate::utils::datetime::DateRange;
use crate::utils::format::format_weight;
use crossterm::event::{KeyCode, KeyEvent};
use log::info;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

pub const HINTS: &str = "d: date range • ←/→: alert pages";

pub struct ReportsComponent {
    range: DateRange,
    sequence: RequestSequence,
    bundle: Option<ReportBundle>,
    loading: bool,
    error: Option<String>,
    alert_pages: PaginationWindow,
    table: DataTable,
    weight_limit: f64,
}

impl ReportsComponent {
    pub fn new(range: DateRange, page_size: usize, weight_limit: f64) -> Self {
        Self {
            range,
            sequence: RequestSequence::default(),
            bundle: None,
            loading: false,
            error: None,
            alert_pages: PaginationWindow::new(page_size),
            table: DataTable::new(),
            weight_limit,
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn bundle(&self) -> Option<&ReportBundle> {
        self.bundle.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Overload alerts of the current page
    pub fn visible_alerts(&self) -> &[Alert] {
        match &self.bundle {
            Some(bundle) => self.alert_pages.slice(&bundle.summary.overload_alerts),
            None => &[],
        }
    }

    /// Ticket and range of a new report fetch
    pub fn begin_load(&mut self) -> (RequestTicket, DateRange) {
        self.loading = true;
        (self.sequence.issue(), self.range)
    }

    pub fn finish_load(&mut self, ticket: RequestTicket, result: Result<ReportBundle, ApiError>) -> LoadOutcome {
        if !self.sequence.accept(ticket) {
            return LoadOutcome::Stale;
        }
        let latest = self.sequence.is_latest(ticket);
        match result {
            Ok(bundle) => {
                if bundle.range != self.range {
                    info!("Report for {} arrived after switching to {}", bundle.range, self.range);
                }
                self.alert_pages.set_total_items(bundle.summary.overload_alerts.len());
                self.bundle = Some(bundle);
                if latest {
                    self.error = None;
                }
            }
            Err(e) => {
                if latest {
                    self.error = Some(e.to_string());
                }
            }
        }
        if latest {
            self.loading = false;
        }
        self.table.clamp(self.visible_alerts().len());
        LoadOutcome::Applied
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
        self.alert_pages.reset();
        self.table.reset();
    }

    fn render_summary(&self, f: &mut Frame, area: Rect) {
        let counter = |label: &'static str, value: u64, color: Color| {
            vec![
                Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
                Span::styled(
                    value.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("   "),
            ]
        };

        let mut spans = vec![Span::styled(
            format!("{}   ", self.range),
            Style::default().fg(Color::Cyan),
        )];
        match &self.bundle {
            Some(bundle) => {
                spans.extend(counter("Critical alerts", bundle.summary.critical_alerts, Color::Red));
                spans.extend(counter("Warnings", bundle.summary.warning_alerts, Color::Yellow));
                spans.extend(counter("Normal vehicles", bundle.summary.normal_vehicles, Color::Green));
            }
            None => spans.push(Span::styled("No report loaded", Style::default().fg(Color::DarkGray))),
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_frequency(f: &mut Frame, area: Rect, frequency: &AlertFrequency) {
        let count = |v: f64| v.max(0.0).round() as u64;
        let mut chart = BarChart::default()
            .block(chart_block("Alert frequency"))
            .bar_width(3)
            .bar_gap(0)
            .group_gap(2)
            .value_style(Style::default().fg(Color::Black));

        for (i, month) in frequency.months.iter().enumerate() {
            let critical = frequency.critical.get(i).copied().unwrap_or(0.0);
            let warning = frequency.warning.get(i).copied().unwrap_or(0.0);
            let bars = [
                Bar::default()
                    .value(count(critical))
                    .style(Style::default().fg(Color::Red)),
                Bar::default()
                    .value(count(warning))
                    .style(Style::default().fg(Color::Yellow)),
            ];
            chart = chart.data(BarGroup::default().label(Line::from(month.clone())).bars(&bars));
        }
        f.render_widget(chart, area);
    }

    fn render_trends(&self, f: &mut Frame, area: Rect, trends: &WeightTrend) {
        let points: Vec<(f64, f64)> = trends
            .average_weights
            .iter()
            .enumerate()
            .map(|(i, w)| (i as f64, *w))
            .collect();
        let last_x = (points.len().max(2) - 1) as f64;
        let limit = [(0.0, self.weight_limit), (last_x, self.weight_limit)];
        let top = (trends.peak().max(self.weight_limit) * 1.1).max(1.0);

        let datasets = vec![
            Dataset::default()
                .name("Average weight")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&points),
            Dataset::default()
                .name("Limit")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Red))
                .data(&limit),
        ];

        let x_labels: Vec<String> = match (trends.times.first(), trends.times.last()) {
            (Some(first), Some(last)) if trends.times.len() > 1 => vec![first.clone(), last.clone()],
            (Some(only), _) => vec![only.clone()],
            _ => Vec::new(),
        };

        let chart = Chart::new(datasets)
            .block(chart_block("Weight trends"))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, last_x])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, top])
                    .labels(vec![format_weight(0.0), format_weight(top / 2.0), format_weight(top)]),
            );
        f.render_widget(chart, area);
    }

    fn alert_style(alert: &Alert) -> Style {
        let style = Style::default().fg(severity_color(alert.severity));
        if alert.notified {
            style
        } else {
            style.add_modifier(Modifier::BOLD)
        }
    }
}

fn chart_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", title))
        .style(Style::default().fg(Color::Gray))
}

impl Component for ReportsComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('d') | KeyCode::Char('/') => Action::ShowDialog(DialogType::ReportRange(self.range)),
            _ => navigation_action(key),
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::NextRow => self.table.select_next(self.visible_alerts().len()),
            Action::PreviousRow => self.table.select_previous(),
            Action::NextPage => self.alert_pages.next_page(),
            Action::PreviousPage => self.alert_pages.prev_page(),
            Action::FirstPage => self.alert_pages.first_page(),
            Action::LastPage => self.alert_pages.last_page(),
            Action::SetReportRange(range) => {
                self.set_range(range);
                return Action::SetReportRange(range);
            }
            other => return other,
        }
        Action::None
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let [summary_area, charts_area, table_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Percentage(50),
            Constraint::Min(5),
        ])
        .areas(rect);
        self.render_summary(f, summary_area);

        let Some(bundle) = self.bundle.clone() else {
            let message = if self.loading {
                "Loading report…"
            } else {
                "Report unavailable • press r to retry"
            };
            let placeholder = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(chart_block("Reports"));
            f.render_widget(placeholder, charts_area.union(table_area));
            return;
        };

        let [frequency_area, trends_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(charts_area);
        Self::render_frequency(f, frequency_area, &bundle.frequency);
        self.render_trends(f, trends_area, &bundle.trends);

        let title = format!("Overload alerts ({})", bundle.summary.overload_alerts.len());
        let pagination = self.alert_pages;
        let rows = pagination.slice(&bundle.summary.overload_alerts);
        self.table
            .render(f, table_area, &title, rows, &pagination, Self::alert_style);
    }
}
