//! Dashboard view: overview cards, latest alerts and the fleet map.

use crate::api::ApiError;
use crate::list::{LoadOutcome, RequestSequence, RequestTicket};
use crate::service::DashboardSnapshot;
use crate::ui::components::location_map::{render_map, MapMarker};
use crate::ui::core::{Action, Component, View};
use crate::ui::layout::LayoutManager;
use crate::utils::color::severity_color;
use crate::utils::format::{format_currency, format_overload};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

pub const HINTS: &str = "a: alerts • v: vehicles • p: penalties";

pub struct DashboardComponent {
    sequence: RequestSequence,
    snapshot: Option<DashboardSnapshot>,
    loading: bool,
    error: Option<String>,
    currency: String,
}

impl DashboardComponent {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            sequence: RequestSequence::default(),
            snapshot: None,
            loading: false,
            error: None,
            currency: currency.into(),
        }
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.loading = true;
        self.sequence.issue()
    }

    pub fn finish_load(&mut self, ticket: RequestTicket, result: Result<DashboardSnapshot, ApiError>) -> LoadOutcome {
        if !self.sequence.accept(ticket) {
            return LoadOutcome::Stale;
        }
        let latest = self.sequence.is_latest(ticket);
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                if latest {
                    self.error = None;
                }
            }
            Err(e) if latest => self.error = Some(e.to_string()),
            Err(_) => {}
        }
        if latest {
            self.loading = false;
        }
        LoadOutcome::Applied
    }

    /// Vehicle positions plus the coordinates of the latest alerts
    pub fn markers(&self) -> Vec<MapMarker> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        let vehicles = snapshot.vehicles.iter().filter_map(|v| {
            v.location.map(|point| MapMarker {
                point,
                color: if v.is_overloaded() { Color::Red } else { Color::Green },
                label: Some(v.plate.clone()),
            })
        });
        let alerts = snapshot.latest_alerts.iter().filter_map(|a| {
            a.coordinates.map(|point| MapMarker {
                point,
                color: severity_color(a.severity),
                label: None,
            })
        });
        vehicles.chain(alerts).collect()
    }

    fn render_cards(&self, f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let cards = [
            ("Vehicles", snapshot.total_vehicles.to_string(), Color::Cyan),
            ("Active", snapshot.active_vehicles.to_string(), Color::Green),
            ("Overloaded", snapshot.overloaded_vehicles.to_string(), Color::Red),
            ("Critical alerts", snapshot.critical_alerts.to_string(), Color::Red),
            (
                "Unpaid penalties",
                format!(
                    "{} • {}",
                    snapshot.unpaid_penalties,
                    format_currency(snapshot.unpaid_amount, &self.currency)
                ),
                Color::Yellow,
            ),
        ];

        for (rect, (label, value, color)) in LayoutManager::card_row(area, cards.len()).into_iter().zip(cards) {
            let card = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(format!(" {} ", label))
                    .style(Style::default().fg(Color::Gray)),
            );
            f.render_widget(card, rect);
        }
    }

    fn render_latest_alerts(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
        let items: Vec<ListItem> = snapshot
            .latest_alerts
            .iter()
            .map(|alert| {
                let mut marker = Style::default().fg(severity_color(alert.severity));
                if !alert.notified {
                    marker = marker.add_modifier(Modifier::BOLD);
                }
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("● {} ", alert.severity.label()), marker),
                        Span::styled(alert.vehicle_plate.clone(), Style::default().fg(Color::White)),
                        Span::styled(
                            format!("  {}", format_overload(alert.overload)),
                            Style::default().fg(Color::Gray),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", alert.location),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Latest alerts ")
            .style(Style::default().fg(Color::Gray));

        if items.is_empty() {
            let empty = Paragraph::new("No alerts")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty, area);
        } else {
            f.render_widget(List::new(items).block(block), area);
        }
    }
}

impl Component for DashboardComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('a') => Action::SwitchView(View::Alerts),
            KeyCode::Char('v') => Action::SwitchView(View::Vehicles),
            KeyCode::Char('p') => Action::SwitchView(View::Penalties),
            _ => Action::None,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let Some(snapshot) = self.snapshot.clone() else {
            let message = if self.loading {
                "Loading dashboard…"
            } else {
                "Dashboard unavailable • press r to retry"
            };
            let placeholder = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(placeholder, rect);
            return;
        };

        let [cards_area, body_area] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(rect);
        self.render_cards(f, cards_area, &snapshot);

        let [alerts_area, map_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(body_area);
        Self::render_latest_alerts(f, alerts_area, &snapshot);
        render_map(f, map_area, "Fleet map", &self.markers());
    }
}
