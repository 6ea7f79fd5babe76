//! Vehicle management view: searchable fleet table with create, edit and delete.

use crate::api::ApiError;
use crate::export::ExportFormat;
use crate::list::{ListController, LoadOutcome, PageReset, RequestTicket, VehicleFilter};
use crate::models::{Vehicle, VehicleDraft};
use crate::ui::components::data_table::{navigation_action, DataTable};
use crate::ui::core::{Action, Component, DialogType};
use crate::utils::color::vehicle_status_color;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, style::Color, style::Style, Frame};

pub const HINTS: &str = "a: add • e: edit • d: delete • /: filter • s: status • x: CSV • P: PDF";

pub struct VehiclesComponent {
    pub list: ListController<Vehicle>,
    pub filter: VehicleFilter,
    table: DataTable,
}

impl VehiclesComponent {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListController::new(page_size),
            filter: VehicleFilter::default(),
            table: DataTable::new(),
        }
    }

    pub fn selected(&self) -> Option<&Vehicle> {
        self.table.selected_item(self.list.visible())
    }

    pub fn begin_load(&mut self) -> RequestTicket {
        self.list.begin_load()
    }

    pub fn finish_load(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Vehicle>, ApiError>,
        reset: PageReset,
    ) -> LoadOutcome {
        let outcome = self.list.complete_load(ticket, result, reset);
        self.table.clamp(self.list.visible().len());
        outcome
    }

    pub fn set_filter(&mut self, filter: VehicleFilter) {
        if filter.is_active() {
            self.list.apply_filter(filter.predicate());
        } else {
            self.list.clear_filter();
        }
        self.filter = filter;
        self.table.reset();
    }

    fn row_style(vehicle: &Vehicle) -> Style {
        if vehicle.is_overloaded() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(vehicle_status_color(vehicle.status))
        }
    }
}

impl Component for VehiclesComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('a') => Action::ShowDialog(DialogType::VehicleForm {
                id: None,
                draft: VehicleDraft::default(),
            }),
            KeyCode::Char('e') | KeyCode::Enter => match self.selected() {
                Some(vehicle) => Action::ShowDialog(DialogType::VehicleForm {
                    id: Some(vehicle.id),
                    draft: VehicleDraft::from_vehicle(vehicle),
                }),
                None => Action::None,
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.selected() {
                Some(vehicle) => Action::ShowDialog(DialogType::DeleteVehicle {
                    id: vehicle.id,
                    plate: vehicle.plate.clone(),
                }),
                None => Action::None,
            },
            KeyCode::Char('/') | KeyCode::Char('f') => Action::ShowDialog(DialogType::VehicleFilter(self.filter.clone())),
            KeyCode::Char('s') => {
                let mut filter = self.filter.clone();
                filter.cycle_status();
                Action::ApplyVehicleFilter(filter)
            }
            KeyCode::Char('c') => Action::ClearFilter,
            KeyCode::Char('x') => Action::Export(ExportFormat::Csv),
            KeyCode::Char('P') => Action::Export(ExportFormat::Pdf),
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
            Action::ApplyVehicleFilter(filter) => self.set_filter(filter),
            Action::ClearFilter => self.set_filter(VehicleFilter::default()),
            other => return other,
        }
        Action::None
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let mut title = format!("Vehicles ({})", self.list.all().len());
        if self.filter.is_active() {
            title.push_str(&format!(" • filtered: {}", self.list.filtered().len()));
            if let Some(status) = self.filter.status {
                title.push_str(&format!(" • status: {}", status));
            }
            if !self.filter.search.trim().is_empty() {
                title.push_str(&format!(" • \"{}\"", self.filter.search.trim()));
            }
        }
        let pagination = *self.list.pagination();
        self.table
            .render(f, rect, &title, self.list.visible(), &pagination, Self::row_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleStatus;
    use crossterm::event::KeyModifiers;

    fn vehicle(id: i64, plate: &str, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id,
            plate: plate.to_string(),
            name: "Unknown Vehicle".to_string(),
            kind: "Truck".to_string(),
            driver: "Unknown Driver".to_string(),
            owner: "Unknown Owner".to_string(),
            max_allowed_weight: 10000.0,
            current_weight: 0.0,
            average_weight: None,
            status,
            weight_alert: false,
            last_report_at: None,
            image_url: None,
            location: None,
            alert_count: 0,
        }
    }

    #[test]
    fn status_key_filters_the_list() {
        let mut view = VehiclesComponent::new(10);
        view.list.load(
            vec![
                vehicle(1, "T100", VehicleStatus::Active),
                vehicle(2, "T200", VehicleStatus::Inactive),
            ],
            PageReset::Reset,
        );

        let action = view.handle_key_events(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
        view.update(action);

        assert_eq!(view.filter.status, Some(VehicleStatus::ALL[0]));
        assert!(view.list.filtered().iter().all(|v| v.status == VehicleStatus::ALL[0]));
    }

    #[test]
    fn edit_key_prefills_the_form() {
        let mut view = VehiclesComponent::new(10);
        view.list.load(vec![vehicle(7, "T777", VehicleStatus::Active)], PageReset::Reset);

        match view.handle_key_events(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE)) {
            Action::ShowDialog(DialogType::VehicleForm { id, draft }) => {
                assert_eq!(id, Some(7));
                assert_eq!(draft.plate, "T777");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
