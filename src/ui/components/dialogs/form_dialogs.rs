//! Field layouts of the input dialogs and their conversion into actions.

use super::form::{Form, FormField};
use crate::list::filters::parse_bound;
use crate::list::{AlertFilter, PenaltyFilter, VehicleFilter};
use crate::models::penalty::{validate_reference, RateUpdate};
use crate::models::{
    AlertSeverity, Credentials, PenaltyStatus, Registration, ValidationError, VehicleDraft, VehicleStatus,
};
use crate::ui::core::{Action, DialogType};
use crate::utils::datetime::{format_ymd, parse_date, DateRange};

const ANY: &str = "Any";
const PAID_OPTIONS: [&str; 3] = [ANY, "Unpaid", "Paid"];

/// "Any" followed by every option; index 0 means no constraint
fn with_any<T: ToString>(options: &[T]) -> Vec<String> {
    std::iter::once(ANY.to_string())
        .chain(options.iter().map(ToString::to_string))
        .collect()
}

fn optional_index<T: PartialEq>(all: &[T], value: Option<&T>) -> usize {
    value
        .and_then(|v| all.iter().position(|x| x == v))
        .map_or(0, |i| i + 1)
}

fn pick<T: Copy>(all: &[T], index: usize) -> Option<T> {
    index.checked_sub(1).and_then(|i| all.get(i).copied())
}

/// Dialog title
pub fn title(dialog: &DialogType) -> String {
    match dialog {
        DialogType::Login => " 🔐 Login ".to_string(),
        DialogType::Register => " 📝 Register ".to_string(),
        DialogType::VehicleForm { id: None, .. } => " 🚚 Add vehicle ".to_string(),
        DialogType::VehicleForm { id: Some(_), .. } => " ✏️ Edit vehicle ".to_string(),
        DialogType::MarkPenaltyPaid { id } => format!(" 💳 Mark penalty #{} as paid ", id),
        DialogType::PenaltyStatus { id, .. } => format!(" Penalty #{} status ", id),
        DialogType::PenaltyRate { current } => format!(" Penalty rate (current: {}) ", current.display_amount()),
        DialogType::VehicleFilter(_) => " 🔎 Filter vehicles ".to_string(),
        DialogType::AlertFilter(_) => " 🔎 Filter alerts ".to_string(),
        DialogType::PenaltyFilter(_) => " 🔎 Filter penalties ".to_string(),
        DialogType::ReportRange(_) => " 📅 Report date range ".to_string(),
        _ => String::new(),
    }
}

/// Fields of an input dialog, pre-filled from its current value; `None` for non-form dialogs
pub fn build(dialog: &DialogType) -> Option<Form> {
    let fields = match dialog {
        DialogType::Login => vec![
            FormField::text("username", "Username", ""),
            FormField::secret("password", "Password"),
        ],
        DialogType::Register => vec![
            FormField::text("full_name", "Full name", ""),
            FormField::text("email", "Email", ""),
            FormField::text("phone", "Phone", ""),
            FormField::secret("password", "Password"),
            FormField::secret("confirm_password", "Confirm password"),
        ],
        DialogType::VehicleForm { draft, .. } => vec![
            FormField::text("plate", "Plate number", draft.plate.clone()),
            FormField::text("name", "Name", draft.name.clone()),
            FormField::text("kind", "Type", draft.kind.clone()),
            FormField::text("driver", "Driver", draft.driver.clone()),
            FormField::text("owner", "Owner", draft.owner.clone()),
            FormField::text("max_allowed_weight", "Max weight (kg)", draft.max_allowed_weight.clone()),
            FormField::choice(
                "status",
                "Status",
                &VehicleStatus::ALL,
                VehicleStatus::ALL.iter().position(|s| *s == draft.status).unwrap_or(0),
            ),
        ],
        DialogType::MarkPenaltyPaid { .. } => vec![FormField::text("reference_number", "Reference number", "")],
        DialogType::PenaltyStatus { current, .. } => vec![FormField::choice(
            "status",
            "Status",
            &PenaltyStatus::ALL,
            PenaltyStatus::ALL.iter().position(|s| s == current).unwrap_or(0),
        )],
        DialogType::PenaltyRate { current } => vec![
            FormField::text("rate", "Amount per overload", ""),
            FormField::text("notes", "Notes", current.notes.clone()),
        ],
        DialogType::VehicleFilter(filter) => vec![
            FormField::text("search", "Plate, type or driver", filter.search.clone()),
            FormField::choice(
                "status",
                "Status",
                &with_any(&VehicleStatus::ALL),
                optional_index(&VehicleStatus::ALL, filter.status.as_ref()),
            ),
        ],
        DialogType::AlertFilter(filter) => vec![
            FormField::choice(
                "severity",
                "Severity",
                &with_any(&AlertSeverity::ALL),
                optional_index(&AlertSeverity::ALL, filter.severity.as_ref()),
            ),
            FormField::text("location", "Location", filter.location.clone()),
            FormField::text("min_overload", "Minimum overload (kg)", bound_text(filter.min_overload)),
            FormField::text("vehicle", "Vehicle", filter.vehicle.clone()),
        ],
        DialogType::PenaltyFilter(filter) => vec![
            FormField::text(
                "start_date",
                "From (YYYY-MM-DD)",
                filter.range.map(|r| format_ymd(r.start)).unwrap_or_default(),
            ),
            FormField::text(
                "end_date",
                "To (YYYY-MM-DD)",
                filter.range.map(|r| format_ymd(r.end)).unwrap_or_default(),
            ),
            FormField::text("vehicle", "Vehicle", filter.vehicle.clone()),
            FormField::choice(
                "status",
                "Status",
                &with_any(&PenaltyStatus::ALL),
                optional_index(&PenaltyStatus::ALL, filter.status.as_ref()),
            ),
            FormField::choice(
                "paid",
                "Payment",
                &PAID_OPTIONS,
                match filter.paid {
                    None => 0,
                    Some(false) => 1,
                    Some(true) => 2,
                },
            ),
            FormField::text("min_overload", "Min overload (kg)", bound_text(filter.min_overload)),
            FormField::text("max_overload", "Max overload (kg)", bound_text(filter.max_overload)),
        ],
        DialogType::ReportRange(range) => vec![
            FormField::text("start_date", "From (YYYY-MM-DD)", format_ymd(range.start)),
            FormField::text("end_date", "To (YYYY-MM-DD)", format_ymd(range.end)),
        ],
        _ => return None,
    };
    Some(Form::new(fields))
}

fn bound_text(bound: Option<f64>) -> String {
    bound.map(|v| v.to_string()).unwrap_or_default()
}

fn date_field(form: &Form, key: &str) -> Result<Option<chrono::NaiveDate>, ValidationError> {
    let value = form.value(key);
    if value.is_empty() {
        return Ok(None);
    }
    parse_date(value)
        .map(Some)
        .map_err(|_| ValidationError::new(key, "Dates use the YYYY-MM-DD format"))
}

/// Both dates or neither
fn date_range(form: &Form) -> Result<Option<DateRange>, ValidationError> {
    match (date_field(form, "start_date")?, date_field(form, "end_date")?) {
        (Some(start), Some(end)) => Ok(Some(DateRange::new(start, end))),
        (None, None) => Ok(None),
        (None, Some(_)) => Err(ValidationError::new("start_date", "Start date is required")),
        (Some(_), None) => Err(ValidationError::new("end_date", "End date is required")),
    }
}

/// Turn a submitted form into its action, or the first validation error
pub fn submit(dialog: &DialogType, form: &Form) -> Result<Action, ValidationError> {
    let action = match dialog {
        DialogType::Login => {
            let credentials = Credentials::new(form.value("username"), form.raw_value("password"));
            credentials.validate()?;
            Action::Login(credentials)
        }
        DialogType::Register => {
            let registration = Registration {
                full_name: form.value("full_name").to_string(),
                email: form.value("email").to_string(),
                phone: form.value("phone").to_string(),
                password: form.raw_value("password").to_string(),
                confirm_password: form.raw_value("confirm_password").to_string(),
            };
            registration.validate()?;
            Action::Register(registration)
        }
        DialogType::VehicleForm { id, .. } => {
            let draft = VehicleDraft {
                plate: form.value("plate").to_string(),
                name: form.value("name").to_string(),
                kind: form.value("kind").to_string(),
                driver: form.value("driver").to_string(),
                owner: form.value("owner").to_string(),
                max_allowed_weight: form.value("max_allowed_weight").to_string(),
                status: VehicleStatus::ALL
                    .get(form.choice("status"))
                    .copied()
                    .unwrap_or_default(),
            };
            draft.validate()?;
            Action::SaveVehicle { id: *id, draft }
        }
        DialogType::MarkPenaltyPaid { id } => Action::MarkPenaltyPaid {
            id: *id,
            reference: validate_reference(form.value("reference_number"))?,
        },
        DialogType::PenaltyStatus { id, current } => {
            let status = PenaltyStatus::ALL
                .get(form.choice("status"))
                .copied()
                .unwrap_or_default();
            if status == *current {
                Action::HideDialog
            } else {
                Action::UpdatePenaltyStatus { id: *id, status }
            }
        }
        DialogType::PenaltyRate { .. } => {
            RateUpdate::parse(form.value("rate"), form.value("notes"))?;
            Action::UpdatePenaltyRate {
                amount: form.value("rate").to_string(),
                notes: form.value("notes").to_string(),
            }
        }
        DialogType::VehicleFilter(_) => Action::ApplyVehicleFilter(VehicleFilter {
            search: form.value("search").to_string(),
            status: pick(&VehicleStatus::ALL, form.choice("status")),
        }),
        DialogType::AlertFilter(_) => Action::ApplyAlertFilter(AlertFilter {
            severity: pick(&AlertSeverity::ALL, form.choice("severity")),
            location: form.value("location").to_string(),
            min_overload: parse_bound("min_overload", form.value("min_overload"))?,
            vehicle: form.value("vehicle").to_string(),
        }),
        DialogType::PenaltyFilter(_) => {
            let min_overload = parse_bound("min_overload", form.value("min_overload"))?;
            let max_overload = parse_bound("max_overload", form.value("max_overload"))?;
            if let (Some(min), Some(max)) = (min_overload, max_overload) {
                if min > max {
                    return Err(ValidationError::new(
                        "max_overload",
                        "Maximum overload must not be below the minimum",
                    ));
                }
            }
            Action::ApplyPenaltyFilter(PenaltyFilter {
                range: date_range(form)?,
                vehicle: form.value("vehicle").to_string(),
                status: pick(&PenaltyStatus::ALL, form.choice("status")),
                paid: match form.choice("paid") {
                    1 => Some(false),
                    2 => Some(true),
                    _ => None,
                },
                min_overload,
                max_overload,
            })
        }
        DialogType::ReportRange(_) => match date_range(form)? {
            Some(range) => Action::SetReportRange(range),
            None => return Err(ValidationError::new("start_date", "Start and end dates are required")),
        },
        _ => Action::HideDialog,
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn tab(form: &mut Form) {
        form.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
    }

    #[test]
    fn unchanged_penalty_status_sends_nothing() {
        let dialog = DialogType::PenaltyStatus {
            id: 4,
            current: PenaltyStatus::Unpaid,
        };
        let mut form = build(&dialog).unwrap();
        assert!(matches!(submit(&dialog, &form).unwrap(), Action::HideDialog));

        form.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        match submit(&dialog, &form).unwrap() {
            Action::UpdatePenaltyStatus { id, status } => {
                assert_eq!(id, 4);
                assert_eq!(status, PenaltyStatus::ALL[1]);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn registration_with_short_password_is_rejected() {
        let dialog = DialogType::Register;
        let mut form = build(&dialog).unwrap();
        type_text(&mut form, "Jane Doe");
        tab(&mut form);
        type_text(&mut form, "jane@example.com");
        tab(&mut form);
        type_text(&mut form, "0712000000");
        tab(&mut form);
        type_text(&mut form, "short");
        tab(&mut form);
        type_text(&mut form, "short");

        let error = submit(&dialog, &form).unwrap_err();
        assert_eq!(error.field, "password");
    }

    #[test]
    fn vehicle_form_round_trips_the_draft() {
        let draft = VehicleDraft {
            plate: "T123ABC".to_string(),
            owner: "Acme".to_string(),
            max_allowed_weight: "10000".to_string(),
            status: VehicleStatus::Maintenance,
            ..Default::default()
        };
        let dialog = DialogType::VehicleForm {
            id: Some(4),
            draft: draft.clone(),
        };
        let form = build(&dialog).unwrap();

        match submit(&dialog, &form).unwrap() {
            Action::SaveVehicle { id, draft: submitted } => {
                assert_eq!(id, Some(4));
                assert_eq!(submitted, draft);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn penalty_filter_needs_both_dates() {
        let dialog = DialogType::PenaltyFilter(PenaltyFilter::default());
        let mut form = build(&dialog).unwrap();
        type_text(&mut form, "2024-01-01");

        let error = submit(&dialog, &form).unwrap_err();
        assert_eq!(error.field, "end_date");
    }

    #[test]
    fn penalty_filter_keeps_any_as_unconstrained() {
        let filter = PenaltyFilter {
            paid: Some(false),
            ..Default::default()
        };
        let dialog = DialogType::PenaltyFilter(filter.clone());
        let form = build(&dialog).unwrap();

        match submit(&dialog, &form).unwrap() {
            Action::ApplyPenaltyFilter(submitted) => assert_eq!(submitted, filter),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_overload_bound_is_rejected() {
        let dialog = DialogType::AlertFilter(AlertFilter::default());
        let mut form = build(&dialog).unwrap();
        tab(&mut form);
        tab(&mut form);
        type_text(&mut form, "lots");

        let error = submit(&dialog, &form).unwrap_err();
        assert_eq!(error.field, "min_overload");
    }
}
