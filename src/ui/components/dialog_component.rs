//! Modal dialog component.
//!
//! Hosts one dialog at a time on top of the active view:
//!
//! # Dialog Types
//! - **Session** - login and registration forms
//! - **Records** - vehicle form, delete confirmation, penalty payment, status and rate
//! - **Filters** - vehicle, alert and penalty filters, report date range
//! - **System** - info, error, help and logs overlays
//!
//! Input dialogs share one [`Form`] model; field layouts and the conversion of a
//! submitted form into an [`Action`] live in `dialogs::form_dialogs`. Local
//! validation failures stay inline and keep the dialog open.

use crate::logger::Logger;
use crate::models::ValidationError;
use crate::ui::components::dialogs::common::{
    create_choice_paragraph, create_dialog_block, create_error_paragraph, create_input_paragraph,
    create_instructions_paragraph, shortcuts, InstructionShortcut,
};
use crate::ui::components::dialogs::{form_dialogs, system_dialogs, Form, FormInput, ScrollState};
use crate::ui::core::{Action, Component, DialogType};
use crate::ui::layout::LayoutManager;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::Color,
    widgets::Clear,
    Frame,
};

/// Rows per form field, including its border
const FIELD_HEIGHT: u16 = 3;

pub struct DialogComponent {
    pub dialog_type: Option<DialogType>,
    form: Option<Form>,
    scroll: ScrollState,
    logger: Logger,
}

impl DialogComponent {
    pub fn new(logger: Logger) -> Self {
        Self {
            dialog_type: None,
            form: None,
            scroll: ScrollState::default(),
            logger,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.dialog_type.is_some()
    }

    /// The login or registration form is showing
    pub fn is_auth(&self) -> bool {
        self.dialog_type.as_ref().map_or(false, DialogType::is_auth)
    }

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn open(&mut self, dialog: DialogType) {
        self.form = form_dialogs::build(&dialog);
        self.scroll.reset();
        self.dialog_type = Some(dialog);
    }

    pub fn close(&mut self) {
        self.dialog_type = None;
        self.form = None;
    }

    /// Show an error inline on the open form
    pub fn reject(&mut self, error: ValidationError) {
        if let Some(form) = self.form.as_mut() {
            form.reject(error);
        }
    }

    fn submit(&mut self) -> Action {
        let (Some(dialog), Some(form)) = (self.dialog_type.clone(), self.form.as_mut()) else {
            return Action::None;
        };
        match form_dialogs::submit(&dialog, form) {
            Ok(action) => {
                // Session forms stay up until the server answers
                if !dialog.is_auth() {
                    self.close();
                }
                action
            }
            Err(error) => {
                self.logger.log(format!("Dialog: validation failed: {}", error));
                form.reject(error);
                Action::None
            }
        }
    }

    fn cancel(&self) -> Action {
        match self.dialog_type {
            Some(DialogType::Login) => Action::Quit,
            Some(DialogType::Register) => Action::ShowDialog(DialogType::Login),
            _ => Action::HideDialog,
        }
    }

    fn instructions(dialog: &DialogType) -> Vec<InstructionShortcut> {
        let mut instructions = vec![shortcuts::ENTER_SUBMIT, shortcuts::SEPARATOR, shortcuts::TAB_NEXT];
        if matches!(
            dialog,
            DialogType::VehicleForm { .. }
                | DialogType::PenaltyStatus { .. }
                | DialogType::VehicleFilter(_)
                | DialogType::AlertFilter(_)
                | DialogType::PenaltyFilter(_)
        ) {
            instructions.extend([shortcuts::SEPARATOR, shortcuts::ARROWS_CHOOSE]);
        }
        match dialog {
            DialogType::Login => instructions.extend([
                shortcuts::SEPARATOR,
                shortcuts::CTRL_N_REGISTER,
                shortcuts::SEPARATOR,
                shortcuts::ESC_QUIT,
            ]),
            _ => instructions.extend([shortcuts::SEPARATOR, shortcuts::ESC_CANCEL]),
        }
        instructions
    }

    fn render_form(f: &mut Frame, area: Rect, dialog: &DialogType, form: &Form) {
        let field_count = form.fields.len() as u16;
        // fields, error line, instructions and the border
        let height = field_count * FIELD_HEIGHT + 4;
        let dialog_area = LayoutManager::centered_rect_lines(60, height, area);
        f.render_widget(Clear, dialog_area);

        let title = form_dialogs::title(dialog);
        f.render_widget(create_dialog_block(&title, Color::Cyan), dialog_area);

        let inner = dialog_area.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });
        let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(FIELD_HEIGHT)).collect();
        constraints.extend([Constraint::Length(1), Constraint::Length(1)]);
        let rows = Layout::vertical(constraints).split(inner);

        for (i, field) in form.fields.iter().enumerate() {
            let focused = i == form.focus();
            let widget = if field.is_choice() {
                create_choice_paragraph(field.display_value(), field.label, focused)
            } else {
                create_input_paragraph(field.display_value(), field.label, focused, field.is_secret())
            };
            f.render_widget(widget, rows[i]);
        }

        let n = form.fields.len();
        f.render_widget(create_error_paragraph(form.error()), rows[n]);
        f.render_widget(create_instructions_paragraph(&Self::instructions(dialog)), rows[n + 1]);
    }
}

impl Component for DialogComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let Some(dialog) = &self.dialog_type else {
            return Action::None;
        };

        match dialog {
            DialogType::Info(_) | DialogType::Error(_) => {
                if self.scroll.handle_key(key.code) {
                    Action::None
                } else {
                    Action::HideDialog
                }
            }
            DialogType::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') => Action::HideDialog,
                code => {
                    self.scroll.handle_key(code);
                    Action::None
                }
            },
            DialogType::Logs => match key.code {
                KeyCode::Esc | KeyCode::Char('G') | KeyCode::Char('q') => Action::HideDialog,
                code => {
                    self.scroll.handle_key(code);
                    Action::None
                }
            },
            DialogType::DeleteVehicle { id, .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    let id = *id;
                    self.close();
                    Action::DeleteVehicle(id)
                }
                KeyCode::Esc | KeyCode::Char('n') => Action::HideDialog,
                _ => Action::None,
            },
            DialogType::Login
                if key.code == KeyCode::Char('n') && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Action::ShowDialog(DialogType::Register)
            }
            _ => {
                let input = match self.form.as_mut() {
                    Some(form) => form.handle_key(key),
                    None => FormInput::Cancel,
                };
                match input {
                    FormInput::Submit => self.submit(),
                    FormInput::Cancel => self.cancel(),
                    FormInput::Consumed => Action::None,
                }
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::ShowDialog(dialog) => {
                self.logger.log(format!("Dialog: showing {:?}", dialog));
                self.open(dialog);
                Action::None
            }
            // The login form cannot be dismissed while signed out
            Action::HideDialog if self.is_auth() => Action::None,
            Action::HideDialog => {
                self.close();
                Action::None
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let Some(dialog) = self.dialog_type.clone() else {
            return;
        };
        match &dialog {
            DialogType::Info(message) => {
                system_dialogs::render_message_dialog(f, rect, " ℹ️ Info ", Color::Blue, message, &mut self.scroll);
            }
            DialogType::Error(message) => {
                system_dialogs::render_message_dialog(f, rect, " ⚠️ Error ", Color::Red, message, &mut self.scroll);
            }
            DialogType::Help => system_dialogs::render_help_dialog(f, rect, &mut self.scroll),
            DialogType::Logs => {
                let logs = self.logger.get_logs();
                system_dialogs::render_logs_dialog(f, rect, &logs, &mut self.scroll);
            }
            DialogType::DeleteVehicle { plate, .. } => {
                let message = format!("Delete vehicle {}? This cannot be undone.", plate);
                system_dialogs::render_confirm_dialog(f, rect, " ⚠️ Confirm Delete ", &message);
            }
            _ => {
                if let Some(form) = &self.form {
                    Self::render_form(f, rect, &dialog, form);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PenaltyRate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(dialog: &mut DialogComponent, text: &str) {
        for c in text.chars() {
            dialog.handle_key_events(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn invalid_submission_keeps_the_dialog_open() {
        let mut dialog = DialogComponent::new(Logger::new());
        dialog.update(Action::ShowDialog(DialogType::PenaltyRate {
            current: PenaltyRate::default(),
        }));
        type_text(&mut dialog, "abc");

        let action = dialog.handle_key_events(key(KeyCode::Enter));
        assert!(matches!(action, Action::None));
        assert!(dialog.is_visible());
        assert!(dialog.form().and_then(Form::error).is_some());
    }

    #[test]
    fn valid_submission_closes_the_dialog() {
        let mut dialog = DialogComponent::new(Logger::new());
        dialog.update(Action::ShowDialog(DialogType::MarkPenaltyPaid { id: 9 }));
        type_text(&mut dialog, "RCPT-1");

        match dialog.handle_key_events(key(KeyCode::Enter)) {
            Action::MarkPenaltyPaid { id, reference } => {
                assert_eq!(id, 9);
                assert_eq!(reference, "RCPT-1");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(!dialog.is_visible());
    }

    #[test]
    fn login_stays_open_and_escape_quits() {
        let mut dialog = DialogComponent::new(Logger::new());
        dialog.update(Action::ShowDialog(DialogType::Login));

        dialog.update(Action::HideDialog);
        assert!(dialog.is_visible());

        type_text(&mut dialog, "admin");
        dialog.handle_key_events(key(KeyCode::Tab));
        type_text(&mut dialog, "secret");
        assert!(matches!(dialog.handle_key_events(key(KeyCode::Enter)), Action::Login(_)));
        assert!(dialog.is_auth());

        assert!(matches!(dialog.handle_key_events(key(KeyCode::Esc)), Action::Quit));
    }

    #[test]
    fn ctrl_n_switches_to_registration() {
        let mut dialog = DialogComponent::new(Logger::new());
        dialog.update(Action::ShowDialog(DialogType::Login));
        let action = dialog.handle_key_events(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert!(matches!(action, Action::ShowDialog(DialogType::Register)));
    }
}
