//! Generic multi-field form used by every input dialog.

use crate::models::ValidationError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    /// Masked while typing
    Secret,
    Choice { options: Vec<String>, selected: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Matches the field name carried by validation errors
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl FormField {
    pub fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
            kind: FieldKind::Text,
        }
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            kind: FieldKind::Secret,
        }
    }

    pub fn choice<S: ToString>(key: &'static str, label: &'static str, options: &[S], selected: usize) -> Self {
        let options: Vec<String> = options.iter().map(ToString::to_string).collect();
        let selected = selected.min(options.len().saturating_sub(1));
        Self {
            key,
            label,
            value: String::new(),
            kind: FieldKind::Choice { options, selected },
        }
    }

    /// Text shown in the field
    pub fn display_value(&self) -> &str {
        match &self.kind {
            FieldKind::Choice { options, selected } => options.get(*selected).map(String::as_str).unwrap_or(""),
            _ => &self.value,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self.kind, FieldKind::Secret)
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice { .. })
    }

    fn cycle(&mut self, forward: bool) {
        if let FieldKind::Choice { options, selected } = &mut self.kind {
            let len = options.len().max(1);
            *selected = if forward {
                (*selected + 1) % len
            } else {
                (*selected + len - 1) % len
            };
        }
    }
}

/// Result of feeding a key to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Submit,
    Cancel,
    Consumed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub fields: Vec<FormField>,
    focus: usize,
    error: Option<String>,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Show a validation error inline and move focus to the offending field
    pub fn reject(&mut self, error: ValidationError) {
        if let Some(index) = self.fields.iter().position(|f| f.key == error.field) {
            self.focus = index;
        }
        self.error = Some(error.message);
    }

    /// Trimmed value of a text field, empty when the key is unknown
    pub fn value(&self, key: &str) -> &str {
        self.field(key).map(|f| f.value.trim()).unwrap_or("")
    }

    /// Untrimmed value, for passwords
    pub fn raw_value(&self, key: &str) -> &str {
        self.field(key).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// Selected option index of a choice field
    pub fn choice(&self, key: &str) -> usize {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Choice { selected, .. }) => *selected,
            _ => 0,
        }
    }

    fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormInput {
        let on_choice = self.fields.get(self.focus).map_or(false, FormField::is_choice);
        match key.code {
            KeyCode::Esc => return FormInput::Cancel,
            KeyCode::Enter => return FormInput::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
            KeyCode::Left if on_choice => self.cycle_focused(false),
            KeyCode::Right | KeyCode::Char(' ') if on_choice => self.cycle_focused(true),
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus).filter(|f| !f.is_choice()) {
                    field.value.pop();
                    self.error = None;
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) && !on_choice => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.push(c);
                    self.error = None;
                }
            }
            _ => {}
        }
        FormInput::Consumed
    }

    fn cycle_focused(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.cycle(forward);
            self.error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn form() -> Form {
        Form::new(vec![
            FormField::text("plate", "Plate", ""),
            FormField::secret("password", "Password"),
            FormField::choice("status", "Status", &["active", "inactive"], 0),
        ])
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = form();
        form.handle_key(key(KeyCode::Char('T')));
        form.handle_key(key(KeyCode::Char('1')));
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char('x')));

        assert_eq!(form.value("plate"), "T1");
        assert_eq!(form.raw_value("password"), "x");
    }

    #[test]
    fn choice_fields_cycle_and_wrap() {
        let mut form = form();
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), 2);

        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.choice("status"), 1);
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.choice("status"), 0);
        form.handle_key(key(KeyCode::Char('z')));
        assert_eq!(form.fields[2].display_value(), "active");
    }

    #[test]
    fn rejection_focuses_the_offending_field() {
        let mut form = form();
        form.reject(ValidationError::new("password", "Password is required"));
        assert_eq!(form.focus(), 1);
        assert_eq!(form.error(), Some("Password is required"));

        form.handle_key(key(KeyCode::Char('a')));
        assert_eq!(form.error(), None);
    }
}
