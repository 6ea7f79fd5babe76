//! Dialog building blocks: the shared form model, field layouts and overlay renderers

pub mod common;
pub mod form;
pub mod form_dialogs;
pub mod scroll_behavior;
pub mod system_dialogs;

pub use form::{FieldKind, Form, FormField, FormInput};
pub use scroll_behavior::ScrollState;
