use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

/// Creates a styled main dialog block
pub fn create_dialog_block<'a>(title: &'a str, theme_color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .title_style(Style::default().fg(theme_color).add_modifier(Modifier::BOLD))
        .style(Style::default().fg(theme_color))
}

fn field_block(field_title: &str, focused: bool) -> Block<'static> {
    let (title_color, border_color) = if focused {
        (Color::Cyan, Color::Cyan)
    } else {
        (Color::White, Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", field_title))
        .title_style(Style::default().fg(title_color))
        .style(Style::default().fg(border_color))
}

/// Text input; the focused field shows a block cursor, secrets are masked
pub fn create_input_paragraph(value: &str, field_title: &str, focused: bool, masked: bool) -> Paragraph<'static> {
    let mut display = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if focused {
        display.push('█');
    }

    Paragraph::new(display)
        .block(field_block(field_title, focused))
        .style(Style::default().fg(Color::White))
}

/// Choice field, cycled with the arrow keys
pub fn create_choice_paragraph(value: &str, field_title: &str, focused: bool) -> Paragraph<'static> {
    let display = if focused {
        format!("‹ {} ›", value)
    } else {
        value.to_string()
    };
    Paragraph::new(display)
        .block(field_block(field_title, focused))
        .style(Style::default().fg(Color::White))
}

/// Inline validation message under a form
pub fn create_error_paragraph(message: Option<&str>) -> Paragraph<'static> {
    match message {
        Some(message) => Paragraph::new(format!("⚠ {}", message))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center),
        None => Paragraph::new(""),
    }
}

/// Instruction shortcut definition: (key, color, description)
pub type InstructionShortcut = (&'static str, Color, &'static str);

/// Creates a paragraph with color-coded instruction shortcuts
pub fn create_instructions_paragraph<'a>(instructions: &[InstructionShortcut]) -> Paragraph<'a> {
    let mut instruction_text = Vec::new();
    for (key, color, desc) in instructions {
        instruction_text.push(Span::styled(
            *key,
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ));
        instruction_text.push(Span::styled(*desc, Style::default().fg(Color::Gray)));
    }

    Paragraph::new(Line::from(instruction_text)).alignment(Alignment::Center)
}

/// Common instruction shortcuts used across dialogs
pub mod shortcuts {
    use super::*;

    pub const SEPARATOR: InstructionShortcut = (" • ", Color::Gray, "");
    pub const ESC_CANCEL: InstructionShortcut = ("Esc", Color::Red, " Cancel");
    pub const ESC_QUIT: InstructionShortcut = ("Esc", Color::Red, " Quit");
    pub const ENTER_SUBMIT: InstructionShortcut = ("Enter", Color::Green, " Submit");
    pub const ENTER_CONFIRM: InstructionShortcut = ("Enter", Color::Green, " Confirm");
    pub const TAB_NEXT: InstructionShortcut = ("Tab", Color::Cyan, " Next field");
    pub const ARROWS_CHOOSE: InstructionShortcut = ("←/→", Color::Cyan, " Choose");
    pub const CTRL_N_REGISTER: InstructionShortcut = ("Ctrl+N", Color::Yellow, " Register");
}
