//! Sidebar navigation between the dashboard views.

use crate::ui::core::{Action, Component, View};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Navigation sidebar listing every [`View`].
///
/// Tab / Shift+Tab cycle through the views, `1`-`5` jump straight to one.
pub struct SidebarComponent {
    pub selection: View,
    list_state: ListState,
}

impl Default for SidebarComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarComponent {
    pub fn new() -> Self {
        Self {
            selection: View::default(),
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    pub fn select(&mut self, view: View) {
        self.selection = view;
        self.list_state.select(Some(view.index()));
    }
}

impl Component for SidebarComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab => Action::NextView,
            KeyCode::BackTab => Action::PreviousView,
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                Action::SwitchView(View::ALL[index])
            }
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        if let Action::SwitchView(view) = action {
            self.select(view);
        }
        action
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let items: Vec<ListItem> = View::ALL
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let style = if *view == self.selection {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{} {}", view.icon(), view.title()), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" Loadwatch ")
                    .style(Style::default().fg(Color::Gray)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));

        f.render_stateful_widget(list, rect, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn number_keys_jump_to_views() {
        let mut sidebar = SidebarComponent::new();
        let action = sidebar.handle_key_events(KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE));
        assert!(matches!(action, Action::SwitchView(View::Alerts)));
    }

    #[test]
    fn switch_view_moves_the_selection() {
        let mut sidebar = SidebarComponent::new();
        sidebar.update(Action::SwitchView(View::Penalties));
        assert_eq!(sidebar.selection, View::Penalties);
    }
}
