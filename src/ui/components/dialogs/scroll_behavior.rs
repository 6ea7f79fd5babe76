use crossterm::event::KeyCode;
use ratatui::widgets::ScrollbarState;

const PAGE: usize = 10;

/// Scroll position of a long dialog body plus its scrollbar
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrollState {
    offset: usize,
    pub scrollbar: ScrollbarState,
}

impl ScrollState {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.offset = self.offset.saturating_add(1);
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(PAGE);
    }

    pub fn page_down(&mut self) {
        self.offset = self.offset.saturating_add(PAGE);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    /// Clamped on the next render
    pub fn scroll_to_bottom(&mut self) {
        self.offset = usize::MAX;
    }

    /// Keep the offset inside the content and sync the scrollbar; returns the offset
    pub fn clamp(&mut self, total_lines: usize, visible_height: usize) -> usize {
        self.offset = self.offset.min(total_lines.saturating_sub(visible_height));
        self.scrollbar = self
            .scrollbar
            .content_length(total_lines)
            .viewport_content_length(visible_height)
            .position(self.offset);
        self.offset
    }

    /// Apply a scrolling key; `false` when the key is not a scroll key
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Home => self.scroll_to_top(),
            KeyCode::End => self.scroll_to_bottom(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_is_clamped_to_the_last_screen() {
        let mut scroll = ScrollState::default();
        scroll.scroll_to_bottom();
        assert_eq!(scroll.clamp(50, 20), 30);
        assert_eq!(scroll.clamp(10, 20), 0);
    }

    #[test]
    fn non_scroll_keys_are_not_consumed() {
        let mut scroll = ScrollState::default();
        assert!(scroll.handle_key(KeyCode::PageDown));
        assert_eq!(scroll.offset(), PAGE);
        assert!(!scroll.handle_key(KeyCode::Enter));
    }
}
