//! Layout management and calculations

use crate::constants::{MAIN_AREA_MIN_WIDTH, SIDEBAR_MAX_WIDTH, SIDEBAR_MIN_WIDTH};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Manages layout calculations and constraints for the UI
pub struct LayoutManager;

impl LayoutManager {
    /// Split the screen into the working area and a one-line status bar below it
    #[must_use]
    pub fn main_layout(area: Rect) -> (Rect, Rect) {
        let top_height = area.height.saturating_sub(1);
        let top_area = Rect::new(area.x, area.y, area.width, top_height);
        let status_area = Rect::new(area.x, area.y + top_height, area.width, area.height.min(1));
        (top_area, status_area)
    }

    /// Sidebar width clamped so the main area keeps at least `MAIN_AREA_MIN_WIDTH` columns
    #[must_use]
    pub fn sidebar_width(configured: u16, screen_width: u16) -> u16 {
        let configured = configured.clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH);
        let room = screen_width.saturating_sub(MAIN_AREA_MIN_WIDTH);
        configured.min(room)
    }

    /// Sidebar on the left, view on the right
    #[must_use]
    pub fn top_pane_layout(area: Rect, sidebar_width: u16) -> (Rect, Rect) {
        let sidebar_width = Self::sidebar_width(sidebar_width, area.width);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// Optional one-line error banner above the view body
    #[must_use]
    pub fn banner_layout(area: Rect, show_banner: bool) -> (Option<Rect>, Rect) {
        if !show_banner || area.height < 4 {
            return (None, area);
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        (Some(chunks[0]), chunks[1])
    }

    /// Calculate a centered rectangle within the given area
    #[must_use]
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Calculate a centered rectangle with percentage width and fixed line height
    #[must_use]
    pub fn centered_rect_lines(percent_x: u16, height_lines: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height_lines.min(r.height)),
                Constraint::Min(0),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// `count` equal columns, used for the dashboard cards
    #[must_use]
    pub fn card_row(area: Rect, count: usize) -> Vec<Rect> {
        let count = count.max(1) as u32;
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
            .split(area)
            .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_the_last_line() {
        let (top, status) = LayoutManager::main_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(top.height, 29);
        assert_eq!(status, Rect::new(0, 29, 100, 1));
    }

    #[test]
    fn sidebar_leaves_room_for_the_main_area() {
        assert_eq!(LayoutManager::sidebar_width(24, 200), 24);
        assert_eq!(LayoutManager::sidebar_width(100, 200), SIDEBAR_MAX_WIDTH);
        assert_eq!(LayoutManager::sidebar_width(24, 50), 50 - MAIN_AREA_MIN_WIDTH);
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = LayoutManager::centered_rect_lines(60, 10, area);
        assert_eq!(popup.height, 10);
        assert!(popup.x >= 20 && popup.right() <= 80);
    }
}
