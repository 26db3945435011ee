//! Screen layout for the delve TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the main screen
pub struct AppLayout {
    pub title_area: Rect,
    pub narrative_area: Rect,
    pub sidebar_area: Rect,
    pub status_bar: Rect,
    pub input_area: Rect,
}

impl AppLayout {
    /// Title on top, narrative and sidebar in a 70/30 split, then the
    /// status line and input box.
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(rows[1]);

        Self {
            title_area: rows[0],
            narrative_area: body[0],
            sidebar_area: body[1],
            status_bar: rows[2],
            input_area: rows[3],
        }
    }
}

/// A rectangle of at most `width` x `height`, centered in `area`.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
