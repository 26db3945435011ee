//! Narrative display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use crate::ui::theme::GameTheme;

/// What produced a narrative entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A room description; the first line is the room name
    Room,
    Narration,
    PlayerAction,
    System,
    Error,
}

/// A single entry in the narrative display
#[derive(Debug, Clone)]
pub struct NarrativeItem {
    pub content: String,
    pub kind: EntryKind,
}

/// Widget for displaying narrative text
pub struct NarrativeWidget<'a> {
    items: &'a [NarrativeItem],
    scroll: usize,
    theme: &'a GameTheme,
    focused: bool,
}

impl<'a> NarrativeWidget<'a> {
    pub fn new(items: &'a [NarrativeItem], theme: &'a GameTheme) -> Self {
        Self {
            items,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn style_for(&self, kind: EntryKind) -> Style {
        match kind {
            EntryKind::Room | EntryKind::Narration => self.theme.narration_style(),
            EntryKind::PlayerAction => self.theme.player_style(),
            EntryKind::System => self.theme.system_style(),
            EntryKind::Error => self.theme.error_style(),
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for item in self.items {
            let style = self.style_for(item.kind);
            let prefix = match item.kind {
                EntryKind::PlayerAction => "> ",
                _ => "",
            };

            for (i, line) in item.content.lines().enumerate() {
                let line_style = if i == 0 && item.kind == EntryKind::Room {
                    self.theme.room_title_style()
                } else {
                    style
                };
                let text = if i == 0 {
                    format!("{prefix}{line}")
                } else {
                    line.to_string()
                };
                lines.push(Line::from(Span::styled(text, line_style)));
            }

            // Blank line between entries
            lines.push(Line::from(""));
        }

        lines
    }
}

impl Widget for NarrativeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.focused {
            " Narrative [j/k scroll] "
        } else {
            " Narrative "
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.lines();

        let visible_height = inner.height as usize;
        let total_lines = lines.len();
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);

            // More below
            if scroll < max_scroll {
                let hint = format!(" ↓{} more ", max_scroll - scroll);
                let hint_y = inner.y + inner.height.saturating_sub(1);
                let hint_style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM);
                for (i, ch) in hint.chars().enumerate() {
                    let x = inner.x + (i as u16);
                    if x < inner.x + inner.width.saturating_sub(2) {
                        buf[(x, hint_y)].set_char(ch).set_style(hint_style);
                    }
                }
            }
        }
    }
}
