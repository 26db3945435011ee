//! Input field widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::GameTheme;

/// Input field widget
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a GameTheme,
    placeholder: &'a str,
    is_active: bool,
    is_command_mode: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a GameTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            placeholder: "Press 'i' to type a command...",
            is_active: true,
            is_command_mode: false,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    pub fn command_mode(mut self, is_command: bool) -> Self {
        self.is_command_mode = is_command;
        self
    }

    fn line(&self) -> Line<'a> {
        if self.content.is_empty() && !self.is_command_mode {
            return Line::from(vec![
                Span::styled("> ", self.theme.player_style()),
                Span::styled(
                    self.placeholder,
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]);
        }

        let prefix = if self.is_command_mode { ":" } else { "> " };
        let (display, cursor) = match self.content.strip_prefix(':') {
            Some(rest) if self.is_command_mode => (rest, self.cursor_position.saturating_sub(1)),
            _ => (self.content, self.cursor_position),
        };

        // Character-based slicing for unicode safety
        let before: String = display.chars().take(cursor).collect();
        let at = display
            .chars()
            .nth(cursor)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = display.chars().skip(cursor + 1).collect();

        Line::from(vec![
            Span::styled(prefix, self.theme.player_style()),
            Span::raw(before),
            Span::styled(
                at,
                Style::default()
                    .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                    .fg(self.theme.player_text),
            ),
            Span::raw(after),
        ])
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.line()).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_cursor_splits_content() {
        let theme = GameTheme::default();
        let widget = InputWidget::new("take lamp", &theme).cursor_position(4);
        let line = widget.line();
        assert_eq!(line.spans[1].content, "take");
        assert_eq!(line.spans[2].content, " ");
        assert_eq!(line.spans[3].content, "lamp");
    }

    #[test]
    fn test_command_mode_hides_colon() {
        let theme = GameTheme::default();
        let widget = InputWidget::new(":q", &theme)
            .cursor_position(2)
            .command_mode(true);
        assert_eq!(text(&widget.line()), ":q ");
    }

    #[test]
    fn test_placeholder_when_empty() {
        let theme = GameTheme::default();
        let widget = InputWidget::new("", &theme).placeholder("Type here");
        assert_eq!(text(&widget.line()), "> Type here");
    }
}
