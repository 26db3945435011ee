//! Color theme and styling for the delve TUI

use ratatui::style::{Color, Modifier, Style};

/// Game UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // HP colors
    pub hp_healthy: Color,
    pub hp_wounded: Color,
    pub hp_critical: Color,

    // Text colors
    pub player_text: Color,
    pub narration_text: Color,
    pub room_title: Color,
    pub system_text: Color,
    pub error_text: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            hp_healthy: Color::Green,
            hp_wounded: Color::Yellow,
            hp_critical: Color::Red,

            player_text: Color::Cyan,
            narration_text: Color::White,
            room_title: Color::Yellow,
            system_text: Color::DarkGray,
            error_text: Color::LightRed,
        }
    }
}

impl GameTheme {
    /// Get style for game narration
    pub fn narration_style(&self) -> Style {
        Style::default().fg(self.narration_text)
    }

    /// Get style for the first line of a room description
    pub fn room_title_style(&self) -> Style {
        Style::default()
            .fg(self.room_title)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for player actions
    pub fn player_style(&self) -> Style {
        Style::default()
            .fg(self.player_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_text)
    }

    /// Get HP bar color based on ratio
    pub fn hp_color(&self, ratio: f32) -> Color {
        if ratio > 0.5 {
            self.hp_healthy
        } else if ratio > 0.25 {
            self.hp_wounded
        } else {
            self.hp_critical
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hp_color_thresholds() {
        let theme = GameTheme::default();
        assert_eq!(theme.hp_color(1.0), theme.hp_healthy);
        assert_eq!(theme.hp_color(0.5), theme.hp_wounded);
        assert_eq!(theme.hp_color(0.1), theme.hp_critical);
    }
}
