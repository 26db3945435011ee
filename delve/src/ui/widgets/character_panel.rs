//! Character panel widget for sidebar display

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use delve_core::world::{Ability, AbilityScores, Character};

use crate::ui::theme::GameTheme;

/// Compact character panel for sidebar
pub struct CharacterPanelWidget<'a> {
    character: &'a Character,
    theme: &'a GameTheme,
    location: Option<&'a str>,
    inventory: &'a [String],
    focused: bool,
}

impl<'a> CharacterPanelWidget<'a> {
    pub fn new(character: &'a Character, theme: &'a GameTheme) -> Self {
        Self {
            character,
            theme,
            location: None,
            inventory: &[],
            focused: false,
        }
    }

    pub fn location(mut self, location: Option<&'a str>) -> Self {
        self.location = location;
        self
    }

    pub fn inventory(mut self, inventory: &'a [String]) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for CharacterPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.character.name))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Race/Class/Level
                Constraint::Length(2), // HP bar
                Constraint::Length(6), // Ability scores
                Constraint::Min(0),    // Location and inventory
            ])
            .split(inner);

        let class_line = Line::from(Span::styled(
            format!(
                "Level {} {} {}",
                self.character.level, self.character.race, self.character.class
            ),
            Style::default().add_modifier(Modifier::DIM),
        ));
        Paragraph::new(class_line).render(chunks[0], buf);

        let hp = &self.character.hit_points;
        let hp_ratio = hp.ratio();
        Gauge::default()
            .block(Block::default())
            .gauge_style(Style::default().fg(self.theme.hp_color(hp_ratio)))
            .ratio(hp_ratio.clamp(0.0, 1.0) as f64)
            .label(format!("HP: {}/{}", hp.current, hp.maximum))
            .render(chunks[1], buf);

        Paragraph::new(ability_lines(&self.character.ability_scores)).render(chunks[2], buf);

        if chunks[3].height > 0 {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            let mut lines = Vec::new();

            if let Some(location) = self.location {
                lines.push(Line::from(vec![
                    Span::styled("Location: ", bold),
                    Span::raw(location.to_string()),
                ]));
                lines.push(Line::from(""));
            }

            lines.push(Line::from(Span::styled("Carrying:", bold)));
            if self.inventory.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  nothing",
                    self.theme.system_style(),
                )));
            }
            for item in self.inventory {
                lines.push(Line::from(format!("  {item}")));
            }

            Paragraph::new(lines).render(chunks[3], buf);
        }
    }
}

/// One line per ability: score and modifier.
pub fn ability_lines(scores: &AbilityScores) -> Vec<Line<'static>> {
    Ability::all()
        .into_iter()
        .map(|ability| {
            let score = scores.get(ability);
            let modifier = scores.modifier(ability);
            let mod_str = if modifier >= 0 {
                format!("+{modifier}")
            } else {
                format!("{modifier}")
            };
            Line::from(format!("{}: {score:2} ({mod_str})", ability.abbreviation()))
        })
        .collect()
}
