//! Render orchestration for the delve TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::flow::Phase;
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::character_panel::ability_lines;
use crate::ui::widgets::{CharacterPanelWidget, InputWidget, NarrativeWidget};

/// Which panel is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Narrative,
    Character,
}

/// Overlay types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    Inventory,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_title_bar(frame, app, layout.title_area);

    let narrative_widget = NarrativeWidget::new(&app.narrative_history, &app.theme)
        .scroll(app.narrative_scroll)
        .focused(matches!(app.focused_panel, FocusedPanel::Narrative));
    frame.render_widget(narrative_widget, layout.narrative_area);

    render_sidebar(frame, app, layout.sidebar_area);
    render_status_bar(frame, app, layout.status_bar);
    render_input(frame, app, layout.input_area);

    if let Some(overlay) = app.overlay() {
        match overlay {
            Overlay::Help => render_help_overlay(frame, app, area),
            Overlay::Inventory => render_inventory_overlay(frame, app, area),
        }
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.flow.session() {
        Some(session) => format!(
            " Delve | {} | {} ",
            session.adventure_title(),
            session.current_room_name()
        ),
        None => match app.flow.phase() {
            Phase::Creating(_) => " Delve | New character ".to_string(),
            _ => " Delve | Choose an adventure ".to_string(),
        },
    };

    let line = Line::from(Span::styled(title, app.theme.title_style()));
    frame.render_widget(Paragraph::new(line), area);
}

/// Character sheet once there is a character, rolled scores before that.
fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focused_panel, FocusedPanel::Character);

    if let Phase::Creating(creation) = app.flow.phase() {
        if creation.character().is_none() {
            let mut lines = vec![Line::from(Span::styled(
                "Rolled scores (3d6):",
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            lines.extend(ability_lines(creation.ability_scores()));
            if let Some(class) = creation.class() {
                lines.push(Line::from(""));
                lines.push(Line::from(format!("Class: {class}")));
            }
            if let Some(race) = creation.race() {
                lines.push(Line::from(format!("Race: {race}")));
            }

            let block = Block::default()
                .title(" New Character ")
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(focused));
            frame.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }
    }

    let Some(character) = app.flow.character() else {
        return;
    };
    let session = app.flow.session();
    let inventory = session.map(|s| s.inventory()).unwrap_or_default();
    let widget = CharacterPanelWidget::new(character, &app.theme)
        .location(session.map(|s| s.current_room_name()))
        .inventory(&inventory)
        .focused(focused);
    frame.render_widget(widget, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (mode, color) = match app.input_mode {
        InputMode::Normal => ("NORMAL", Color::Blue),
        InputMode::Insert => ("INSERT", Color::Green),
        InputMode::Command => ("COMMAND", Color::Yellow),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {mode} "),
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(app.flow.phase_name(), app.theme.system_style()),
    ];
    if let Some(message) = app.status_message() {
        spans.push(Span::raw(" | "));
        spans.push(Span::raw(message.to_string()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = matches!(app.input_mode, InputMode::Insert | InputMode::Command);
    let is_command = matches!(app.input_mode, InputMode::Command);

    let placeholder = if is_active {
        "Type a command and press Enter"
    } else {
        "Press 'i' to type a command..."
    };

    let input_widget = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .active(is_active)
        .command_mode(is_command)
        .placeholder(placeholder);

    frame.render_widget(input_widget, area);
}

fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(56, 27, area);
    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            " Delve - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Input Modes:", heading)),
        Line::from("  i       Enter INSERT mode (type commands)"),
        Line::from("  :       Enter COMMAND mode"),
        Line::from("  Esc     Return to NORMAL mode"),
        Line::from(""),
        Line::from(Span::styled("Navigation (NORMAL mode):", heading)),
        Line::from("  j/k or ↑/↓     Scroll up/down"),
        Line::from("  PgUp/PgDn      Scroll by page"),
        Line::from("  g/G            Jump to top/bottom"),
        Line::from("  l              Look around"),
        Line::from("  I              Inventory"),
        Line::from("  q              Quit"),
        Line::from(""),
        Line::from(Span::styled("In the game:", heading)),
        Line::from("  look, go <dir>, n/s/e/w/u/d, take <item>,"),
        Line::from("  drop <item>, examine <thing>, inventory,"),
        Line::from("  use <item> [on <thing>], quit"),
        Line::from(""),
        Line::from(Span::styled("Commands:", heading)),
        Line::from("  :w      Save now"),
        Line::from("  :q      Quit"),
        Line::from("  #status #save #roll #help #quit (in INSERT mode)"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn render_inventory_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let inventory = app
        .flow
        .session()
        .map(|s| s.inventory())
        .unwrap_or_default();
    let popup_area = centered_rect_fixed(40, inventory.len() as u16 + 4, area);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = if inventory.is_empty() {
        vec![Line::from(Span::styled(
            "You are not carrying anything.",
            app.theme.system_style(),
        ))]
    } else {
        inventory
            .into_iter()
            .map(|item| Line::from(format!("  {item}")))
            .collect()
    };

    let block = Block::default()
        .title(" Inventory ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
