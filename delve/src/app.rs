//! Main application state and logic

use std::collections::VecDeque;

use delve_core::SessionError;

use crate::flow::{roll_dice, GameFlow};
use crate::ui::theme::GameTheme;
use crate::ui::widgets::narrative::{EntryKind, NarrativeItem};
use crate::ui::{FocusedPanel, Overlay};

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - free text input
    Insert,
    /// Command mode - entering : commands
    Command,
}

/// Main application state
pub struct App {
    pub flow: GameFlow,

    // UI state
    pub theme: GameTheme,
    pub focused_panel: FocusedPanel,
    overlay: Option<Overlay>,

    // Narrative display
    pub narrative_history: Vec<NarrativeItem>,
    pub narrative_scroll: usize,
    pub scroll_locked_to_bottom: bool,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,
    pub input_history: VecDeque<String>,
    pub history_index: Option<usize>,
    pub saved_input: Option<String>,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
    pub pending_save: bool,
    /// Set when the game hit an error it cannot recover from.
    pub fatal_error: Option<String>,
}

impl App {
    pub fn new(flow: GameFlow) -> Self {
        let opening = flow.opening();
        let mut app = Self {
            flow,
            theme: GameTheme::default(),
            focused_panel: FocusedPanel::default(),
            overlay: None,
            narrative_history: Vec::new(),
            narrative_scroll: 0,
            scroll_locked_to_bottom: true,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_position: 0,
            input_history: VecDeque::with_capacity(100),
            history_index: None,
            saved_input: None,
            status_message: None,
            should_quit: false,
            pending_save: false,
            fatal_error: None,
        };

        app.add_narrative(opening, EntryKind::Narration);
        app.add_narrative(
            "Press 'i' to type, '?' for help, or scroll with j/k".to_string(),
            EntryKind::System,
        );

        app
    }

    /// Send one line to the game and show the reply.
    pub async fn process_player_input(&mut self, input: &str) {
        self.add_narrative(input.to_string(), EntryKind::PlayerAction);

        // Meta commands never reach the game
        if let Some(command) = input.trim().strip_prefix('#') {
            match command.split_whitespace().next() {
                Some("quit") | Some("exit") => self.should_quit = true,
                Some("status") => {
                    let status = self.flow.status_lines().join("\n");
                    self.add_narrative(status, EntryKind::System);
                }
                Some("save") => self.save().await,
                Some("roll") => {
                    let notation = command.trim_start_matches("roll").trim();
                    self.add_narrative(roll_dice(notation), EntryKind::System);
                }
                Some("help") => self.toggle_help(),
                _ => self.add_narrative(
                    "Unknown command. Type #help for help.".to_string(),
                    EntryKind::Error,
                ),
            }
            return;
        }

        match self.flow.input(input).await {
            Ok(reply) => {
                let kind = match self.flow.session() {
                    Some(session)
                        if reply.text.lines().next() == Some(session.current_room_name()) =>
                    {
                        EntryKind::Room
                    }
                    _ => EntryKind::Narration,
                };
                self.add_narrative(reply.text, kind);
                if reply.finished {
                    self.add_narrative(
                        "The adventure is over. Press q to leave.".to_string(),
                        EntryKind::System,
                    );
                }
                self.clear_status();
            }
            Err(e) => self.fail(e),
        }
    }

    /// Save the running session.
    pub async fn save(&mut self) {
        match self.flow.save().await {
            Ok(true) => {
                self.set_status("Saved");
                self.add_narrative("Game saved.".to_string(), EntryKind::System);
            }
            Ok(false) => self.set_status("Nothing to save"),
            Err(e) => {
                tracing::warn!(error = %e, "manual save failed");
                self.set_status(format!("Save failed: {e}"));
            }
        }
    }

    fn fail(&mut self, error: SessionError) {
        tracing::error!(error = %error, "unrecoverable game error");
        self.add_narrative(error.to_string(), EntryKind::Error);
        self.fatal_error = Some(error.to_string());
        self.should_quit = true;
    }

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.input_buffer.clear();
        self.input_buffer.push(':');
        self.cursor_position = 1;
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        if self.input_buffer.starts_with(':') {
            self.input_buffer.clear();
            self.cursor_position = 0;
        }
    }

    /// Add a narrative entry
    pub fn add_narrative(&mut self, content: String, kind: EntryKind) {
        self.narrative_history.push(NarrativeItem { content, kind });
        if self.scroll_locked_to_bottom {
            self.scroll_to_bottom();
        }
    }

    /// Scroll narrative to bottom and lock to bottom
    pub fn scroll_to_bottom(&mut self) {
        // The widget caps this to the real maximum
        self.narrative_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    /// Rough line count, assuming ~60 columns and ~20 visible rows
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;

        let estimated_lines: usize = self
            .narrative_history
            .iter()
            .map(|item| {
                item.content
                    .lines()
                    .map(|line| (line.len() / ESTIMATED_WIDTH).max(1))
                    .sum::<usize>()
                    + 1
            })
            .sum();

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    /// Scroll narrative up (unlocks from bottom)
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.narrative_scroll > max_scroll {
            self.narrative_scroll = max_scroll;
        }
        self.narrative_scroll = self.narrative_scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    /// Scroll narrative down
    pub fn scroll_down(&mut self, lines: usize) {
        self.narrative_scroll = self.narrative_scroll.saturating_add(lines);
        let max_scroll = self.estimate_max_scroll();
        self.narrative_scroll = self.narrative_scroll.min(max_scroll + 100);
    }

    /// Scroll to the first entry
    pub fn scroll_to_top(&mut self) {
        self.narrative_scroll = 0;
        self.scroll_locked_to_bottom = false;
    }

    /// Submit current input
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.trim().is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        if !input.starts_with(':') {
            self.input_history.push_front(input.clone());
            if self.input_history.len() > 100 {
                self.input_history.pop_back();
            }
        }
        self.history_index = None;
        self.saved_input = None;

        Some(input)
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Navigate to previous input in history
    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }

        // Keep what was typed so history_next can restore it
        if self.history_index.is_none() && !self.input_buffer.is_empty() {
            self.saved_input = Some(self.input_buffer.clone());
        }

        let index = match self.history_index {
            None => 0,
            Some(i) if i + 1 < self.input_history.len() => i + 1,
            Some(i) => i,
        };

        if let Some(entry) = self.input_history.get(index) {
            self.input_buffer = entry.clone();
            self.cursor_position = self.input_buffer.chars().count();
            self.history_index = Some(index);
        }
    }

    /// Navigate to next input in history
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.input_buffer = self.saved_input.take().unwrap_or_default();
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = None;
            }
            Some(i) => {
                if let Some(entry) = self.input_history.get(i - 1) {
                    self.input_buffer = entry.clone();
                    self.cursor_position = self.input_buffer.chars().count();
                    self.history_index = Some(i - 1);
                }
            }
        }
    }

    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn toggle_inventory(&mut self) {
        if matches!(self.overlay, Some(Overlay::Inventory)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Inventory);
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Process a colon command. Returns whether it was recognized.
    pub fn process_command(&mut self, command: &str) -> bool {
        let cmd = command.trim_start_matches(':');
        let parts: Vec<&str> = cmd.split_whitespace().collect();

        match parts.first().copied() {
            Some("q") | Some("quit") | Some("exit") => {
                self.should_quit = true;
                true
            }
            Some("w") | Some("save") => {
                self.set_status("Saving...");
                self.pending_save = true;
                true
            }
            Some("help") | Some("h") => {
                self.toggle_help();
                true
            }
            Some("inv") | Some("inventory") => {
                self.toggle_inventory();
                true
            }
            Some(other) => {
                self.set_status(format!("Unknown command: {other}"));
                false
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    // =========================================================================
    // Getters for private fields
    // =========================================================================

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Cycle to next focused panel
    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Narrative => FocusedPanel::Character,
            FocusedPanel::Character => FocusedPanel::Narrative,
        };
    }

    /// Set input buffer content and move cursor to end (unicode-safe)
    pub fn set_input(&mut self, content: impl Into<String>) {
        self.input_buffer = content.into();
        self.cursor_position = self.input_buffer.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }
}
