use crossterm::event::KeyEvent;
use ratatui::style::Style;
use tui_textarea::{Input, TextArea};

use super::theme::Theme;

/// Single-line query input with in-memory history navigation. History is
/// session-only; nothing is persisted.
pub struct QueryEditor {
    pub textarea: TextArea<'static>,
    max_history: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    history_draft: Option<String>,
}

impl QueryEditor {
    pub fn new(placeholder: &str, max_history: usize) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(placeholder);
        textarea.set_cursor_line_style(Style::default());

        Self {
            textarea,
            max_history,
            history: Vec::new(),
            history_index: None,
            history_draft: None,
        }
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_text(&mut self, s: String) {
        let placeholder = self.textarea.placeholder_text().to_string();
        let mut textarea = TextArea::new(vec![s]);
        textarea.set_placeholder_text(placeholder);
        textarea.set_cursor_line_style(Style::default());
        textarea.move_cursor(tui_textarea::CursorMove::End);
        self.textarea = textarea;
    }

    /// Applies focus styling: an accented cursor when active, a receded one
    /// when the table owns input.
    pub fn set_focused(&mut self, focused: bool, theme: Theme) {
        if focused {
            self.textarea.set_cursor_style(theme.table_selected());
            self.textarea.set_style(Style::default());
        } else {
            self.textarea.set_cursor_style(Style::default());
            self.textarea.set_style(theme.dim());
        }
    }

    pub fn push_history(&mut self, query: String) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.history.last().map(|s| s.as_str()) == Some(trimmed) {
            return;
        }

        self.history.push(trimmed.to_string());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
        self.history_index = None;
        self.history_draft = None;
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        match self.history_index {
            None => {
                self.history_draft = Some(self.text());
                self.history_index = Some(self.history.len() - 1);
            }
            Some(i) => {
                self.history_index = Some(i.saturating_sub(1));
            }
        }

        if let Some(i) = self.history_index {
            self.set_text(self.history[i].clone());
        }
    }

    pub fn history_next(&mut self) {
        let Some(i) = self.history_index else {
            return;
        };

        let next = i + 1;
        if next >= self.history.len() {
            self.history_index = None;
            if let Some(draft) = self.history_draft.take() {
                self.set_text(draft);
            }
            return;
        }

        self.history_index = Some(next);
        self.set_text(self.history[next].clone());
    }

    pub fn input(&mut self, key: KeyEvent) {
        let input: Input = key.into();
        self.textarea.input(input);

        // Editing ends history navigation.
        if self.history_index.is_some() {
            self.history_index = None;
            self.history_draft = None;
        }
    }
}
