use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use super::state::Focus;
use crate::config::Config;
use crate::db::{Executor, Outcome};
use crate::ui::{DataGrid, GridModel, GridState, QueryEditor, Theme};

const HELP: &str = "tab toggle focus • enter run query • esc quit";

// Fixed chrome: side margins, boundary lines, editor and spacer rows.
const CHROME_COLS: u16 = 2;
const CHROME_ROWS: u16 = 8;

/// The interactive loop's entire state: current focus, theme, query editor,
/// latest result, and viewport dimensions. Owned exclusively by the event
/// loop; a running query blocks the loop until the engine exits.
pub struct App {
    pub focus: Focus,
    pub theme: Theme,

    pub editor: QueryEditor,
    pub grid: Option<GridModel>,
    pub grid_state: GridState,
    pub last_error: Option<String>,

    pub viewport_width: u16,
    pub viewport_height: u16,
    pub ready: bool,

    pub database_path: String,
    pub executor: Executor,
}

impl App {
    pub fn new(database_path: String, config: &Config) -> Self {
        let mut editor = QueryEditor::new(&config.editor.placeholder, config.editor.max_history);
        editor.set_focused(true, Theme::Normal);

        Self {
            focus: Focus::Editor,
            theme: Theme::Normal,

            editor,
            grid: None,
            grid_state: GridState::default(),
            last_error: None,

            viewport_width: 0,
            viewport_height: 0,
            ready: false,

            database_path,
            executor: Executor::new(config.engine.program.clone()),
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        // The startup size query is the first size-known event.
        let size = terminal.size()?;
        self.on_resize(size.width, size.height);

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.on_key(key) {
                            break;
                        }
                    }
                    Event::Resize(cols, rows) => self.on_resize(cols, rows),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Handles one key event. Returns true when the loop should exit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Tab, KeyModifiers::NONE) => self.toggle_focus(),
            _ => match self.focus {
                Focus::Editor => self.handle_editor_key(key),
                Focus::Table => {
                    let row_count = self.grid.as_ref().map(|g| g.rows.len()).unwrap_or(0);
                    self.grid_state.handle_key(key, row_count);
                }
            },
        }

        false
    }

    /// Viewport-size change: the drawable area is the raw terminal size
    /// minus the fixed chrome.
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.ready = true;
        self.viewport_width = cols.saturating_sub(CHROME_COLS);
        self.viewport_height = rows.saturating_sub(CHROME_ROWS);

        if let Some(grid) = &mut self.grid {
            grid.relayout(self.viewport_width);
        }
    }

    /// Swaps which widget is active. Never touches the current result.
    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggled();
        self.editor.set_focused(self.focus == Focus::Editor, self.theme);
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.submit(),
            (KeyCode::Char('p'), KeyModifiers::CONTROL) | (KeyCode::Up, KeyModifiers::NONE) => {
                self.editor.history_prev();
            }
            (KeyCode::Char('n'), KeyModifiers::CONTROL) | (KeyCode::Down, KeyModifiers::NONE) => {
                self.editor.history_next();
            }
            _ => self.editor.input(key),
        }
    }

    /// Runs the current query through resolve/execute/parse. A blank query
    /// is a no-op. Success installs a fresh table and moves focus to it;
    /// failure enters the error theme and keeps focus on the editor, leaving
    /// any previous result addressable but hidden.
    pub fn submit(&mut self) {
        let query = self.editor.text();
        let query = query.trim().to_string();
        if query.is_empty() {
            return;
        }

        self.editor.push_history(query.clone());

        match self.executor.run(&self.database_path, &query) {
            Outcome::Success(result) => {
                self.theme = Theme::Normal;
                self.last_error = None;
                self.grid = Some(GridModel::new(result, self.viewport_width));
                self.grid_state = GridState::default();
                self.focus = Focus::Table;
            }
            Outcome::Failure(diagnostic) => {
                self.theme = Theme::Error;
                self.last_error = Some(diagnostic);
                self.focus = Focus::Editor;
            }
        }

        self.editor.set_focused(self.focus == Focus::Editor, self.theme);
    }

    fn draw(&self, frame: &mut Frame) {
        let size = frame.area();

        if !self.ready {
            frame.render_widget(Paragraph::new("Initializing..."), size);
            return;
        }

        let base = size.inner(Margin {
            horizontal: 1,
            vertical: 0,
        });

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // boundary title
                Constraint::Length(1),
                Constraint::Length(1), // query editor
                Constraint::Length(1),
                Constraint::Min(0), // results table or error panel
                Constraint::Length(1), // help
            ])
            .split(base);

        let title = if self.theme == Theme::Error {
            "An error has occurred"
        } else {
            "tlite"
        };
        frame.render_widget(
            Paragraph::new(self.boundary_line(title, base.width)),
            chunks[0],
        );

        let editor_block = Block::default()
            .borders(Borders::LEFT)
            .border_type(BorderType::Thick)
            .border_style(self.theme.dim())
            .padding(Padding::left(1));
        let editor_area = editor_block.inner(chunks[2]);
        frame.render_widget(editor_block, chunks[2]);
        frame.render_widget(&self.editor.textarea, editor_area);

        let body = chunks[4];
        if self.theme == Theme::Error {
            if let Some(diagnostic) = self.last_error.as_deref() {
                self.render_error(frame, body, diagnostic);
            }
        } else if let Some(grid) = &self.grid {
            let height = grid.display_height(self.viewport_height).min(body.height);
            let table_area = Rect {
                x: body.x,
                y: body.y,
                width: body.width.min(self.viewport_width),
                height,
            };
            frame.render_widget(
                DataGrid {
                    model: grid,
                    state: &self.grid_state,
                    focused: self.focus == Focus::Table,
                    theme: self.theme,
                },
                table_area,
            );
        }

        frame.render_widget(Paragraph::new(HELP).style(self.theme.dim()), chunks[5]);
    }

    /// Title line padded to the full width with `•` glyphs, matching the
    /// boundary chrome above and below the content.
    fn boundary_line(&self, text: &str, width: u16) -> Line<'static> {
        let label = format!("{text} ");
        let fill = (width as usize).saturating_sub(label.width());
        Line::from(vec![
            Span::styled(label, self.theme.boundary()),
            Span::styled("•".repeat(fill), self.theme.boundary_fill()),
        ])
    }

    /// Centered bordered panel carrying the diagnostic; shown instead of the
    /// table until the next successful submit clears the error theme.
    fn render_error(&self, frame: &mut Frame, area: Rect, diagnostic: &str) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = 50u16.min(area.width);
        let inner_width = width.saturating_sub(6).max(1);
        let text_rows = (diagnostic.width() as u16).div_ceil(inner_width);
        let height = text_rows.saturating_add(4).min(area.height);
        let panel = centered_rect(width, height, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.error_text())
            .padding(Padding::new(2, 2, 1, 1));

        let panel_text = Paragraph::new(diagnostic.to_string())
            .block(block)
            .style(self.theme.error_text())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        frame.render_widget(panel_text, panel);
    }
}

fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
