use crossterm::event::{KeyCode, KeyEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;
use crate::db::QueryResult;

/// One laid-out column: uppercased title and rendered width in cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub width: u16,
}

/// Computes per-column display widths proportional to content width, scaled
/// so the total never exceeds `viewport_width`.
///
/// Known limitation, kept on purpose: there is no minimum width floor, so
/// results with many columns can render some of them at zero width.
pub fn layout_columns(headers: &[String], rows: &[Vec<String>], viewport_width: u16) -> Vec<Column> {
    let mut max_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            // The parser guarantees uniform rows, but never index past a
            // short one.
            if i >= max_widths.len() {
                break;
            }
            max_widths[i] = max_widths[i].max(cell.width());
        }
    }

    let total: usize = max_widths.iter().sum();
    let scale = if total == 0 {
        1.0
    } else {
        f64::from(viewport_width) / total as f64
    };

    headers
        .iter()
        .zip(&max_widths)
        .map(|(title, &w)| Column {
            title: title.to_uppercase(),
            width: (w as f64 * scale).floor() as u16,
        })
        .collect()
}

/// A query result plus its current column layout.
pub struct GridModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub columns: Vec<Column>,
}

impl GridModel {
    pub fn new(result: QueryResult, viewport_width: u16) -> Self {
        let columns = layout_columns(&result.headers, &result.rows, viewport_width);
        Self {
            headers: result.headers,
            rows: result.rows,
            columns,
        }
    }

    /// Recomputes the column layout for a new viewport width.
    pub fn relayout(&mut self, viewport_width: u16) {
        self.columns = layout_columns(&self.headers, &self.rows, viewport_width);
    }

    /// Displayed height: header line plus rows, capped to the viewport.
    pub fn display_height(&self, viewport_height: u16) -> u16 {
        let wanted = self.rows.len().saturating_add(1).min(u16::MAX as usize) as u16;
        wanted.min(viewport_height)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GridState {
    pub row_offset: usize,
    pub cursor_row: usize,
}

impl GridState {
    /// Table navigation. Never touches the underlying result.
    pub fn handle_key(&mut self, key: KeyEvent, row_count: usize) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if row_count > 0 {
                    self.cursor_row = (self.cursor_row + 1).min(row_count - 1);
                }
            }
            KeyCode::PageUp => {
                self.cursor_row = self.cursor_row.saturating_sub(10);
            }
            KeyCode::PageDown => {
                if row_count > 0 {
                    self.cursor_row = (self.cursor_row + 10).min(row_count - 1);
                }
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.cursor_row = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                if row_count > 0 {
                    self.cursor_row = row_count - 1;
                }
            }
            _ => {}
        }
    }

    pub fn ensure_cursor_visible(&mut self, viewport_rows: usize, row_count: usize) {
        if viewport_rows == 0 || row_count == 0 {
            self.row_offset = 0;
            self.cursor_row = 0;
            return;
        }

        self.cursor_row = self.cursor_row.min(row_count - 1);

        if self.cursor_row < self.row_offset {
            self.row_offset = self.cursor_row;
        }

        let last_visible = self.row_offset + viewport_rows - 1;
        if self.cursor_row > last_visible {
            self.row_offset = self.cursor_row.saturating_sub(viewport_rows - 1);
        }

        self.row_offset = self.row_offset.min(row_count.saturating_sub(1));
    }
}

pub struct DataGrid<'a> {
    pub model: &'a GridModel,
    pub state: &'a GridState,
    pub focused: bool,
    pub theme: Theme,
}

impl Widget for DataGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.model.columns.is_empty() {
            return;
        }

        render_cells(
            area.x,
            area.y,
            area.width,
            &self.model.columns.iter().map(|c| c.title.clone()).collect::<Vec<_>>(),
            &self.model.columns,
            self.theme.table_header(),
            buf,
        );

        if area.height < 2 {
            return;
        }

        let body_rows = (area.height - 1) as usize;
        let mut state = self.state.clone();
        state.ensure_cursor_visible(body_rows, self.model.rows.len());

        for i in 0..body_rows {
            let row_idx = state.row_offset + i;
            if row_idx >= self.model.rows.len() {
                break;
            }
            let y = area.y + 1 + i as u16;

            let style = if self.focused && row_idx == state.cursor_row {
                self.theme.table_selected()
            } else {
                Style::default()
            };

            render_cells(
                area.x,
                y,
                area.width,
                &self.model.rows[row_idx],
                &self.model.columns,
                style,
                buf,
            );
        }
    }
}

fn render_cells(
    mut x: u16,
    y: u16,
    available_w: u16,
    cells: &[String],
    columns: &[Column],
    style: Style,
    buf: &mut Buffer,
) {
    let max_x = x.saturating_add(available_w);

    for (col, cell) in columns.iter().zip(cells) {
        if x >= max_x || col.width == 0 {
            continue;
        }

        let draw_w = col.width.min(max_x - x);
        buf.set_string(x, y, fit_to_width(cell, draw_w), style);
        x += draw_w;

        if x < max_x {
            buf.set_string(x, y, " ", style);
            x += 1;
        }
    }
}

/// Pads or truncates `s` to exactly `width` display cells, with an ASCII
/// ellipsis when content is cut.
fn fit_to_width(s: &str, width: u16) -> String {
    let width = width as usize;
    if width == 0 {
        return String::new();
    }

    let current = s.width();
    if current == width {
        return s.to_string();
    }

    if current < width {
        let mut out = s.to_string();
        out.push_str(&" ".repeat(width - current));
        return out;
    }

    if width <= 3 {
        return truncate_by_display_width(s, width);
    }

    let mut out = truncate_by_display_width(s, width - 3);
    out.push_str("...");
    truncate_by_display_width(&out, width)
}

fn truncate_by_display_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;

    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
        if used == width {
            break;
        }
    }

    let out_w = out.width();
    if out_w < width {
        out.push_str(&" ".repeat(width - out_w));
    }

    out
}
