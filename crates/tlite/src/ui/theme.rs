use ratatui::style::{Color, Modifier, Style};

// 256-color palette entries shared by both themes.
const AQUAMARINE: Color = Color::Indexed(122);
const STRONG_RED: Color = Color::Indexed(161);
const OUTER_SPACE: Color = Color::Indexed(238);
const WHITE: Color = Color::Indexed(231);

/// Visual mode of the whole frame. `Error` replaces the results table with a
/// diagnostic panel and switches the accent color; it holds until the next
/// successful submit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Normal,
    Error,
}

impl Theme {
    pub fn accent(self) -> Color {
        match self {
            Theme::Normal => AQUAMARINE,
            Theme::Error => STRONG_RED,
        }
    }

    /// Style for the top/bottom boundary lines.
    pub fn boundary(self) -> Style {
        Style::default().fg(self.accent()).add_modifier(Modifier::BOLD)
    }

    /// Filler style for the `•` padding on boundary lines.
    pub fn boundary_fill(self) -> Style {
        Style::default().fg(self.accent())
    }

    /// Style for the focused editor prompt and cursor.
    pub fn highlight(self) -> Style {
        Style::default().fg(self.accent())
    }

    /// Style for chrome that should recede (blurred widgets, separators).
    pub fn dim(self) -> Style {
        Style::default().fg(OUTER_SPACE)
    }

    pub fn table_header(self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Style for the table's cursor row.
    pub fn table_selected(self) -> Style {
        let fg = match self {
            Theme::Normal => OUTER_SPACE,
            Theme::Error => WHITE,
        };
        Style::default().fg(fg).bg(self.accent())
    }

    pub fn error_text(self) -> Style {
        Style::default().fg(self.accent())
    }
}
