mod editor;
mod grid;
mod theme;

pub use editor::QueryEditor;
pub use grid::{layout_columns, Column, DataGrid, GridModel, GridState};
pub use theme::Theme;
