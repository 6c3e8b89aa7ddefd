/// Which widget owns keyboard input. Exactly one widget is focused at any
/// time; modeling this as an enum rules out the both-or-neither states two
/// booleans would allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Table,
}

impl Focus {
    pub fn toggled(self) -> Focus {
        match self {
            Focus::Editor => Focus::Table,
            Focus::Table => Focus::Editor,
        }
    }
}
