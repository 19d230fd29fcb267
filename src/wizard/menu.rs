use crate::command::{Action, ResourceKind};

/// Identifier carried by each menu entry. Handlers match on this, never on
/// the rendered label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuId {
    RunCommand,
    CustomCommand,
    Favourites,
    History,
    SavedOutputs,
    Hotkeys,
    ContextsNamespaces,
    Connectivity,
    ClusterInfo,
    Exit,
    Resource(ResourceKind),
    Action(Action),
    Target(String),
    SecretField(String),
    /// Index into the flag checklist.
    Flag(usize),
    Execute,
    Help,
    SaveFavourite,
    Back,
    Favourite(usize),
    HistoryEntry(usize),
    Hotkey(String),
    BindKey(String),
    Group(String),
    Version(usize),
    SwitchContext,
    SetDefaultNamespace,
    Context(String),
    Namespace(String),
    /// Informational row ("nothing here") that does nothing when chosen.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: MenuId,
    pub label: String,
    pub description: String,
}

impl MenuItem {
    pub fn new(id: MenuId, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            description: description.into(),
        }
    }

    pub fn placeholder(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(MenuId::Placeholder, label, description)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
    cursor: usize,
}

impl Menu {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.cursor)
    }

    pub fn selected_id(&self) -> Option<MenuId> {
        self.selected().map(|item| item.id.clone())
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1) % self.items.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.items.is_empty() {
            self.cursor = if self.cursor == 0 {
                self.items.len() - 1
            } else {
                self.cursor - 1
            };
        }
    }

    /// Move the cursor, clamped to the last item.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.items.len().saturating_sub(1));
    }

    /// Put the cursor on the first item with `id`, if any.
    pub fn select(&mut self, id: &MenuId) -> bool {
        match self.items.iter().position(|item| &item.id == id) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            item.label = label.into();
        }
    }
}
