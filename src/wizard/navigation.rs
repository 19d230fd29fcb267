use crate::command::{Action, ResourceKind};
use crate::flags::{ChecklistEntry, FlagChecklist};
use crate::hotkeys::KEYS;

use super::{Menu, MenuId, MenuItem, Screen, Wizard};

impl Wizard {
    pub(super) fn go(&mut self, screen: Screen) {
        self.previous = self.screen;
        self.screen = screen;
    }

    /// Show `menu` on `screen`, keeping the cursor when the same screen is
    /// only being refreshed.
    fn show_menu(&mut self, screen: Screen, menu: Menu) {
        let refresh = self.screen == screen;
        let cursor = self.menu.cursor();
        self.menu = menu;
        if refresh {
            self.menu.set_cursor(cursor);
        } else {
            self.go(screen);
        }
    }

    /// Canonical parent of the current screen. Each screen has a fixed back
    /// target; only the saved-output screens look at how they were entered.
    pub(super) fn back(&mut self) {
        self.pending = None;
        match self.screen {
            Screen::MainMenu => {}
            Screen::ResourceSelection => self.enter_main_menu(),
            Screen::ActionSelection => self.enter_resource_selection(),
            Screen::TargetSelection => self.enter_action_selection(),
            Screen::SecretFieldSelection => self.enter_target_selection(),
            Screen::FlagsSelection => self.enter_action_selection(),
            Screen::NamespaceInput => self.enter_flags(),
            Screen::CommandPreview => match self.selection.action {
                Some(Action::ExtractField) => self.enter_secret_fields(),
                Some(_) => self.enter_flags(),
                None => self.enter_main_menu(),
            },
            Screen::CommandHelp => self.enter_preview(),
            Screen::SaveFavourite => {
                self.favourite_draft = None;
                if self.previous == Screen::CommandHistory {
                    self.enter_history();
                } else {
                    self.enter_preview();
                }
            }
            Screen::RenameFavourite => {
                self.renaming_favourite = None;
                self.enter_favourites();
            }
            Screen::HotkeyBind => {
                self.bind_target = None;
                self.enter_favourites();
            }
            Screen::SavedOutputVersions => self.enter_groups(),
            Screen::SavedOutputView => match self.selected_base.clone() {
                Some(base) if self.previous == Screen::SavedOutputVersions => {
                    self.enter_versions(&base)
                }
                _ => self.enter_groups(),
            },
            Screen::RenameSavedOutput => {
                let base = self.renaming_base.take();
                match base {
                    Some(base) if self.previous == Screen::SavedOutputVersions => {
                        self.enter_versions(&base)
                    }
                    _ => self.enter_groups(),
                }
            }
            Screen::SaveOutputName => self.go(Screen::CommandOutput),
            Screen::ContextsList | Screen::NamespacesList => self.enter_contexts_menu(),
            Screen::CommandOutput
            | Screen::ClusterConnectivity
            | Screen::ClusterInfo
            | Screen::CustomCommand
            | Screen::FavouritesList
            | Screen::HotkeysList
            | Screen::CommandHistory
            | Screen::SavedOutputsList
            | Screen::ContextsNamespacesMenu => self.enter_main_menu(),
        }
    }

    /// Start over: clears the selection and any status message.
    pub(super) fn enter_main_menu(&mut self) {
        self.selection.reset();
        self.status = None;
        self.pending = None;
        self.favourite_draft = None;
        self.renaming_favourite = None;
        self.renaming_base = None;
        self.bind_target = None;

        let items = vec![
            MenuItem::new(MenuId::RunCommand, "Run Command", "Build a kubectl command step by step"),
            MenuItem::new(MenuId::CustomCommand, "Custom Command", "Type a kubectl command directly"),
            MenuItem::new(MenuId::Favourites, "Favourites", "Run a saved command"),
            MenuItem::new(MenuId::History, "Command History", "Re-run a recent command"),
            MenuItem::new(MenuId::SavedOutputs, "Saved Outputs", "Browse archived command output"),
            MenuItem::new(MenuId::Hotkeys, "Hotkeys", "Function-key shortcuts"),
            MenuItem::new(
                MenuId::ContextsNamespaces,
                "Contexts & Namespaces",
                "Switch context or set the default namespace",
            ),
            MenuItem::new(MenuId::Connectivity, "Check Cluster Connectivity", "Run kubectl cluster-info"),
            MenuItem::new(MenuId::ClusterInfo, "Cluster Info", "Nodes, capacity and versions"),
            MenuItem::new(MenuId::Exit, "Exit", "Quit kube-wizard"),
        ];
        self.menu = Menu::new(Screen::MainMenu.title(), items);
        self.go(Screen::MainMenu);
    }

    pub(super) fn enter_resource_selection(&mut self) {
        self.selection.reset();
        let items = ResourceKind::ALL
            .iter()
            .map(|kind| MenuItem::new(MenuId::Resource(*kind), kind.label(), kind.description()))
            .collect();
        self.menu = Menu::new(Screen::ResourceSelection.title(), items);
        self.go(Screen::ResourceSelection);
    }

    pub(super) fn enter_action_selection(&mut self) {
        let Some(resource) = self.selection.resource else {
            self.enter_resource_selection();
            return;
        };
        let previous_action = self.selection.action.take();
        self.selection.target.clear();
        self.selection.reset_flags();
        self.selection.command.clear();

        let items = resource
            .actions()
            .iter()
            .map(|action| MenuItem::new(MenuId::Action(*action), action.label(), action.description()))
            .collect();
        self.menu = Menu::new(format!("{}: Select Action", resource.label()), items);
        if let Some(action) = previous_action {
            self.menu.select(&MenuId::Action(action));
        }
        self.go(Screen::ActionSelection);
    }

    pub(super) fn enter_target_selection(&mut self) {
        let Some(resource) = self.selection.resource else {
            self.enter_resource_selection();
            return;
        };
        let mut items: Vec<MenuItem> = self
            .names
            .iter()
            .map(|name| MenuItem::new(MenuId::Target(name.clone()), name.clone(), ""))
            .collect();
        if items.is_empty() {
            items.push(MenuItem::placeholder(
                format!("No {} found", resource.plural()),
                "Press Esc to go back",
            ));
        }
        let mut menu = Menu::new(format!("Select {}", resource.singular()), items);
        if !self.selection.target.is_empty() {
            menu.select(&MenuId::Target(self.selection.target.clone()));
        }
        self.menu = menu;
        self.go(Screen::TargetSelection);
    }

    pub(super) fn enter_secret_fields(&mut self) {
        let mut items: Vec<MenuItem> = self
            .secret_keys
            .iter()
            .map(|key| {
                let field = format!("data.{}", key);
                MenuItem::new(MenuId::SecretField(field.clone()), field, "Decoded value")
            })
            .collect();
        for (field, description) in [
            ("metadata.name", "Secret name"),
            ("metadata.namespace", "Secret namespace"),
            ("type", "Secret type"),
        ] {
            items.push(MenuItem::new(MenuId::SecretField(field.to_string()), field, description));
        }
        self.menu = Menu::new(format!("Fields of {}", self.selection.target), items);
        self.go(Screen::SecretFieldSelection);
    }

    /// Fresh checklist for the chosen action. Flags from an earlier visit are dropped.
    pub(super) fn enter_flags(&mut self) {
        let Some(action) = self.selection.action else {
            self.enter_action_selection();
            return;
        };
        self.selection.reset_flags();
        self.selection.command.clear();
        self.checklist = FlagChecklist::for_action(action);

        let items = self
            .checklist
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let description = match entry {
                    ChecklistEntry::Done => "Build the command",
                    ChecklistEntry::Separator => "",
                    ChecklistEntry::Flag { .. } => "Space to toggle",
                    ChecklistEntry::Namespace { .. } => "Ask for a namespace",
                };
                MenuItem::new(MenuId::Flag(i), entry.label(), description)
            })
            .collect();
        self.menu = Menu::new(format!("{}: Select Flags", action.label()), items);
        self.go(Screen::FlagsSelection);
    }

    pub(super) fn enter_preview(&mut self) {
        let items = vec![
            MenuItem::new(MenuId::Execute, "Execute", "Run this command"),
            MenuItem::new(MenuId::Help, "Help", "Show kubectl help for this command"),
            MenuItem::new(MenuId::SaveFavourite, "Save as Favourite", "Keep this command for later"),
            MenuItem::new(MenuId::Back, "Back", "Go back"),
        ];
        self.menu = Menu::new(Screen::CommandPreview.title(), items);
        self.go(Screen::CommandPreview);
    }

    pub(super) fn enter_text(&mut self, screen: Screen, value: &str) {
        self.reset_input(value);
        self.go(screen);
    }

    pub(super) fn enter_output(&mut self, screen: Screen, content: impl Into<String>) {
        self.viewport.set_content(content);
        self.go(screen);
    }

    pub(super) fn enter_favourites(&mut self) {
        let mut items: Vec<MenuItem> = self
            .favourites
            .iter()
            .enumerate()
            .map(|(i, fav)| MenuItem::new(MenuId::Favourite(i), fav.name.clone(), fav.command.clone()))
            .collect();
        if items.is_empty() {
            items.push(MenuItem::placeholder(
                "No favourites yet",
                "Save one from the command preview",
            ));
        }
        self.show_menu(Screen::FavouritesList, Menu::new(Screen::FavouritesList.title(), items));
    }

    pub(super) fn enter_history(&mut self) {
        let mut items: Vec<MenuItem> = self
            .history
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                MenuItem::new(
                    MenuId::HistoryEntry(i),
                    entry.command.clone(),
                    entry.executed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                )
            })
            .collect();
        if items.is_empty() {
            items.push(MenuItem::placeholder("No commands run yet", ""));
        }
        self.show_menu(Screen::CommandHistory, Menu::new(Screen::CommandHistory.title(), items));
    }

    pub(super) fn enter_hotkeys(&mut self) {
        let mut items: Vec<MenuItem> = self
            .hotkeys
            .iter()
            .map(|h| {
                MenuItem::new(
                    MenuId::Hotkey(h.key.clone()),
                    format!("{:<4} {}", h.key, h.name),
                    h.command.clone(),
                )
            })
            .collect();
        if items.is_empty() {
            items.push(MenuItem::placeholder(
                "No hotkeys bound",
                "Press h on a favourite to bind one",
            ));
        }
        self.show_menu(Screen::HotkeysList, Menu::new(Screen::HotkeysList.title(), items));
    }

    pub(super) fn enter_hotkey_bind(&mut self) {
        let Some(target) = self.bind_target.clone() else {
            self.enter_favourites();
            return;
        };
        let items = KEYS
            .iter()
            .map(|key| {
                let current = self
                    .hotkeys
                    .iter()
                    .find(|h| h.key == *key)
                    .map(|h| format!("bound to {}", h.name))
                    .unwrap_or_else(|| "unbound".to_string());
                MenuItem::new(MenuId::BindKey(key.to_string()), *key, current)
            })
            .collect();
        self.show_menu(Screen::HotkeyBind, Menu::new(format!("Bind \"{}\" to", target.name), items));
    }

    pub(super) fn enter_groups(&mut self) {
        let mut items: Vec<MenuItem> = self
            .groups
            .iter()
            .map(|g| {
                let count = g.versions.len();
                let description = if count == 1 {
                    "1 version".to_string()
                } else {
                    format!("{} versions", count)
                };
                MenuItem::new(MenuId::Group(g.base.clone()), g.base.clone(), description)
            })
            .collect();
        if items.is_empty() {
            items.push(MenuItem::placeholder(
                "No saved outputs",
                "Press s on a command output to save it",
            ));
        }
        let mut menu = Menu::new(Screen::SavedOutputsList.title(), items);
        let refresh = self.screen == Screen::SavedOutputsList;
        if let Some(base) = self.selected_base.clone() {
            menu.select(&MenuId::Group(base));
        } else if refresh {
            menu.set_cursor(self.menu.cursor());
        }
        self.menu = menu;
        if !refresh {
            self.go(Screen::SavedOutputsList);
        }
    }

    pub(super) fn enter_versions(&mut self, base: &str) {
        let Some(group) = self.groups.iter().find(|g| g.base == base) else {
            self.selected_base = None;
            self.enter_groups();
            return;
        };
        let items = group
            .versions
            .iter()
            .enumerate()
            .map(|(i, v)| MenuItem::new(MenuId::Version(i), v.label(), v.file_name.clone()))
            .collect();
        let menu = Menu::new(format!("Versions of {}", base), items);
        self.selected_base = Some(base.to_string());
        self.show_menu(Screen::SavedOutputVersions, menu);
    }

    pub(super) fn enter_contexts_menu(&mut self) {
        let items = vec![
            MenuItem::new(MenuId::SwitchContext, "Switch Context", "Switch the current kube context"),
            MenuItem::new(
                MenuId::SetDefaultNamespace,
                "Set Default Namespace",
                "Choose a default namespace for commands",
            ),
            MenuItem::new(MenuId::Back, "Back to Main Menu", "Return to the main menu"),
        ];
        self.menu = Menu::new(Screen::ContextsNamespacesMenu.title(), items);
        self.go(Screen::ContextsNamespacesMenu);
    }

    pub(super) fn enter_contexts_list(&mut self, contexts: &[String]) {
        let mut items: Vec<MenuItem> = contexts
            .iter()
            .map(|name| {
                let description = if Some(name.as_str()) == self.current_context.as_deref() {
                    "(current)"
                } else {
                    ""
                };
                MenuItem::new(MenuId::Context(name.clone()), name.clone(), description)
            })
            .collect();
        if items.is_empty() {
            items.push(MenuItem::placeholder(
                "No contexts found",
                "Configure kubeconfig to add contexts",
            ));
        }
        let mut menu = Menu::new("Kube Contexts (Enter=switch)", items);
        if let Some(current) = self.current_context.clone() {
            menu.select(&MenuId::Context(current));
        }
        self.menu = menu;
        self.go(Screen::ContextsList);
    }

    pub(super) fn enter_namespaces_list(&mut self, namespaces: &[String]) {
        let mut items: Vec<MenuItem> = namespaces
            .iter()
            .map(|ns| {
                let description = if Some(ns.as_str()) == self.default_namespace.as_deref() {
                    "(current default)"
                } else {
                    ""
                };
                MenuItem::new(MenuId::Namespace(ns.clone()), ns.clone(), description)
            })
            .collect();
        if items.is_empty() {
            items.push(MenuItem::placeholder(
                "No namespaces found",
                "Create namespaces to select a default",
            ));
        }
        let mut menu = Menu::new("Namespaces (Enter=set default)", items);
        if let Some(ns) = self.default_namespace.clone() {
            menu.select(&MenuId::Namespace(ns));
        }
        self.menu = menu;
        self.go(Screen::NamespacesList);
    }
}
