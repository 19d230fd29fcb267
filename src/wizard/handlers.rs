use crate::command::{self, Action};
use crate::flags::ChecklistEntry;
use crate::hotkeys;
use crate::tasks::{Job, Task};

use super::{MenuId, Screen, Wizard};

impl Wizard {
    pub(super) fn confirm(&mut self, jobs: &mut Vec<Job>) {
        if self.screen.is_text_input() {
            self.submit_text(jobs);
            return;
        }
        if self.screen == Screen::FlagsSelection {
            self.confirm_flag();
            return;
        }
        let Some(id) = self.menu.selected_id() else {
            return;
        };

        match id {
            MenuId::RunCommand => self.enter_resource_selection(),
            MenuId::CustomCommand => {
                self.selection.reset();
                self.enter_text(Screen::CustomCommand, "");
            }
            MenuId::Favourites => {
                self.enter_favourites();
                self.spawn(Task::LoadFavourites, jobs);
            }
            MenuId::History => {
                self.enter_history();
                self.spawn(Task::LoadHistory, jobs);
            }
            MenuId::SavedOutputs => {
                self.selected_base = None;
                self.enter_groups();
                self.spawn(Task::LoadSavedOutputs, jobs);
            }
            MenuId::Hotkeys => {
                self.enter_hotkeys();
                self.spawn(Task::LoadHotkeys, jobs);
            }
            MenuId::ContextsNamespaces => self.enter_contexts_menu(),
            MenuId::Connectivity => {
                self.wait("Checking cluster connectivity...", Task::CheckConnectivity, jobs);
            }
            MenuId::ClusterInfo => {
                self.wait("Loading cluster information...", Task::LoadClusterInfo, jobs);
            }
            MenuId::Exit => self.should_quit = true,
            MenuId::Resource(kind) => {
                self.selection.resource = Some(kind);
                self.enter_action_selection();
            }
            MenuId::Action(action) => self.choose_action(action, jobs),
            MenuId::Target(name) => self.choose_target(name, jobs),
            MenuId::SecretField(field) => self.choose_secret_field(&field),
            MenuId::Flag(_) | MenuId::Placeholder => {}
            MenuId::Execute => {
                let command = self.selection.command.trim().to_string();
                if command.is_empty() {
                    return;
                }
                self.wait(format!("Running {}...", command), Task::Execute { command }, jobs);
            }
            MenuId::Help => {
                let task = Task::LoadHelp {
                    command: self.selection.command.clone(),
                };
                self.wait("Loading help...", task, jobs);
            }
            MenuId::SaveFavourite => {
                self.favourite_draft = Some(self.selection.command.clone());
                self.enter_text(Screen::SaveFavourite, "");
            }
            MenuId::Back => self.back(),
            MenuId::Favourite(index) => {
                if let Some(command) = self.favourites.get(index).map(|f| f.command.clone()) {
                    self.preview_command(command);
                }
            }
            MenuId::HistoryEntry(index) => {
                if let Some(command) = self.history.get(index).map(|h| h.command.clone()) {
                    self.preview_command(command);
                }
            }
            MenuId::Hotkey(key) => {
                self.wait(format!("Running {}...", key), Task::RunHotkey { key }, jobs);
            }
            MenuId::BindKey(key) => {
                let Some(target) = self.bind_target.clone() else {
                    return;
                };
                let message = format!("Binding {}...", key);
                let task = Task::BindHotkey {
                    key,
                    name: target.name,
                    command: target.command,
                };
                self.wait(message, task, jobs);
            }
            MenuId::Group(base) => self.open_group(&base, jobs),
            MenuId::Version(index) => self.open_version(index, jobs),
            MenuId::SwitchContext => {
                self.wait("Loading contexts...", Task::ListContexts, jobs);
            }
            MenuId::SetDefaultNamespace => {
                self.wait("Loading namespaces...", Task::ListNamespaces, jobs);
            }
            MenuId::Context(name) => {
                self.wait(format!("Switching to {}...", name), Task::SwitchContext { name }, jobs);
            }
            MenuId::Namespace(namespace) => {
                self.default_namespace = Some(namespace.clone());
                self.enter_contexts_menu();
                self.success(format!("Default namespace set to {}", namespace));
            }
        }
    }

    /// Start a flow that skips straight to the preview with `command`.
    fn preview_command(&mut self, command: String) {
        self.selection.reset();
        self.selection.command = command;
        self.enter_preview();
    }

    fn choose_action(&mut self, action: Action, jobs: &mut Vec<Job>) {
        let Some(resource) = self.selection.resource else {
            return;
        };
        self.selection.action = Some(action);
        self.selection.target.clear();
        if action.needs_target() {
            let namespace = self
                .selection
                .effective_namespace(self.default_namespace.as_deref())
                .map(str::to_string);
            let message = format!("Fetching {}...", resource.plural());
            self.wait(message, Task::FetchNames { resource, namespace }, jobs);
        } else {
            self.enter_flags();
        }
    }

    fn choose_target(&mut self, name: String, jobs: &mut Vec<Job>) {
        self.selection.target = name.clone();
        if self.selection.action == Some(Action::ExtractField) {
            let namespace = self
                .selection
                .effective_namespace(self.default_namespace.as_deref())
                .map(str::to_string);
            self.wait("Fetching secret keys...", Task::FetchSecretKeys { name, namespace }, jobs);
        } else {
            self.enter_flags();
        }
    }

    fn choose_secret_field(&mut self, field: &str) {
        let namespace = self
            .selection
            .effective_namespace(self.default_namespace.as_deref())
            .map(str::to_string);
        self.selection.command =
            command::secret_field_command(&self.selection.target, field, namespace.as_deref());
        self.enter_preview();
    }

    fn confirm_flag(&mut self) {
        let index = self.menu.cursor();
        match self.checklist.get(index) {
            Some(ChecklistEntry::Done) => self.finish_flags(),
            Some(ChecklistEntry::Separator) | None => {}
            Some(ChecklistEntry::Flag { .. }) | Some(ChecklistEntry::Namespace { .. }) => {
                self.toggle_flag(index)
            }
        }
    }

    fn finish_flags(&mut self) {
        if self.selection.needs_namespace_input {
            self.enter_text(Screen::NamespaceInput, "");
            return;
        }
        let default_namespace = self.default_namespace.clone();
        if self.selection.build_command(default_namespace.as_deref()).is_some() {
            self.enter_preview();
        }
    }

    pub(super) fn toggle(&mut self) {
        if self.screen == Screen::FlagsSelection {
            self.toggle_flag(self.menu.cursor());
        }
    }

    fn toggle_flag(&mut self, index: usize) {
        if self.checklist.toggle(index, &mut self.selection) {
            if let Some(entry) = self.checklist.get(index) {
                let label = entry.label();
                self.menu.set_label(index, label);
            }
        }
    }

    /// Enter on a text screen. Empty input is ignored.
    fn submit_text(&mut self, jobs: &mut Vec<Job>) {
        let value = self.input_text();
        let value = value.trim();
        match self.screen {
            Screen::NamespaceInput => {
                if !self.selection.set_custom_namespace(value) {
                    return;
                }
                let default_namespace = self.default_namespace.clone();
                if self.selection.build_command(default_namespace.as_deref()).is_some() {
                    self.enter_preview();
                }
            }
            Screen::CustomCommand => {
                if let Some(command) = command::normalize_custom_command(value) {
                    self.selection.command = command;
                    self.enter_preview();
                }
            }
            Screen::SaveFavourite => {
                if value.is_empty() {
                    return;
                }
                let command = self
                    .favourite_draft
                    .clone()
                    .unwrap_or_else(|| self.selection.command.clone());
                let task = Task::AddFavourite {
                    name: value.to_string(),
                    command,
                };
                self.wait("Saving favourite...", task, jobs);
            }
            Screen::RenameFavourite => {
                let Some(index) = self.renaming_favourite else {
                    return;
                };
                if value.is_empty() {
                    return;
                }
                let task = Task::RenameFavourite {
                    index,
                    name: value.to_string(),
                };
                self.wait("Renaming favourite...", task, jobs);
            }
            Screen::SaveOutputName => {
                if value.is_empty() {
                    return;
                }
                let task = Task::SaveOutput {
                    name: value.to_string(),
                    content: self.output.clone(),
                    command: self.selection.command.clone(),
                };
                self.wait("Saving output...", task, jobs);
            }
            Screen::RenameSavedOutput => {
                let Some(old) = self.renaming_base.clone() else {
                    return;
                };
                if value.is_empty() {
                    return;
                }
                let task = Task::RenameGroup {
                    old,
                    new: value.to_string(),
                };
                self.wait("Renaming saved output...", task, jobs);
            }
            _ => {}
        }
    }

    fn open_group(&mut self, base: &str, jobs: &mut Vec<Job>) {
        let Some(group) = self.groups.iter().find(|g| g.base == base) else {
            return;
        };
        let single = match group.versions.as_slice() {
            [only] => Some(only.file_name.clone()),
            _ => None,
        };
        self.selected_base = Some(base.to_string());
        match single {
            Some(file_name) => {
                self.version_index = 0;
                let message = format!("Opening {}...", file_name);
                self.wait(message, Task::ReadSavedOutput { file_name }, jobs);
            }
            None => self.enter_versions(base),
        }
    }

    fn open_version(&mut self, index: usize, jobs: &mut Vec<Job>) {
        let Some(file_name) = self.selected_version_file(index) else {
            return;
        };
        self.version_index = index;
        let message = format!("Opening {}...", file_name);
        self.wait(message, Task::ReadSavedOutput { file_name }, jobs);
    }

    fn selected_version_file(&self, index: usize) -> Option<String> {
        let base = self.selected_base.as_deref()?;
        let group = self.groups.iter().find(|g| g.base == base)?;
        group.versions.get(index).map(|v| v.file_name.clone())
    }

    /// Left/right on the saved output view, wrapping around.
    pub(super) fn cycle_version(&mut self, forward: bool, jobs: &mut Vec<Job>) {
        if self.screen != Screen::SavedOutputView {
            return;
        }
        let Some(base) = self.selected_base.as_deref() else {
            return;
        };
        let count = self
            .groups
            .iter()
            .find(|g| g.base == base)
            .map_or(0, |g| g.versions.len());
        if count < 2 {
            return;
        }
        let index = if forward {
            (self.version_index + 1) % count
        } else {
            (self.version_index + count - 1) % count
        };
        if let Some(file_name) = self.selected_version_file(index) {
            self.version_index = index;
            let message = format!("Opening {}...", file_name);
            self.wait(message, Task::ReadSavedOutput { file_name }, jobs);
        }
    }

    pub(super) fn delete(&mut self, jobs: &mut Vec<Job>) {
        match (self.screen, self.menu.selected_id()) {
            (Screen::FavouritesList, Some(MenuId::Favourite(index))) => {
                self.wait("Deleting favourite...", Task::DeleteFavourite { index }, jobs);
            }
            (Screen::HotkeysList, Some(MenuId::Hotkey(key))) => {
                self.wait(format!("Unbinding {}...", key), Task::UnbindHotkey { key }, jobs);
            }
            (Screen::SavedOutputsList, Some(MenuId::Group(base))) => {
                self.wait(format!("Deleting {}...", base), Task::DeleteGroup { base }, jobs);
            }
            (Screen::SavedOutputVersions, Some(MenuId::Version(index))) => {
                if let Some(file_name) = self.selected_version_file(index) {
                    let message = format!("Deleting {}...", file_name);
                    self.wait(message, Task::DeleteVersion { file_name }, jobs);
                }
            }
            (Screen::SavedOutputView, _) => {
                if let Some(file_name) = self.viewed_file.clone() {
                    let message = format!("Deleting {}...", file_name);
                    self.wait(message, Task::DeleteVersion { file_name }, jobs);
                }
            }
            _ => {}
        }
    }

    pub(super) fn save(&mut self, jobs: &mut Vec<Job>) {
        match (self.screen, self.menu.selected_id()) {
            (Screen::CommandOutput, _) => {
                if self.output.is_empty() {
                    return;
                }
                let task = Task::ResolveArchive {
                    command: self.selection.command.clone(),
                };
                self.wait("Checking saved outputs...", task, jobs);
            }
            (Screen::CommandHistory, Some(MenuId::HistoryEntry(index))) => {
                if let Some(command) = self.history.get(index).map(|h| h.command.clone()) {
                    self.favourite_draft = Some(command);
                    self.enter_text(Screen::SaveFavourite, "");
                }
            }
            _ => {}
        }
    }

    pub(super) fn rename(&mut self) {
        match (self.screen, self.menu.selected_id()) {
            (Screen::FavouritesList, Some(MenuId::Favourite(index))) => {
                if let Some(name) = self.favourites.get(index).map(|f| f.name.clone()) {
                    self.renaming_favourite = Some(index);
                    self.enter_text(Screen::RenameFavourite, &name);
                }
            }
            (Screen::SavedOutputsList, Some(MenuId::Group(base))) => {
                self.renaming_base = Some(base.clone());
                self.enter_text(Screen::RenameSavedOutput, &base);
            }
            (Screen::SavedOutputVersions, _) => {
                if let Some(base) = self.selected_base.clone() {
                    self.renaming_base = Some(base.clone());
                    self.enter_text(Screen::RenameSavedOutput, &base);
                }
            }
            _ => {}
        }
    }

    pub(super) fn start_hotkey_bind(&mut self) {
        if self.screen != Screen::FavouritesList {
            return;
        }
        if let Some(MenuId::Favourite(index)) = self.menu.selected_id() {
            if let Some(fav) = self.favourites.get(index).cloned() {
                self.bind_target = Some(fav);
                self.enter_hotkey_bind();
            }
        }
    }

    pub(super) fn run_hotkey(&mut self, n: u8, jobs: &mut Vec<Job>) {
        let Some(key) = hotkeys::key_for_function(n) else {
            return;
        };
        let task = Task::RunHotkey {
            key: key.to_string(),
        };
        self.wait(format!("Running {}...", key), task, jobs);
    }
}
