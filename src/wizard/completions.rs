use crate::kubectl::{self, CommandResult};
use crate::saved_outputs;
use crate::tasks::{Completion, Job, Task, TaskId};

use super::{Screen, Wizard};

impl Wizard {
    /// Apply a finished job. Results that would change screen are dropped
    /// unless `id` is the job the screen is waiting on; store updates always
    /// apply.
    pub(super) fn complete(&mut self, id: TaskId, completion: Completion, jobs: &mut Vec<Job>) {
        match completion {
            Completion::NamesLoaded(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok(names) => {
                        self.names = names;
                        self.enter_target_selection();
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::SecretKeysLoaded(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok(keys) => {
                        self.secret_keys = keys;
                        self.enter_secret_fields();
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::Executed(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok(result) => self.show_output(&result),
                    Err(e) => self.error(e),
                }
            }
            Completion::HelpLoaded(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok(result) => self.enter_output(Screen::CommandHelp, result.render("Help Output")),
                    Err(e) => self.error(e),
                }
            }
            Completion::ConnectivityChecked(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                let report = match result {
                    Ok(result) => kubectl::connectivity_report(&result),
                    Err(e) => format!("❌ Cluster is not reachable\n\n{}", e),
                };
                self.enter_output(Screen::ClusterConnectivity, report);
            }
            Completion::ClusterInfoLoaded(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                let report = match result {
                    Ok(info) => info.render(),
                    Err(e) => format!("❌ Unable to load cluster information\n\n{}", e),
                };
                self.enter_output(Screen::ClusterInfo, report);
            }
            Completion::ArchiveResolved(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok(Some(base)) => {
                        let task = Task::SaveOutput {
                            name: base.clone(),
                            content: self.output.clone(),
                            command: self.selection.command.clone(),
                        };
                        self.wait(format!("Saving output to {}...", base), task, jobs);
                    }
                    Ok(None) => {
                        let suggested = saved_outputs::suggest_base(&self.selection.command);
                        self.enter_text(Screen::SaveOutputName, &suggested);
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::OutputSaved(result) => {
                let waited = self.finish_wait(id);
                match result {
                    Ok(saved) => {
                        if waited && self.screen == Screen::SaveOutputName {
                            self.go(Screen::CommandOutput);
                        }
                        self.success(format!("Output saved as {}", saved.file_name));
                    }
                    Err(e) => self.error(format!("Failed to save output: {}", e)),
                }
            }
            Completion::SavedOutputsLoaded(result) => match result {
                Ok(groups) => {
                    self.groups = groups;
                    match self.screen {
                        Screen::SavedOutputsList => self.enter_groups(),
                        Screen::SavedOutputVersions => {
                            if let Some(base) = self.selected_base.clone() {
                                self.enter_versions(&base);
                            }
                        }
                        _ => {}
                    }
                }
                Err(e) => self.error(e),
            },
            Completion::SavedOutputRead { file_name, content } => {
                if !self.finish_wait(id) {
                    return;
                }
                match content {
                    Ok(content) => {
                        if let Some(index) = self.version_position(&file_name) {
                            self.version_index = index;
                        }
                        self.viewed_file = Some(file_name);
                        if self.screen == Screen::SavedOutputView {
                            self.viewport.set_content(content);
                        } else {
                            self.enter_output(Screen::SavedOutputView, content);
                        }
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::GroupRenamed { new, groups } => {
                let waited = self.finish_wait(id);
                match groups {
                    Ok(groups) => {
                        self.groups = groups;
                        let from_versions = self.previous == Screen::SavedOutputVersions;
                        self.renaming_base = None;
                        self.selected_base = Some(new.clone());
                        if waited {
                            if from_versions {
                                self.enter_versions(&new);
                            } else {
                                self.enter_groups();
                            }
                        }
                        self.success(format!("Renamed to {}", new));
                    }
                    Err(e) => self.error(format!("Rename failed: {}", e)),
                }
            }
            Completion::VersionDeleted(result) => {
                let waited = self.finish_wait(id);
                match result {
                    Ok(groups) => {
                        self.groups = groups;
                        self.viewed_file = None;
                        self.version_index = 0;
                        if waited {
                            match self.selected_base.clone() {
                                Some(base) if self.groups.iter().any(|g| g.base == base) => {
                                    self.enter_versions(&base)
                                }
                                _ => {
                                    self.selected_base = None;
                                    self.enter_groups();
                                }
                            }
                        }
                        self.success("Saved output deleted");
                    }
                    Err(e) => self.error(format!("Delete failed: {}", e)),
                }
            }
            Completion::GroupDeleted(result) => {
                let waited = self.finish_wait(id);
                match result {
                    Ok(groups) => {
                        self.groups = groups;
                        self.selected_base = None;
                        if waited {
                            self.enter_groups();
                        }
                        self.success("Saved output group deleted");
                    }
                    Err(e) => self.error(format!("Delete failed: {}", e)),
                }
            }
            Completion::FavouritesLoaded(result) => match result {
                Ok(favourites) => {
                    self.favourites = favourites;
                    if self.screen == Screen::FavouritesList {
                        self.enter_favourites();
                    }
                }
                Err(e) => self.error(e),
            },
            Completion::FavouriteAdded(result) => {
                let waited = self.finish_wait(id);
                match result {
                    Ok(favourites) => {
                        self.favourites = favourites;
                        self.favourite_draft = None;
                        if waited {
                            self.enter_favourites();
                        }
                        self.success("Favourite saved");
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::FavouriteDeleted(result) => {
                self.finish_wait(id);
                match result {
                    Ok(favourites) => {
                        self.favourites = favourites;
                        if self.screen == Screen::FavouritesList {
                            self.enter_favourites();
                        }
                        self.success("Favourite deleted");
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::FavouriteRenamed(result) => {
                let waited = self.finish_wait(id);
                match result {
                    Ok(favourites) => {
                        self.favourites = favourites;
                        self.renaming_favourite = None;
                        if waited {
                            self.enter_favourites();
                        }
                        self.success("Favourite renamed");
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::HistoryLoaded(result) => match result {
                Ok(history) => {
                    self.history = history;
                    if self.screen == Screen::CommandHistory {
                        self.enter_history();
                    }
                }
                Err(e) => self.error(e),
            },
            Completion::HotkeysLoaded(result) => match result {
                Ok(hotkeys) => {
                    self.hotkeys = hotkeys;
                    match self.screen {
                        Screen::HotkeysList => self.enter_hotkeys(),
                        Screen::HotkeyBind => self.enter_hotkey_bind(),
                        _ => {}
                    }
                }
                Err(e) => self.error(e),
            },
            Completion::HotkeyBound { key, hotkeys } => {
                let waited = self.finish_wait(id);
                match hotkeys {
                    Ok(hotkeys) => {
                        self.hotkeys = hotkeys;
                        let name = self.bind_target.take().map(|f| f.name).unwrap_or_default();
                        if waited {
                            self.enter_hotkeys();
                        }
                        self.success(format!("Bound {} to {}", key, name));
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::HotkeyUnbound(result) => {
                self.finish_wait(id);
                match result {
                    Ok(hotkeys) => {
                        self.hotkeys = hotkeys;
                        if self.screen == Screen::HotkeysList {
                            self.enter_hotkeys();
                        }
                        self.success("Hotkey removed");
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::HotkeyRan { key, command, result } => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok(result) => {
                        self.selection.reset();
                        self.selection.command = command;
                        self.show_output(&result);
                        self.info(format!("Ran {}", key));
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::ContextsLoaded(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok((contexts, current)) => {
                        self.current_context = current;
                        self.enter_contexts_list(&contexts);
                    }
                    Err(e) => self.error(format!("Unable to load contexts: {}", e)),
                }
            }
            Completion::ContextSwitched { name, result } => {
                let waited = self.finish_wait(id);
                match result {
                    Ok(()) => {
                        self.current_context = Some(name.clone());
                        if waited {
                            self.enter_contexts_menu();
                        }
                        self.success(format!("Switched to context {}", name));
                    }
                    Err(e) => self.error(e),
                }
            }
            Completion::NamespacesLoaded(result) => {
                if !self.finish_wait(id) {
                    return;
                }
                match result {
                    Ok(namespaces) => self.enter_namespaces_list(&namespaces),
                    Err(e) => self.error(format!("Unable to load namespaces: {}", e)),
                }
            }
        }
    }

    fn show_output(&mut self, result: &CommandResult) {
        self.output = result.render("Output");
        let output = self.output.clone();
        self.enter_output(Screen::CommandOutput, output);
    }

    fn version_position(&self, file_name: &str) -> Option<usize> {
        let base = self.selected_base.as_deref()?;
        self.groups
            .iter()
            .find(|g| g.base == base)?
            .versions
            .iter()
            .position(|v| v.file_name == file_name)
    }
}
