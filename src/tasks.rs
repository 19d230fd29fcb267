//! Deferred side effects.
//!
//! The wizard never touches the filesystem or spawns processes itself. It
//! returns [`Job`]s; a [`TaskRunner`] performs them off the event loop and
//! each produces exactly one [`Finished`] carrying the job's id, which is fed
//! back into `Wizard::dispatch`.

use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::cluster::ClusterInfo;
use crate::command::ResourceKind;
use crate::config::Config;
use crate::favourites::{Favourite, FavouritesStore};
use crate::history::{HistoryEntry, HistoryStore};
use crate::hotkeys::{Hotkey, HotkeysStore};
use crate::kubectl::{CommandResult, Kubectl};
use crate::saved_outputs::{ArchiveResult, ArchivedVersion, OutputGroup, SavedOutputs};

/// Errors crossing back into the wizard are already rendered for the status line.
pub type TaskResult<T> = Result<T, String>;

/// Identifies one submitted task so its result can be matched to the
/// request that started it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn next(self) -> Self {
        TaskId(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: TaskId,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub id: TaskId,
    pub completion: Completion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    FetchNames {
        resource: ResourceKind,
        namespace: Option<String>,
    },
    FetchSecretKeys { name: String, namespace: Option<String> },
    Execute { command: String },
    LoadHelp { command: String },
    CheckConnectivity,
    LoadClusterInfo,
    ResolveArchive { command: String },
    SaveOutput { name: String, content: String, command: String },
    LoadSavedOutputs,
    ReadSavedOutput { file_name: String },
    RenameGroup { old: String, new: String },
    DeleteVersion { file_name: String },
    DeleteGroup { base: String },
    LoadFavourites,
    AddFavourite { name: String, command: String },
    DeleteFavourite { index: usize },
    RenameFavourite { index: usize, name: String },
    LoadHistory,
    LoadHotkeys,
    BindHotkey { key: String, name: String, command: String },
    UnbindHotkey { key: String },
    RunHotkey { key: String },
    ListContexts,
    SwitchContext { name: String },
    ListNamespaces,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    NamesLoaded(TaskResult<Vec<String>>),
    SecretKeysLoaded(TaskResult<Vec<String>>),
    Executed(TaskResult<CommandResult>),
    HelpLoaded(TaskResult<CommandResult>),
    ConnectivityChecked(TaskResult<CommandResult>),
    ClusterInfoLoaded(TaskResult<ClusterInfo>),
    ArchiveResolved(TaskResult<Option<String>>),
    OutputSaved(TaskResult<ArchivedVersion>),
    SavedOutputsLoaded(TaskResult<Vec<OutputGroup>>),
    SavedOutputRead {
        file_name: String,
        content: TaskResult<String>,
    },
    GroupRenamed {
        new: String,
        groups: TaskResult<Vec<OutputGroup>>,
    },
    VersionDeleted(TaskResult<Vec<OutputGroup>>),
    GroupDeleted(TaskResult<Vec<OutputGroup>>),
    FavouritesLoaded(TaskResult<Vec<Favourite>>),
    FavouriteAdded(TaskResult<Vec<Favourite>>),
    FavouriteDeleted(TaskResult<Vec<Favourite>>),
    FavouriteRenamed(TaskResult<Vec<Favourite>>),
    HistoryLoaded(TaskResult<Vec<HistoryEntry>>),
    HotkeysLoaded(TaskResult<Vec<Hotkey>>),
    HotkeyBound {
        key: String,
        hotkeys: TaskResult<Vec<Hotkey>>,
    },
    HotkeyUnbound(TaskResult<Vec<Hotkey>>),
    HotkeyRan {
        key: String,
        command: String,
        result: TaskResult<CommandResult>,
    },
    ContextsLoaded(TaskResult<(Vec<String>, Option<String>)>),
    ContextSwitched {
        name: String,
        result: TaskResult<()>,
    },
    NamespacesLoaded(TaskResult<Vec<String>>),
}

fn unavailable(store: &str) -> String {
    format!("{} store unavailable", store)
}

/// Executes tasks against kubectl and the on-disk stores.
///
/// Stores that failed to open are `None`; operations on them fail with a
/// message instead of panicking. Archive operations hold the outputs lock
/// for their whole read-modify-write.
pub struct TaskRunner {
    kubectl: Kubectl,
    outputs: Mutex<SavedOutputs>,
    favourites: Option<Mutex<FavouritesStore>>,
    history: Option<Mutex<HistoryStore>>,
    hotkeys: Option<Mutex<HotkeysStore>>,
}

impl TaskRunner {
    pub fn new(kubectl: Kubectl, outputs: SavedOutputs) -> Self {
        Self {
            kubectl,
            outputs: Mutex::new(outputs),
            favourites: None,
            history: None,
            hotkeys: None,
        }
    }

    pub fn with_favourites(mut self, store: FavouritesStore) -> Self {
        self.favourites = Some(Mutex::new(store));
        self
    }

    pub fn with_history(mut self, store: HistoryStore) -> Self {
        self.history = Some(Mutex::new(store));
        self
    }

    pub fn with_hotkeys(mut self, store: HotkeysStore) -> Self {
        self.hotkeys = Some(Mutex::new(store));
        self
    }

    /// Open every store under the config's base dir. Failures are logged and
    /// leave that store unavailable.
    pub fn open(config: &Config, kubectl: Kubectl) -> Self {
        let mut runner = Self::new(kubectl, SavedOutputs::new(config.saved_outputs_dir.clone()));

        match FavouritesStore::open(config.favourites_path()) {
            Ok(store) => runner = runner.with_favourites(store),
            Err(e) => tracing::warn!(error = %e, "favourites store unavailable"),
        }
        match HistoryStore::open(config.history_path()) {
            Ok(store) => runner = runner.with_history(store),
            Err(e) => tracing::warn!(error = %e, "history store unavailable"),
        }
        match HotkeysStore::open(config.hotkeys_path()) {
            Ok(store) => runner = runner.with_hotkeys(store),
            Err(e) => tracing::warn!(error = %e, "hotkeys store unavailable"),
        }
        runner
    }

    pub fn run(&self, task: Task) -> Completion {
        tracing::debug!(task = ?task, "running task");
        match task {
            Task::FetchNames { resource, namespace } => Completion::NamesLoaded(
                self.kubectl
                    .list_names(resource.plural(), namespace.as_deref())
                    .map_err(|e| e.to_string()),
            ),
            Task::FetchSecretKeys { name, namespace } => Completion::SecretKeysLoaded(
                self.kubectl
                    .secret_keys(&name, namespace.as_deref())
                    .map_err(|e| e.to_string()),
            ),
            Task::Execute { command } => Completion::Executed(self.execute(&command)),
            Task::LoadHelp { command } => {
                let help = help_command(&command);
                Completion::HelpLoaded(self.kubectl.execute_raw(&help).map_err(|e| e.to_string()))
            }
            Task::CheckConnectivity => Completion::ConnectivityChecked(
                self.kubectl
                    .execute_raw("kubectl cluster-info")
                    .map_err(|e| e.to_string()),
            ),
            Task::LoadClusterInfo => {
                Completion::ClusterInfoLoaded(self.kubectl.cluster_info().map_err(|e| e.to_string()))
            }
            Task::ResolveArchive { command } => Completion::ArchiveResolved(
                self.with_outputs(|o| o.resolve_for_command(&command)),
            ),
            Task::SaveOutput {
                name,
                content,
                command,
            } => Completion::OutputSaved(self.with_outputs(|o| o.save(&name, &content, &command))),
            Task::LoadSavedOutputs => Completion::SavedOutputsLoaded(self.with_outputs(|o| o.groups())),
            Task::ReadSavedOutput { file_name } => {
                let content = self.with_outputs(|o| o.read(&file_name));
                Completion::SavedOutputRead { file_name, content }
            }
            Task::RenameGroup { old, new } => {
                let groups = self.with_outputs(|o| {
                    o.rename(&old, &new)?;
                    o.groups()
                });
                let new = crate::saved_outputs::sanitize_name(&new);
                let new = crate::saved_outputs::split_version(&new).0.to_string();
                Completion::GroupRenamed { new, groups }
            }
            Task::DeleteVersion { file_name } => Completion::VersionDeleted(self.with_outputs(|o| {
                o.delete_version(&file_name)?;
                o.groups()
            })),
            Task::DeleteGroup { base } => Completion::GroupDeleted(self.with_outputs(|o| {
                o.delete(&base)?;
                o.groups()
            })),
            Task::LoadFavourites => {
                Completion::FavouritesLoaded(self.with_store(&self.favourites, "Favourites", |s| {
                    Ok(s.list().to_vec())
                }))
            }
            Task::AddFavourite { name, command } => {
                Completion::FavouriteAdded(self.with_store(&self.favourites, "Favourites", |s| {
                    s.add(&name, &command)?;
                    Ok(s.list().to_vec())
                }))
            }
            Task::DeleteFavourite { index } => {
                Completion::FavouriteDeleted(self.with_store(&self.favourites, "Favourites", |s| {
                    s.delete(index)?;
                    Ok(s.list().to_vec())
                }))
            }
            Task::RenameFavourite { index, name } => {
                Completion::FavouriteRenamed(self.with_store(&self.favourites, "Favourites", |s| {
                    s.rename(index, &name)?;
                    Ok(s.list().to_vec())
                }))
            }
            Task::LoadHistory => {
                Completion::HistoryLoaded(self.with_store(&self.history, "History", |s| {
                    Ok(s.entries())
                }))
            }
            Task::LoadHotkeys => {
                Completion::HotkeysLoaded(self.with_store(&self.hotkeys, "Hotkeys", |s| {
                    Ok(s.list().to_vec())
                }))
            }
            Task::BindHotkey { key, name, command } => {
                let hotkeys = self.with_store(&self.hotkeys, "Hotkeys", |s| {
                    s.bind(&key, &name, &command)?;
                    Ok(s.list().to_vec())
                });
                Completion::HotkeyBound {
                    key: key.to_uppercase(),
                    hotkeys,
                }
            }
            Task::UnbindHotkey { key } => {
                Completion::HotkeyUnbound(self.with_store(&self.hotkeys, "Hotkeys", |s| {
                    if !s.unbind(&key)? {
                        anyhow::bail!("No command bound to {}", key.to_uppercase());
                    }
                    Ok(s.list().to_vec())
                }))
            }
            Task::RunHotkey { key } => {
                let binding = self.with_store(&self.hotkeys, "Hotkeys", |s| {
                    s.get(&key)
                        .cloned()
                        .ok_or_else(|| anyhow::anyhow!("No command bound to {}", key.to_uppercase()))
                });
                match binding {
                    Ok(hotkey) => Completion::HotkeyRan {
                        key: hotkey.key,
                        result: self.execute(&hotkey.command),
                        command: hotkey.command,
                    },
                    Err(e) => Completion::HotkeyRan {
                        key: key.to_uppercase(),
                        command: String::new(),
                        result: Err(e),
                    },
                }
            }
            Task::ListContexts => Completion::ContextsLoaded(
                self.kubectl
                    .list_contexts()
                    .map(|names| (names, self.kubectl.current_context().ok()))
                    .map_err(|e| e.to_string()),
            ),
            Task::SwitchContext { name } => {
                let result = self.kubectl.use_context(&name).map_err(|e| e.to_string());
                Completion::ContextSwitched { name, result }
            }
            Task::ListNamespaces => {
                Completion::NamespacesLoaded(self.kubectl.list_namespaces().map_err(|e| e.to_string()))
            }
        }
    }

    /// Run a user command and record it in history on success.
    fn execute(&self, command: &str) -> TaskResult<CommandResult> {
        tracing::debug!(command, "executing");
        let result = self.kubectl.execute_raw(command).map_err(|e| e.to_string())?;
        if let Some(history) = &self.history {
            // History is best-effort: failures never reach the user.
            if let Ok(mut store) = history.lock() {
                let _ = store.add(command);
            }
        }
        Ok(result)
    }

    fn with_outputs<T>(
        &self,
        f: impl FnOnce(&SavedOutputs) -> ArchiveResult<T>,
    ) -> TaskResult<T> {
        let outputs = self.outputs.lock().map_err(|_| unavailable("Saved outputs"))?;
        f(&outputs).map_err(|e| e.to_string())
    }

    fn with_store<S, T>(
        &self,
        store: &Option<Mutex<S>>,
        name: &str,
        f: impl FnOnce(&mut S) -> anyhow::Result<T>,
    ) -> TaskResult<T> {
        let store = store.as_ref().ok_or_else(|| unavailable(name))?;
        let mut guard = store.lock().map_err(|_| unavailable(name))?;
        f(&mut *guard).map_err(|e| e.to_string())
    }
}

/// `<command> --help`, defaulting to plain `kubectl --help`.
pub fn help_command(command: &str) -> String {
    let command = command.trim();
    let command = if command.is_empty() { "kubectl" } else { command };
    if command.ends_with(" --help") {
        command.to_string()
    } else {
        format!("{} --help", command)
    }
}

/// Submits jobs to the blocking pool and hands results back to the event
/// loop.
pub struct TaskQueue {
    runner: Arc<TaskRunner>,
    handle: Handle,
    tx: mpsc::UnboundedSender<Finished>,
    rx: mpsc::UnboundedReceiver<Finished>,
    in_flight: usize,
}

impl TaskQueue {
    pub fn new(runner: Arc<TaskRunner>, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runner,
            handle,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn submit(&mut self, job: Job) {
        let runner = Arc::clone(&self.runner);
        let tx = self.tx.clone();
        self.in_flight += 1;
        self.handle.spawn_blocking(move || {
            let completion = runner.run(job.task);
            let _ = tx.send(Finished { id: job.id, completion });
        });
    }

    pub fn submit_all(&mut self, jobs: impl IntoIterator<Item = Job>) {
        for job in jobs {
            self.submit(job);
        }
    }

    /// Next finished job without waiting.
    pub fn try_next(&mut self) -> Option<Finished> {
        let finished = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(finished)
    }

    /// Wait for the next finished job.
    pub async fn next(&mut self) -> Option<Finished> {
        let finished = self.rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(finished)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
