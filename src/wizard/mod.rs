//! The wizard state machine.
//!
//! A [`Wizard`] is threaded through the event loop by value:
//! [`Wizard::dispatch`] consumes the current state and an [`Event`], and
//! returns the next state plus the [`Job`]s to run. Results come back as
//! [`Event::Completed`] tagged with the id of the job that produced them.

mod completions;
mod handlers;
mod menu;
mod navigation;
mod screen;

use tui_textarea::{CursorMove, Input, TextArea};

use crate::favourites::Favourite;
use crate::flags::FlagChecklist;
use crate::history::HistoryEntry;
use crate::hotkeys::Hotkey;
use crate::saved_outputs::OutputGroup;
use crate::selection::Selection;
use crate::tasks::{Finished, Job, Task, TaskId};

pub use menu::{Menu, MenuId, MenuItem};
pub use screen::Screen;

#[derive(Debug, Clone)]
pub enum Event {
    Confirm,
    Back,
    /// Go to the main menu, or quit when already there.
    Home,
    Toggle,
    Up,
    Down,
    PageUp,
    PageDown,
    /// Previous / next archived version.
    Prev,
    Next,
    Delete,
    Save,
    Rename,
    BindHotkey,
    FunctionKey(u8),
    Input(Input),
    Completed(Finished),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

/// Scrollable text for output-style screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub content: String,
    pub scroll: u16,
}

impl Viewport {
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scrolling is capped at the last line; the renderer clamps further to
    /// the wrapped height.
    pub fn scroll_down(&mut self, lines: u16) {
        let max = u16::try_from(self.content.lines().count().saturating_sub(1)).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(lines).min(max);
    }
}

/// The one job whose result the current screen is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    id: TaskId,
    message: String,
}

pub struct Wizard {
    screen: Screen,
    previous: Screen,
    selection: Selection,
    menu: Menu,
    checklist: FlagChecklist,
    input: TextArea<'static>,
    viewport: Viewport,
    status: Option<Status>,
    /// Set while a task this screen is waiting on is in flight.
    pending: Option<Pending>,
    last_id: TaskId,
    default_namespace: Option<String>,
    current_context: Option<String>,
    /// Output of the last executed command, as shown.
    output: String,
    /// Names from the last fetch, so the name list can be rebuilt on back.
    names: Vec<String>,
    secret_keys: Vec<String>,
    groups: Vec<OutputGroup>,
    selected_base: Option<String>,
    version_index: usize,
    viewed_file: Option<String>,
    renaming_base: Option<String>,
    favourites: Vec<Favourite>,
    history: Vec<HistoryEntry>,
    hotkeys: Vec<Hotkey>,
    favourite_draft: Option<String>,
    renaming_favourite: Option<usize>,
    bind_target: Option<Favourite>,
    should_quit: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Wizard {
    pub fn new(default_namespace: Option<String>) -> Self {
        let mut wizard = Self {
            screen: Screen::MainMenu,
            previous: Screen::MainMenu,
            selection: Selection::default(),
            menu: Menu::default(),
            checklist: FlagChecklist::default(),
            input: TextArea::default(),
            viewport: Viewport::default(),
            status: None,
            pending: None,
            last_id: TaskId::default(),
            default_namespace: default_namespace.filter(|ns| !ns.trim().is_empty()),
            current_context: None,
            output: String::new(),
            names: Vec::new(),
            secret_keys: Vec::new(),
            groups: Vec::new(),
            selected_base: None,
            version_index: 0,
            viewed_file: None,
            renaming_base: None,
            favourites: Vec::new(),
            history: Vec::new(),
            hotkeys: Vec::new(),
            favourite_draft: None,
            renaming_favourite: None,
            bind_target: None,
            should_quit: false,
        };
        wizard.enter_main_menu();
        wizard
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn previous_screen(&self) -> Screen {
        self.previous
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn checklist(&self) -> &FlagChecklist {
        &self.checklist
    }

    pub fn input(&self) -> &TextArea<'static> {
        &self.input
    }

    /// Mutable access for styling the text field before rendering.
    pub fn input_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.input
    }

    pub fn input_text(&self) -> String {
        self.input.lines().join("")
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.message.as_str())
    }

    /// Id of the job the current screen is waiting for.
    pub fn pending_task(&self) -> Option<TaskId> {
        self.pending.as_ref().map(|p| p.id)
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn groups(&self) -> &[OutputGroup] {
        &self.groups
    }

    pub fn selected_base(&self) -> Option<&str> {
        self.selected_base.as_deref()
    }

    pub fn viewed_file(&self) -> Option<&str> {
        self.viewed_file.as_deref()
    }

    pub fn favourites(&self) -> &[Favourite] {
        &self.favourites
    }

    pub fn hotkeys(&self) -> &[Hotkey] {
        &self.hotkeys
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Advance the state machine by one event.
    pub fn dispatch(mut self, event: Event) -> (Self, Vec<Job>) {
        let mut jobs = Vec::new();
        match event {
            Event::Completed(Finished { id, completion }) => self.complete(id, completion, &mut jobs),
            Event::Home => {
                if self.screen == Screen::MainMenu {
                    self.should_quit = true;
                } else {
                    self.enter_main_menu();
                }
            }
            Event::Back => self.back(),
            Event::Up => self.move_up(1),
            Event::Down => self.move_down(1),
            Event::PageUp => self.move_up(10),
            Event::PageDown => self.move_down(10),
            Event::Input(input) => {
                if self.screen.is_text_input() {
                    self.input.input(input);
                }
            }
            // Everything below may start work; one task per user action.
            _ if self.pending.is_some() => {}
            Event::Confirm => self.confirm(&mut jobs),
            Event::Toggle => self.toggle(),
            Event::Prev => self.cycle_version(false, &mut jobs),
            Event::Next => self.cycle_version(true, &mut jobs),
            Event::Delete => self.delete(&mut jobs),
            Event::Save => self.save(&mut jobs),
            Event::Rename => self.rename(),
            Event::BindHotkey => self.start_hotkey_bind(),
            Event::FunctionKey(n) => {
                if !self.screen.is_text_input() {
                    self.run_hotkey(n, &mut jobs);
                }
            }
        }
        (self, jobs)
    }

    fn move_up(&mut self, lines: u16) {
        if self.screen.is_viewport() {
            self.viewport.scroll_up(lines);
        } else if !self.screen.is_text_input() {
            self.menu.previous();
        }
    }

    fn move_down(&mut self, lines: u16) {
        if self.screen.is_viewport() {
            self.viewport.scroll_down(lines);
        } else if !self.screen.is_text_input() {
            self.menu.next();
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            kind,
        });
    }

    fn info(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Info, text);
    }

    fn success(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Success, text);
    }

    fn error(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Error, text);
    }

    fn next_id(&mut self) -> TaskId {
        self.last_id = self.last_id.next();
        self.last_id
    }

    /// Queue `task` and mark the current screen as waiting on it.
    fn wait(&mut self, message: impl Into<String>, task: Task, jobs: &mut Vec<Job>) {
        let message = message.into();
        let id = self.next_id();
        self.info(message.clone());
        self.pending = Some(Pending { id, message });
        jobs.push(Job { id, task });
    }

    /// Queue `task` without blocking the screen.
    fn spawn(&mut self, task: Task, jobs: &mut Vec<Job>) {
        let id = self.next_id();
        jobs.push(Job { id, task });
    }

    /// Clear the waiting marker if `id` is the job being waited on. Returns
    /// false otherwise, which means the user navigated away or started other
    /// work and the result must not move screens.
    fn finish_wait(&mut self, id: TaskId) -> bool {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            return false;
        }
        self.pending = None;
        self.status = None;
        true
    }

    fn reset_input(&mut self, value: &str) {
        let mut input = TextArea::new(vec![value.to_string()]);
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.move_cursor(CursorMove::End);
        self.input = input;
    }
}
