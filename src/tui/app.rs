use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tui_textarea::Input;

use kube_wizard::config::Config;
use kube_wizard::kubectl::Kubectl;
use kube_wizard::tasks::{TaskQueue, TaskRunner};
use kube_wizard::wizard::{Event as WizardEvent, Wizard};

use super::ui;

/// Poll interval while a task is running, so results show up promptly.
const BUSY_POLL: Duration = Duration::from_millis(100);
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct App {
    pub wizard: Wizard,
    queue: TaskQueue,
}

impl App {
    pub fn new(wizard: Wizard, queue: TaskQueue) -> Self {
        Self { wizard, queue }
    }

    fn dispatch(&mut self, event: WizardEvent) {
        let wizard = std::mem::take(&mut self.wizard);
        let (wizard, jobs) = wizard.dispatch(event);
        self.wizard = wizard;
        if !jobs.is_empty() {
            tracing::debug!(count = jobs.len(), screen = ?self.wizard.screen(), "submitting jobs");
        }
        self.queue.submit_all(jobs);
    }

    /// Feed every finished job back into the wizard.
    fn drain_completions(&mut self) {
        while let Some(finished) = self.queue.try_next() {
            self.dispatch(WizardEvent::Completed(finished));
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        let mapped = if self.wizard.screen().is_text_input() {
            map_text_key(key, event)
        } else {
            map_key(key)
        };
        if let Some(event) = mapped {
            self.dispatch(event);
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Text screens send everything except Enter/Esc/Ctrl+C to the text field.
fn map_text_key(key: KeyEvent, event: Event) -> Option<WizardEvent> {
    if is_ctrl_c(&key) {
        return Some(WizardEvent::Home);
    }
    match key.code {
        KeyCode::Enter => Some(WizardEvent::Confirm),
        KeyCode::Esc => Some(WizardEvent::Back),
        _ => Some(WizardEvent::Input(Input::from(event))),
    }
}

fn map_key(key: KeyEvent) -> Option<WizardEvent> {
    if is_ctrl_c(&key) {
        return Some(WizardEvent::Home);
    }
    let event = match key.code {
        KeyCode::Char('q') => WizardEvent::Home,
        KeyCode::Enter => WizardEvent::Confirm,
        KeyCode::Esc | KeyCode::Backspace => WizardEvent::Back,
        KeyCode::Char(' ') => WizardEvent::Toggle,
        KeyCode::Char('k') | KeyCode::Up => WizardEvent::Up,
        KeyCode::Char('j') | KeyCode::Down => WizardEvent::Down,
        KeyCode::PageUp => WizardEvent::PageUp,
        KeyCode::PageDown => WizardEvent::PageDown,
        KeyCode::Left | KeyCode::Char('[') => WizardEvent::Prev,
        KeyCode::Right | KeyCode::Char(']') => WizardEvent::Next,
        KeyCode::Char('d') => WizardEvent::Delete,
        KeyCode::Char('s') => WizardEvent::Save,
        KeyCode::Char('r') => WizardEvent::Rename,
        KeyCode::Char('h') => WizardEvent::BindHotkey,
        KeyCode::F(n) => WizardEvent::FunctionKey(n),
        _ => return None,
    };
    Some(event)
}

pub fn run_tui(config: Config, kubectl: Kubectl) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let runner = Arc::new(TaskRunner::open(&config, kubectl));
    let queue = TaskQueue::new(runner, runtime.handle().clone());
    let mut app = App::new(Wizard::new(config.default_namespace.clone()), queue);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Don't wait on a kubectl call that is still running
    drop(app);
    runtime.shutdown_background();

    tracing::debug!("exiting TUI");
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &mut app.wizard))?;

        let timeout = if app.wizard.pending().is_some() || app.queue.in_flight() > 0 {
            BUSY_POLL
        } else {
            IDLE_POLL
        };
        if event::poll(timeout)? {
            app.handle_event(event::read()?);
        }
        app.drain_completions();

        if app.wizard.should_quit() {
            return Ok(());
        }
    }
}
