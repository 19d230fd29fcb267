//! Flag checklist shown after a resource and action are chosen.

use crate::command::Action;
use crate::selection::Selection;

/// Display text of the reserved namespace entry.
pub const NAMESPACE_LABEL: &str = "-n <namespace>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistEntry {
    /// Confirms the checklist; never stored as a flag.
    Done,
    Separator,
    Flag { token: String, checked: bool },
    /// Asks for a namespace value instead of storing a literal flag.
    Namespace { checked: bool },
}

fn marker(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

impl ChecklistEntry {
    pub fn label(&self) -> String {
        match self {
            ChecklistEntry::Done => "Done (Continue)".to_string(),
            ChecklistEntry::Separator => "───".to_string(),
            ChecklistEntry::Flag { token, checked } => format!("{} {}", marker(*checked), token),
            ChecklistEntry::Namespace { checked } => {
                format!("{} {}", marker(*checked), NAMESPACE_LABEL)
            }
        }
    }

    pub fn is_checked(&self) -> bool {
        match self {
            ChecklistEntry::Flag { checked, .. } | ChecklistEntry::Namespace { checked } => *checked,
            ChecklistEntry::Done | ChecklistEntry::Separator => false,
        }
    }
}

/// Flags offered per action, in display order. The namespace entry is added
/// separately.
pub fn flags_for(action: Action) -> &'static [&'static str] {
    match action {
        Action::Get => &["-o wide", "-o yaml", "-o json", "--show-labels", "-A"],
        Action::Describe => &["--show-events=true"],
        Action::Logs => &[
            "-f",
            "--tail=100",
            "--tail=50",
            "--since=1h",
            "--since=5m",
            "--previous",
        ],
        Action::Delete => &["--grace-period=0", "--force", "--wait=false"],
        Action::Top => &["--containers", "-A", "--sort-by=cpu", "--sort-by=memory"],
        Action::ExtractField => &[],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagChecklist {
    entries: Vec<ChecklistEntry>,
}

impl FlagChecklist {
    pub fn for_action(action: Action) -> Self {
        let mut entries = vec![ChecklistEntry::Done, ChecklistEntry::Separator];
        entries.extend(flags_for(action).iter().map(|token| ChecklistEntry::Flag {
            token: token.to_string(),
            checked: false,
        }));
        entries.push(ChecklistEntry::Namespace { checked: false });
        Self { entries }
    }

    pub fn entries(&self) -> &[ChecklistEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ChecklistEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(ChecklistEntry::label).collect()
    }

    /// Toggle the entry at `index`, mirroring the change into `selection`.
    ///
    /// Returns false for entries that do not toggle (done, separator, out of
    /// range).
    pub fn toggle(&mut self, index: usize, selection: &mut Selection) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        match entry {
            ChecklistEntry::Done | ChecklistEntry::Separator => false,
            ChecklistEntry::Flag { token, checked } => {
                if *checked {
                    selection.remove_flag(token);
                } else {
                    selection.add_flag(token.clone());
                }
                *checked = !*checked;
                true
            }
            ChecklistEntry::Namespace { checked } => {
                *checked = !*checked;
                selection.needs_namespace_input = *checked;
                if !*checked {
                    selection.custom_namespace.clear();
                    selection.remove_namespace_flag();
                }
                true
            }
        }
    }
}
