use crate::command::{self, Action, ResourceKind};

/// The wizard's in-progress choices for one flow.
///
/// Reset to `Default` whenever a new top-level flow starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub resource: Option<ResourceKind>,
    pub action: Option<Action>,
    pub target: String,
    flags: Vec<String>,
    pub custom_namespace: String,
    pub needs_namespace_input: bool,
    pub command: String,
}

impl Selection {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Selected flags in the order they were picked.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Add a flag unless already present. Returns whether it was added.
    pub fn add_flag(&mut self, flag: impl Into<String>) -> bool {
        let flag = flag.into();
        if self.has_flag(&flag) {
            return false;
        }
        self.flags.push(flag);
        true
    }

    pub fn remove_flag(&mut self, flag: &str) -> bool {
        let before = self.flags.len();
        self.flags.retain(|f| f != flag);
        self.flags.len() != before
    }

    /// Remove the first namespace flag (`-n x` or `-n=x`), leaving every other
    /// flag in place.
    pub fn remove_namespace_flag(&mut self) -> Option<String> {
        let idx = self
            .flags
            .iter()
            .position(|f| f.starts_with("-n ") || f.starts_with("-n="))?;
        Some(self.flags.remove(idx))
    }

    /// Clear everything the flags screen owns.
    pub fn reset_flags(&mut self) {
        self.flags.clear();
        self.custom_namespace.clear();
        self.needs_namespace_input = false;
    }

    /// Record a namespace typed by the user as a regular `-n` flag.
    pub fn set_custom_namespace(&mut self, namespace: &str) -> bool {
        let namespace = namespace.trim();
        if namespace.is_empty() {
            return false;
        }
        self.remove_namespace_flag();
        self.custom_namespace = namespace.to_string();
        self.needs_namespace_input = false;
        self.flags.push(format!("-n {}", namespace));
        true
    }

    /// The namespace commands in this flow run against, if one is pinned.
    pub fn effective_namespace<'a>(&'a self, default_namespace: Option<&'a str>) -> Option<&'a str> {
        if !self.custom_namespace.is_empty() {
            return Some(self.custom_namespace.as_str());
        }
        if command::has_explicit_namespace(&self.flags) {
            return None;
        }
        default_namespace.filter(|ns| !ns.trim().is_empty())
    }

    /// Assemble the command from the accumulated choices, injecting the
    /// default namespace when nothing else picked one.
    pub fn build_command(&mut self, default_namespace: Option<&str>) -> Option<&str> {
        let resource = self.resource?;
        let action = self.action?;
        command::apply_default_namespace(&mut self.flags, default_namespace);
        self.command = command::build(resource, action, &self.target, &self.flags);
        Some(&self.command)
    }
}
