//! Command construction: resource kinds, actions, and the pure builder that
//! turns wizard selections into a kubectl command line.

/// Leading token of every command the wizard produces.
pub const TOOL: &str = "kubectl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Pods,
    Deployments,
    Services,
    Nodes,
    ConfigMaps,
    Secrets,
    Ingress,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Pods,
        ResourceKind::Deployments,
        ResourceKind::Services,
        ResourceKind::Nodes,
        ResourceKind::ConfigMaps,
        ResourceKind::Secrets,
        ResourceKind::Ingress,
    ];

    /// Token used by list-style commands (`kubectl get pods`).
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Pods => "pods",
            ResourceKind::Deployments => "deployments",
            ResourceKind::Services => "services",
            ResourceKind::Nodes => "nodes",
            ResourceKind::ConfigMaps => "configmaps",
            ResourceKind::Secrets => "secrets",
            ResourceKind::Ingress => "ingress",
        }
    }

    /// Token used when a single object is addressed (`kubectl describe pod x`).
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Pods => "pod",
            ResourceKind::Deployments => "deployment",
            ResourceKind::Services => "service",
            ResourceKind::Nodes => "node",
            ResourceKind::ConfigMaps => "configmap",
            ResourceKind::Secrets => "secret",
            ResourceKind::Ingress => "ingress",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Pods => "Pods",
            ResourceKind::Deployments => "Deployments",
            ResourceKind::Services => "Services",
            ResourceKind::Nodes => "Nodes",
            ResourceKind::ConfigMaps => "ConfigMaps",
            ResourceKind::Secrets => "Secrets",
            ResourceKind::Ingress => "Ingress",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ResourceKind::Pods => "Running workloads",
            ResourceKind::Deployments => "Replicated pod controllers",
            ResourceKind::Services => "Network endpoints for pods",
            ResourceKind::Nodes => "Cluster machines",
            ResourceKind::ConfigMaps => "Non-secret configuration",
            ResourceKind::Secrets => "Sensitive configuration",
            ResourceKind::Ingress => "External HTTP routing",
        }
    }

    /// Actions offered for this kind, in menu order.
    pub fn actions(self) -> &'static [Action] {
        match self {
            ResourceKind::Pods => &[
                Action::Get,
                Action::Describe,
                Action::Logs,
                Action::Delete,
                Action::Top,
            ],
            ResourceKind::Deployments => {
                &[Action::Get, Action::Describe, Action::Logs, Action::Delete]
            }
            ResourceKind::Nodes => &[Action::Get, Action::Describe, Action::Top],
            ResourceKind::Secrets => &[Action::Get, Action::Describe, Action::ExtractField],
            ResourceKind::Services | ResourceKind::ConfigMaps | ResourceKind::Ingress => {
                &[Action::Get, Action::Describe]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Get,
    Describe,
    Logs,
    Delete,
    Top,
    ExtractField,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Get => "Get",
            Action::Describe => "Describe",
            Action::Logs => "Logs",
            Action::Delete => "Delete",
            Action::Top => "Top",
            Action::ExtractField => "Extract Field",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::Get => "List resources",
            Action::Describe => "Show detailed state of one resource",
            Action::Logs => "Print container logs",
            Action::Delete => "Delete one resource",
            Action::Top => "Show CPU and memory usage",
            Action::ExtractField => "Decode a single field of a secret",
        }
    }

    /// Whether the action addresses a single named object, which means the
    /// wizard has to fetch live names before showing the flags.
    pub fn needs_target(self) -> bool {
        !matches!(self, Action::Get | Action::Top)
    }
}

/// Build the command for a completed selection.
///
/// Flags are appended in order, each after a single space, with no escaping.
pub fn build(resource: ResourceKind, action: Action, name: &str, flags: &[String]) -> String {
    let mut cmd = match action {
        Action::Get => format!("{} get {}", TOOL, resource.plural()),
        Action::Describe => format!("{} describe {}", TOOL, resource.singular()),
        Action::Logs => format!("{} logs", TOOL),
        Action::Delete => format!("{} delete {}", TOOL, resource.singular()),
        Action::Top => format!("{} top {}", TOOL, resource.plural()),
        Action::ExtractField => format!("{} get {}", TOOL, resource.singular()),
    };

    if !name.is_empty() {
        cmd.push(' ');
        match (action, resource) {
            (Action::Logs, ResourceKind::Pods) => cmd.push_str(name),
            (Action::Logs, _) => {
                cmd.push_str(resource.singular());
                cmd.push('/');
                cmd.push_str(name);
            }
            _ => cmd.push_str(name),
        }
    }

    for flag in flags {
        cmd.push(' ');
        cmd.push_str(flag);
    }

    cmd
}

/// True if the flags already pin the namespace, either to all namespaces or
/// to an explicit one.
pub fn has_explicit_namespace(flags: &[String]) -> bool {
    flags.iter().any(|f| {
        f == "-A" || f == "--all-namespaces" || f.starts_with("-n ") || f.starts_with("-n=")
    })
}

/// Append `-n <default>` unless the flags already choose a namespace.
pub fn apply_default_namespace(flags: &mut Vec<String>, default_namespace: Option<&str>) {
    let Some(ns) = default_namespace.map(str::trim).filter(|ns| !ns.is_empty()) else {
        return;
    };
    if !has_explicit_namespace(flags) {
        flags.push(format!("-n {}", ns));
    }
}

/// Turn free-form user input into a kubectl command, or `None` when empty.
pub fn normalize_custom_command(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == TOOL || trimmed.starts_with(&format!("{} ", TOOL)) {
        Some(trimmed.to_string())
    } else {
        Some(format!("{} {}", TOOL, trimmed))
    }
}

fn escape_single_quotes(s: &str) -> String {
    s.replace('\'', r"'\''")
}

/// Go-template expression extracting one secret field.
///
/// Bare keys and unknown paths are treated as `data` keys and base64-decoded.
pub fn secret_field_template(field: &str) -> String {
    let field = field.trim();
    if let Some(key) = field.strip_prefix("data.") {
        return format!("{{{{index .data \"{}\" | base64decode}}}}", key);
    }
    if let Some(key) = field.strip_prefix("stringData.") {
        return format!("{{{{index .stringData \"{}\"}}}}", key);
    }
    if let Some(key) = field.strip_prefix("metadata.labels.") {
        return format!("{{{{index .metadata.labels \"{}\"}}}}", key);
    }
    if let Some(key) = field.strip_prefix("metadata.annotations.") {
        return format!("{{{{index .metadata.annotations \"{}\"}}}}", key);
    }
    match field {
        "metadata.name" => "{{.metadata.name}}".to_string(),
        "metadata.namespace" => "{{.metadata.namespace}}".to_string(),
        "type" | "metadata.type" => "{{.type}}".to_string(),
        key => format!("{{{{index .data \"{}\" | base64decode}}}}", key),
    }
}

/// `kubectl get secret <name> -o go-template='<T>'`, plus the namespace flag.
pub fn secret_field_command(name: &str, field: &str, namespace: Option<&str>) -> String {
    let template = escape_single_quotes(&secret_field_template(field));
    let mut cmd = format!("{} get secret {} -o go-template='{}'", TOOL, name, template);
    if let Some(ns) = namespace.map(str::trim).filter(|ns| !ns.is_empty()) {
        cmd.push_str(" -n ");
        cmd.push_str(ns);
    }
    cmd
}
