//! Cluster overview: node inventory and resource totals.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::kubectl::KubectlError;

const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    /// `Ready`, `NotReady` or `Unknown` when the node reports no Ready condition.
    pub status: String,
    pub roles: String,
    pub internal_ip: Option<String>,
    pub version: String,
    pub cpu_capacity: String,
    pub cpu_allocatable: String,
    pub memory_capacity: String,
    pub memory_allocatable: String,
    pub pod_capacity: String,
}

impl NodeInfo {
    pub fn is_ready(&self) -> bool {
        self.status == "Ready"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterInfo {
    pub context: String,
    pub version: Option<String>,
    pub nodes: Vec<NodeInfo>,
    pub total_cpu: String,
    pub allocatable_cpu: String,
    pub total_memory: String,
    pub allocatable_memory: String,
    pub total_pods: Option<usize>,
    pub namespace_count: Option<usize>,
}

impl ClusterInfo {
    /// Build the summary from parsed nodes. Unparseable quantities are
    /// left out of the totals.
    pub fn from_nodes(context: impl Into<String>, nodes: Vec<NodeInfo>) -> Self {
        let sum = |field: fn(&NodeInfo) -> &str| -> f64 {
            nodes
                .iter()
                .filter_map(|n| parse_quantity(field(n)))
                .fold(0.0, |total, q| total + q)
        };
        Self {
            context: context.into(),
            total_cpu: format_cpu(sum(|n| n.cpu_capacity.as_str())),
            allocatable_cpu: format_cpu(sum(|n| n.cpu_allocatable.as_str())),
            total_memory: format_memory(sum(|n| n.memory_capacity.as_str())),
            allocatable_memory: format_memory(sum(|n| n.memory_allocatable.as_str())),
            nodes,
            ..Self::default()
        }
    }

    pub fn ready_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_ready()).count()
    }

    /// Text for the cluster info viewport.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Cluster Overview\n");
        out.push_str(&format!("  Context:     {}\n", self.context));
        if let Some(version) = &self.version {
            out.push_str(&format!("  Version:     {}\n", version));
        }

        out.push_str("\nSummary\n");
        out.push_str(&format!(
            "  Nodes:       {} total, {} ready\n",
            self.nodes.len(),
            self.ready_nodes()
        ));
        out.push_str(&format!("  Namespaces:  {}\n", count_or_unknown(self.namespace_count)));
        out.push_str(&format!("  Pods:        {}\n", count_or_unknown(self.total_pods)));

        out.push_str("\nResources\n");
        out.push_str(&format!(
            "  CPU:         {} (allocatable: {})\n",
            self.total_cpu, self.allocatable_cpu
        ));
        out.push_str(&format!(
            "  Memory:      {} (allocatable: {})\n",
            self.total_memory, self.allocatable_memory
        ));

        if !self.nodes.is_empty() {
            out.push_str("\nNodes\n");
        }
        for node in &self.nodes {
            let icon = if node.is_ready() { "✅" } else { "❌" };
            out.push_str(&format!("\n{} {}\n", icon, node.name));
            out.push_str(&format!("  Status:      {}\n", node.status));
            out.push_str(&format!("  Roles:       {}\n", node.roles));
            if let Some(ip) = &node.internal_ip {
                out.push_str(&format!("  Internal IP: {}\n", ip));
            }
            out.push_str(&format!("  Version:     {}\n", node.version));
            out.push_str(&format!(
                "  CPU:         {} (allocatable: {})\n",
                node.cpu_capacity, node.cpu_allocatable
            ));
            out.push_str(&format!(
                "  Memory:      {} (allocatable: {})\n",
                node.memory_capacity, node.memory_allocatable
            ));
            out.push_str(&format!("  Max pods:    {}\n", node.pod_capacity));
        }
        out
    }
}

fn count_or_unknown(count: Option<usize>) -> String {
    count.map_or_else(|| "unknown".to_string(), |n| n.to_string())
}

#[derive(Deserialize)]
struct NodeList {
    #[serde(default)]
    items: Vec<NodeItem>,
}

#[derive(Deserialize)]
struct NodeItem {
    metadata: NodeMeta,
    #[serde(default)]
    status: NodeStatus,
}

#[derive(Deserialize)]
struct NodeMeta {
    name: String,
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct NodeStatus {
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    addresses: Vec<Address>,
    #[serde(default)]
    capacity: Resources,
    #[serde(default)]
    allocatable: Resources,
    #[serde(default)]
    node_info: KubeletInfo,
}

#[derive(Deserialize)]
struct Condition {
    #[serde(rename = "type")]
    kind: String,
    status: String,
}

#[derive(Deserialize)]
struct Address {
    #[serde(rename = "type")]
    kind: String,
    address: String,
}

#[derive(Deserialize, Default)]
struct Resources {
    #[serde(default)]
    cpu: String,
    #[serde(default)]
    memory: String,
    #[serde(default)]
    pods: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct KubeletInfo {
    #[serde(default)]
    kubelet_version: String,
}

/// Parse `kubectl get nodes -o json`.
pub fn parse_nodes(json: &str) -> Result<Vec<NodeInfo>, KubectlError> {
    let list: NodeList = serde_json::from_str(json)
        .map_err(|e| KubectlError::Parse(format!("nodes: {}", e)))?;
    Ok(list.items.into_iter().map(node_info).collect())
}

fn node_info(item: NodeItem) -> NodeInfo {
    let status = item
        .status
        .conditions
        .iter()
        .find(|c| c.kind == "Ready")
        .map(|c| if c.status == "True" { "Ready" } else { "NotReady" })
        .unwrap_or("Unknown")
        .to_string();
    let internal_ip = item
        .status
        .addresses
        .into_iter()
        .find(|a| a.kind == "InternalIP")
        .map(|a| a.address);
    let roles: Vec<&str> = item
        .metadata
        .labels
        .keys()
        .filter_map(|k| k.strip_prefix(ROLE_LABEL_PREFIX))
        .filter(|role| !role.is_empty())
        .collect();
    let roles = if roles.is_empty() {
        "<none>".to_string()
    } else {
        roles.join(",")
    };

    NodeInfo {
        status,
        roles,
        internal_ip,
        version: item.status.node_info.kubelet_version,
        cpu_capacity: item.status.capacity.cpu,
        cpu_allocatable: item.status.allocatable.cpu,
        memory_capacity: item.status.capacity.memory,
        memory_allocatable: item.status.allocatable.memory,
        pod_capacity: item.status.capacity.pods,
        name: item.metadata.name,
    }
}

/// Number of entries in a `kubectl get ... -o json` list.
pub fn count_items(json: &str) -> Result<usize, KubectlError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| KubectlError::Parse(e.to_string()))?;
    value["items"]
        .as_array()
        .map(Vec::len)
        .ok_or_else(|| KubectlError::Parse("missing items".to_string()))
}

/// `serverVersion.gitVersion` from `kubectl version -o json`.
pub fn parse_server_version(json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(json).ok()?;
    value["serverVersion"]["gitVersion"]
        .as_str()
        .map(str::to_string)
}

/// Kubernetes quantity in base units: cores for CPU, bytes for memory.
pub fn parse_quantity(value: &str) -> Option<f64> {
    const SUFFIXES: [(&str, f64); 9] = [
        ("Ki", 1024.0),
        ("Mi", 1_048_576.0),
        ("Gi", 1_073_741_824.0),
        ("Ti", 1_099_511_627_776.0),
        ("m", 0.001),
        ("K", 1e3),
        ("M", 1e6),
        ("G", 1e9),
        ("T", 1e12),
    ];
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for (suffix, multiplier) in SUFFIXES {
        if let Some(number) = value.strip_suffix(suffix) {
            return number.parse::<f64>().ok().map(|n| n * multiplier);
        }
    }
    value.parse().ok()
}

pub fn format_cpu(cores: f64) -> String {
    if cores >= 1.0 {
        format!("{:.1} cores", cores)
    } else {
        format!("{:.0} millicores", cores * 1000.0)
    }
}

pub fn format_memory(bytes: f64) -> String {
    const UNITS: [(&str, f64); 4] = [
        ("TiB", 1_099_511_627_776.0),
        ("GiB", 1_073_741_824.0),
        ("MiB", 1_048_576.0),
        ("KiB", 1024.0),
    ];
    UNITS
        .iter()
        .find(|(_, size)| bytes >= *size)
        .map(|(unit, size)| format!("{:.2} {}", bytes / size, unit))
        .unwrap_or_else(|| format!("{:.0} B", bytes))
}
