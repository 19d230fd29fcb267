mod helpers;

use std::sync::Arc;

use kube_wizard::cluster::{format_cpu, format_memory, parse_quantity};
use kube_wizard::kubectl::{
    connectivity_report, parse_client_version, split_args, CommandResult, KubectlError,
};
use helpers::{fake_kubectl, FakeRunner};

#[test]
fn split_args_strips_tool_token() {
    assert_eq!(split_args("kubectl get pods -n  dev").unwrap(), ["get", "pods", "-n", "dev"]);
    assert_eq!(split_args("get pods").unwrap(), ["get", "pods"]);
    assert_eq!(split_args("kubectl-foo bar").unwrap(), ["kubectl-foo", "bar"]);
    assert!(matches!(split_args("kubectl"), Err(KubectlError::InvalidCommand)));
    assert!(matches!(split_args("   "), Err(KubectlError::InvalidCommand)));
}

#[test]
fn execute_checks_context_before_running() {
    let runner = Arc::new(FakeRunner::new().fail("kubectl config current-context", "error: current-context is not set"));
    let kubectl = fake_kubectl(&runner);

    let err = kubectl.execute_raw("kubectl get pods").unwrap_err();
    assert!(matches!(err, KubectlError::NoContext));
    assert!(!runner.was_called("kubectl get pods"));
}

#[test]
fn execute_returns_stdout_and_stderr_separately() {
    let runner = Arc::new(FakeRunner::with_context().script(
        "kubectl get pods -n dev",
        "NAME READY\napi-0 1/1\n",
        "Warning: something odd",
        true,
    ));
    let kubectl = fake_kubectl(&runner);

    let result = kubectl.execute_raw("kubectl get pods -n dev").unwrap();
    assert_eq!(result.command, "kubectl get pods -n dev");
    assert_eq!(result.stdout, "NAME READY\napi-0 1/1\n");
    assert_eq!(result.stderr, "Warning: something odd");
    assert_eq!(
        result.render("Output"),
        "Error:\nWarning: something odd\n\nOutput:\nNAME READY\napi-0 1/1\n"
    );
}

#[test]
fn failed_command_is_not_an_error() {
    let runner = Arc::new(
        FakeRunner::with_context().fail("kubectl get pod ghost", "Error from server (NotFound)"),
    );
    let kubectl = fake_kubectl(&runner);

    let result = kubectl.execute_raw("get pod ghost").unwrap();
    assert_eq!(result.stdout, "");
    assert_eq!(result.stderr, "Error from server (NotFound)");
}

#[test]
fn list_names_splits_jsonpath_output() {
    let runner = Arc::new(FakeRunner::new().respond(
        "kubectl get pods -o jsonpath={.items[*].metadata.name}",
        "api-0 api-1 worker",
    ));
    let kubectl = fake_kubectl(&runner);
    assert_eq!(kubectl.list_names("pods", None).unwrap(), ["api-0", "api-1", "worker"]);
}

#[test]
fn list_names_scopes_to_a_namespace() {
    let runner = Arc::new(FakeRunner::new().respond(
        "kubectl get services -o jsonpath={.items[*].metadata.name} -n dev",
        "web",
    ));
    let kubectl = fake_kubectl(&runner);
    assert_eq!(kubectl.list_names("services", Some("dev")).unwrap(), ["web"]);
}

#[test]
fn helper_queries_treat_stderr_as_failure() {
    let runner = Arc::new(FakeRunner::new().fail(
        "kubectl get namespaces -o jsonpath={.items[*].metadata.name}",
        "forbidden",
    ));
    let kubectl = fake_kubectl(&runner);
    let err = kubectl.list_namespaces().unwrap_err();
    assert!(matches!(err, KubectlError::Tool(ref msg) if msg == "forbidden"));
}

#[test]
fn contexts_and_switching() {
    let runner = Arc::new(
        FakeRunner::with_context()
            .respond("kubectl config get-contexts -o name", "test-ctx\nprod\n")
            .respond("kubectl config use-context prod", "Switched to context \"prod\".\n"),
    );
    let kubectl = fake_kubectl(&runner);

    assert_eq!(kubectl.list_contexts().unwrap(), ["test-ctx", "prod"]);
    assert_eq!(kubectl.current_context().unwrap(), "test-ctx");
    kubectl.use_context("prod").unwrap();
    assert!(runner.was_called("kubectl config use-context prod"));
}

#[test]
fn secret_keys_are_sorted() {
    let runner = Arc::new(FakeRunner::new().respond(
        "kubectl get secret db -o json -n prod",
        r#"{"data": {"username": "YQ==", "password": "Yg=="}, "type": "Opaque"}"#,
    ));
    let kubectl = fake_kubectl(&runner);
    assert_eq!(kubectl.secret_keys("db", Some("prod")).unwrap(), ["password", "username"]);
}

#[test]
fn version_parsing() {
    let json = r#"{"clientVersion": {"major": "1", "minor": "28+", "gitVersion": "v1.28.2"}}"#;
    assert_eq!(parse_client_version(json).unwrap(), (1, 28));
    assert!(parse_client_version("{}").is_err());
    assert!(parse_client_version("not json").is_err());

    let runner = Arc::new(FakeRunner::new().respond("kubectl version --client -o json", json));
    assert_eq!(fake_kubectl(&runner).client_version().unwrap(), (1, 28));
}

#[test]
fn installed_check_uses_which() {
    let runner = Arc::new(FakeRunner::new().respond("which kubectl", "/usr/bin/kubectl\n"));
    assert!(fake_kubectl(&runner).is_installed());

    let missing = Arc::new(FakeRunner::new());
    assert!(!fake_kubectl(&missing).is_installed());
}

#[test]
fn connectivity_reports() {
    let ok = CommandResult {
        command: "kubectl cluster-info".to_string(),
        stdout: "Kubernetes control plane is running at https://127.0.0.1:6443\n\nTo further debug and diagnose cluster problems, use 'kubectl cluster-info dump'.\n".to_string(),
        stderr: String::new(),
    };
    assert_eq!(
        connectivity_report(&ok),
        "✅ Cluster is reachable\n\nKubernetes control plane is running at https://127.0.0.1:6443"
    );

    let down = CommandResult {
        command: "kubectl cluster-info".to_string(),
        stdout: String::new(),
        stderr: "Unable to connect to the server: dial tcp: i/o timeout".to_string(),
    };
    assert!(connectivity_report(&down).starts_with("❌ Cluster is not reachable"));
}

const NODES_JSON: &str = r#"{
  "items": [
    {
      "metadata": {
        "name": "cp-1",
        "labels": {"node-role.kubernetes.io/control-plane": "", "kubernetes.io/os": "linux"}
      },
      "status": {
        "conditions": [{"type": "MemoryPressure", "status": "False"}, {"type": "Ready", "status": "True"}],
        "addresses": [{"type": "Hostname", "address": "cp-1"}, {"type": "InternalIP", "address": "10.0.0.1"}],
        "capacity": {"cpu": "4", "memory": "8Gi", "pods": "110"},
        "allocatable": {"cpu": "3500m", "memory": "7680Mi", "pods": "110"},
        "nodeInfo": {"kubeletVersion": "v1.29.2"}
      }
    },
    {
      "metadata": {"name": "worker-1"},
      "status": {
        "conditions": [{"type": "Ready", "status": "False"}],
        "capacity": {"cpu": "2", "memory": "4Gi", "pods": "110"},
        "allocatable": {"cpu": "2", "memory": "4Gi", "pods": "110"},
        "nodeInfo": {"kubeletVersion": "v1.29.2"}
      }
    }
  ]
}"#;

#[test]
fn cluster_info_summarises_nodes() {
    let runner = Arc::new(
        FakeRunner::with_context()
            .respond("kubectl get nodes -o json", NODES_JSON)
            .respond(
                "kubectl get pods --all-namespaces -o json",
                r#"{"items": [{}, {}, {}]}"#,
            )
            .respond(
                "kubectl get namespaces -o jsonpath={.items[*].metadata.name}",
                "default kube-system",
            )
            .respond(
                "kubectl version -o json",
                r#"{"serverVersion": {"gitVersion": "v1.29.2"}}"#,
            ),
    );
    let info = fake_kubectl(&runner).cluster_info().unwrap();

    assert_eq!(info.context, "test-ctx");
    assert_eq!(info.version.as_deref(), Some("v1.29.2"));
    assert_eq!(info.nodes.len(), 2);
    assert_eq!(info.ready_nodes(), 1);
    assert_eq!(info.total_pods, Some(3));
    assert_eq!(info.namespace_count, Some(2));
    assert_eq!(info.total_cpu, "6.0 cores");
    assert_eq!(info.allocatable_cpu, "5.5 cores");
    assert_eq!(info.total_memory, "12.00 GiB");
    assert_eq!(info.allocatable_memory, "11.50 GiB");

    let cp = &info.nodes[0];
    assert_eq!(cp.status, "Ready");
    assert_eq!(cp.roles, "control-plane");
    assert_eq!(cp.internal_ip.as_deref(), Some("10.0.0.1"));
    let worker = &info.nodes[1];
    assert_eq!(worker.status, "NotReady");
    assert_eq!(worker.roles, "<none>");
    assert_eq!(worker.internal_ip, None);

    let text = info.render();
    assert!(text.contains("2 total, 1 ready"));
    assert!(text.contains("✅ cp-1"));
    assert!(text.contains("❌ worker-1"));
}

#[test]
fn cluster_info_extras_are_optional() {
    let runner = Arc::new(
        FakeRunner::with_context().respond("kubectl get nodes -o json", r#"{"items": []}"#),
    );
    let info = fake_kubectl(&runner).cluster_info().unwrap();
    assert!(info.nodes.is_empty());
    assert_eq!(info.total_pods, None);
    assert_eq!(info.namespace_count, None);
    assert_eq!(info.version, None);
    assert_eq!(info.total_cpu, "0 millicores");
    assert_eq!(info.total_memory, "0 B");
    assert!(info.render().contains("Pods:        unknown"));
}

#[test]
fn cluster_info_needs_context_and_valid_nodes() {
    let runner = Arc::new(FakeRunner::new());
    assert!(matches!(
        fake_kubectl(&runner).cluster_info(),
        Err(KubectlError::NoContext)
    ));

    let runner = Arc::new(
        FakeRunner::with_context().respond("kubectl get nodes -o json", "not json"),
    );
    assert!(matches!(
        fake_kubectl(&runner).cluster_info(),
        Err(KubectlError::Parse(_))
    ));
}

#[test]
fn quantities_parse_and_format() {
    assert_eq!(parse_quantity("250m"), Some(0.25));
    assert_eq!(parse_quantity("2"), Some(2.0));
    assert_eq!(parse_quantity("1Ki"), Some(1024.0));
    assert_eq!(parse_quantity("2M"), Some(2e6));
    assert_eq!(parse_quantity(""), None);
    assert_eq!(parse_quantity("lots"), None);

    assert_eq!(format_cpu(0.25), "250 millicores");
    assert_eq!(format_cpu(1.0), "1.0 cores");
    assert_eq!(format_memory(512.0), "512 B");
    assert_eq!(format_memory(1536.0), "1.50 KiB");
    assert_eq!(format_memory(2.0 * 1_099_511_627_776.0), "2.00 TiB");
}
