use kube_wizard::command::{
    apply_default_namespace, build, has_explicit_namespace, normalize_custom_command,
    secret_field_command, secret_field_template, Action, ResourceKind,
};

fn flags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn build_basic_commands() {
    assert_eq!(build(ResourceKind::Pods, Action::Get, "", &[]), "kubectl get pods");
    assert_eq!(
        build(ResourceKind::Pods, Action::Describe, "my-pod", &flags(&["-n default"])),
        "kubectl describe pod my-pod -n default"
    );
    assert_eq!(
        build(ResourceKind::Nodes, Action::Top, "", &flags(&["--sort-by=cpu"])),
        "kubectl top nodes --sort-by=cpu"
    );
    assert_eq!(
        build(ResourceKind::Deployments, Action::Delete, "web", &flags(&["--wait=false"])),
        "kubectl delete deployment web --wait=false"
    );
}

#[test]
fn build_is_deterministic_and_prefixed_for_every_kind() {
    for kind in ResourceKind::ALL {
        for action in kind.actions() {
            let first = build(kind, *action, "obj", &flags(&["-o wide"]));
            let second = build(kind, *action, "obj", &flags(&["-o wide"]));
            assert_eq!(first, second);
            assert!(first.starts_with("kubectl "), "{}", first);
        }
    }
}

#[test]
fn build_appends_flags_verbatim_in_order() {
    let cmd = build(
        ResourceKind::Pods,
        Action::Logs,
        "api-0",
        &flags(&["--tail=50", "-f", "-n team;rm"]),
    );
    assert_eq!(cmd, "kubectl logs api-0 --tail=50 -f -n team;rm");
}

#[test]
fn explicit_namespace_detection() {
    assert!(has_explicit_namespace(&flags(&["-A"])));
    assert!(has_explicit_namespace(&flags(&["--all-namespaces"])));
    assert!(has_explicit_namespace(&flags(&["-o wide", "-n kube-system"])));
    assert!(has_explicit_namespace(&flags(&["-n=prod"])));
    assert!(!has_explicit_namespace(&flags(&["-o wide", "--show-labels"])));
}

#[test]
fn default_namespace_only_when_not_pinned() {
    let mut plain = flags(&["-o wide"]);
    apply_default_namespace(&mut plain, Some("staging"));
    assert_eq!(plain, flags(&["-o wide", "-n staging"]));

    let mut all = flags(&["-A"]);
    apply_default_namespace(&mut all, Some("staging"));
    assert_eq!(all, flags(&["-A"]));

    let mut explicit = flags(&["-n dev"]);
    apply_default_namespace(&mut explicit, Some("staging"));
    assert_eq!(explicit, flags(&["-n dev"]));

    let mut none = flags(&[]);
    apply_default_namespace(&mut none, Some("   "));
    assert!(none.is_empty());
}

#[test]
fn custom_commands_get_the_tool_prefix() {
    assert_eq!(normalize_custom_command("get pods").as_deref(), Some("kubectl get pods"));
    assert_eq!(
        normalize_custom_command("  kubectl get svc ").as_deref(),
        Some("kubectl get svc")
    );
    assert_eq!(normalize_custom_command("kubectl").as_deref(), Some("kubectl"));
    assert_eq!(normalize_custom_command("   "), None);
}

#[test]
fn secret_field_templates() {
    assert_eq!(
        secret_field_template("data.password"),
        r#"{{index .data "password" | base64decode}}"#
    );
    assert_eq!(secret_field_template("metadata.name"), "{{.metadata.name}}");
    assert_eq!(secret_field_template("type"), "{{.type}}");
    assert_eq!(
        secret_field_template("token"),
        r#"{{index .data "token" | base64decode}}"#
    );

    assert_eq!(
        secret_field_command("db", "type", Some("prod")),
        "kubectl get secret db -o go-template='{{.type}}' -n prod"
    );
}

#[test]
fn actions_per_resource() {
    assert!(ResourceKind::Secrets.actions().contains(&Action::ExtractField));
    assert!(!ResourceKind::Services.actions().contains(&Action::Logs));
    assert!(Action::Describe.needs_target());
    assert!(!Action::Get.needs_target());
    assert!(!Action::Top.needs_target());
}
