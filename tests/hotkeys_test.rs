mod helpers;

use kube_wizard::hotkeys::{key_for_function, normalize_key, HotkeysStore};
use helpers::test_config;

#[test]
fn key_names() {
    assert_eq!(normalize_key(" f5 ").as_deref(), Some("F5"));
    assert_eq!(normalize_key("F13"), None);
    assert_eq!(normalize_key("ctrl"), None);
    assert_eq!(key_for_function(1), Some("F1"));
    assert_eq!(key_for_function(12), Some("F12"));
    assert_eq!(key_for_function(0), None);
    assert_eq!(key_for_function(13), None);
}

#[test]
fn bind_replaces_and_sorts_by_key() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);
    let mut store = HotkeysStore::open(config.hotkeys_path()).unwrap();

    store.bind("f10", "nodes", "kubectl get nodes").unwrap();
    store.bind("F2", "pods", "kubectl get pods").unwrap();
    store.bind("F2", "all pods", "kubectl get pods -A").unwrap();

    let keys: Vec<&str> = store.list().iter().map(|h| h.key.as_str()).collect();
    assert_eq!(keys, ["F2", "F10"]);
    assert_eq!(store.get("f2").unwrap().command, "kubectl get pods -A");

    assert!(store.bind("F99", "x", "kubectl get pods").is_err());

    let reopened = HotkeysStore::open(config.hotkeys_path()).unwrap();
    assert_eq!(reopened.list(), store.list());
}

#[test]
fn unbind_reports_whether_a_binding_existed() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);
    let mut store = HotkeysStore::open(config.hotkeys_path()).unwrap();
    store.bind("F3", "svc", "kubectl get svc").unwrap();

    assert!(store.unbind("f3").unwrap());
    assert!(!store.unbind("F3").unwrap());
    assert!(store.list().is_empty());
}

#[test]
fn stored_keys_are_normalized_on_open() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);
    config.ensure_dirs().unwrap();
    std::fs::write(
        config.hotkeys_path(),
        r#"[{"key":"f4","name":"b","command":"kubectl get svc"},{"key":"f1","name":"a","command":"kubectl get pods"}]"#,
    )
    .unwrap();

    let store = HotkeysStore::open(config.hotkeys_path()).unwrap();
    let keys: Vec<&str> = store.list().iter().map(|h| h.key.as_str()).collect();
    assert_eq!(keys, ["F1", "F4"]);
}
