mod helpers;

use kube_wizard::config::{load_config_file, save_config_file, Config, ConfigFile};
use helpers::test_config;

#[test]
fn config_new_sets_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);

    assert_eq!(config.base_dir, tmp.path().join(".kube-wizard"));
    assert_eq!(config.saved_outputs_dir, tmp.path().join(".kube-wizard/saved_cmd"));
    assert_eq!(config.kubectl, "kubectl");
    assert_eq!(config.default_namespace, None);
    assert_eq!(config.log_path(), tmp.path().join(".kube-wizard/kube-wizard.log"));
    assert_eq!(config.favourites_path(), tmp.path().join(".kube-wizard/favourites.json"));
    assert_eq!(config.history_path(), tmp.path().join(".kube-wizard/history.json"));
    assert_eq!(config.hotkeys_path(), tmp.path().join(".kube-wizard/hotkeys.json"));
}

#[test]
fn config_ensure_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);

    config.ensure_dirs().unwrap();

    assert!(config.base_dir.exists());
    assert!(config.saved_outputs_dir.exists());
}

#[test]
fn config_file_overrides_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path().join("conf");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(
        base.join("config.toml"),
        "default_namespace = \"staging\"\nkubectl = \"/opt/bin/kubectl\"\nsaved_outputs_dir = \"/tmp/outputs\"\n",
    )
    .unwrap();

    let config = Config::load(Some(base.clone())).unwrap();
    assert_eq!(config.base_dir, base);
    assert_eq!(config.default_namespace.as_deref(), Some("staging"));
    assert_eq!(config.kubectl, "/opt/bin/kubectl");
    assert_eq!(config.saved_outputs_dir, std::path::PathBuf::from("/tmp/outputs"));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let base = tmp.path().join("conf");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(base.join("config.toml"), "default_namespace = \"  \"\nkubectl = \"\"\n").unwrap();

    let config = Config::from_file(base);
    assert_eq!(config.default_namespace, None);
    assert_eq!(config.kubectl, "kubectl");
}

#[test]
fn unparseable_config_uses_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "default_namespace = [").unwrap();
    assert_eq!(load_config_file(tmp.path()), ConfigFile::default());
}

#[test]
fn config_file_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let file = ConfigFile {
        default_namespace: Some("prod".to_string()),
        saved_outputs_dir: None,
        kubectl: Some("kubectl".to_string()),
    };
    save_config_file(tmp.path(), &file).unwrap();
    assert_eq!(load_config_file(tmp.path()), file);
}

#[test]
fn config_init_default_files() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = test_config(&tmp);
    config.default_namespace = Some("dev".to_string());

    assert!(config.init_default_files(false).unwrap());
    assert!(config.saved_outputs_dir.exists());
    let written = load_config_file(&config.base_dir);
    assert_eq!(written.default_namespace.as_deref(), Some("dev"));

    // Existing file is kept unless forced
    config.default_namespace = Some("other".to_string());
    assert!(!config.init_default_files(false).unwrap());
    assert_eq!(load_config_file(&config.base_dir).default_namespace.as_deref(), Some("dev"));

    assert!(config.init_default_files(true).unwrap());
    assert_eq!(load_config_file(&config.base_dir).default_namespace.as_deref(), Some("other"));
}
