use std::path::Path;

use kube_wizard::saved_outputs::{ArchiveError, SavedOutputs, INDEX_FILE};

fn store(tmp: &tempfile::TempDir) -> SavedOutputs {
    SavedOutputs::new(tmp.path().join("saved_cmd"))
}

fn files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| n != INDEX_FILE)
        .collect();
    names.sort();
    names
}

#[test]
fn repeated_saves_add_versions() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);

    let first = outputs.save("pods-output", "C1", "kubectl get pods").unwrap();
    let second = outputs.save("pods-output", "C2", "kubectl get pods").unwrap();

    assert_eq!(first.file_name, "pods-output.txt");
    assert_eq!(first.version, 1);
    assert_eq!(second.file_name, "pods-output_v2.txt");
    assert_eq!(second.version, 2);
    assert_eq!(outputs.read("pods-output.txt").unwrap(), "C1");
    assert_eq!(outputs.read("pods-output_v2.txt").unwrap(), "C2");
    assert_eq!(
        outputs.load_index().get("kubectl get pods").map(String::as_str),
        Some("pods-output")
    );
}

#[test]
fn explicit_version_suffix_and_extension_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);

    outputs.save("report", "a", "").unwrap();
    let saved = outputs.save("  report_v7.txt ", "b", "").unwrap();
    assert_eq!(saved.base, "report");
    assert_eq!(saved.file_name, "report_v2.txt");
    // No command means no index entry
    assert!(outputs.load_index().is_empty());
}

#[test]
fn next_version_follows_the_highest_existing() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    std::fs::create_dir_all(outputs.dir()).unwrap();
    std::fs::write(outputs.dir().join("logs_v4.txt"), "old").unwrap();

    let saved = outputs.save("logs", "new", "").unwrap();
    assert_eq!(saved.file_name, "logs_v5.txt");
}

#[test]
fn version_numbers_do_not_wrap() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    std::fs::create_dir_all(outputs.dir()).unwrap();
    std::fs::write(outputs.dir().join(format!("logs_v{}.txt", u32::MAX)), "old").unwrap();

    let err = outputs.save("logs", "new", "kubectl logs api").unwrap_err();
    assert!(matches!(err, ArchiveError::VersionOverflow(ref base) if base == "logs"));
    assert_eq!(files(outputs.dir()), [format!("logs_v{}.txt", u32::MAX)]);
    assert!(outputs.load_index().is_empty());
}

#[test]
fn index_is_replaced_without_leftovers() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);

    outputs.save("pods", "a", "kubectl get pods").unwrap();
    outputs.save("nodes", "b", "kubectl get nodes").unwrap();

    let index = outputs.load_index();
    assert_eq!(index.get("kubectl get pods").map(String::as_str), Some("pods"));
    assert_eq!(index.get("kubectl get nodes").map(String::as_str), Some("nodes"));
    assert_eq!(files(outputs.dir()), ["nodes.txt", "pods.txt"]);
}

#[test]
fn invalid_names_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    assert!(matches!(outputs.save("   ", "x", ""), Err(ArchiveError::InvalidName)));
    assert!(matches!(outputs.save(".txt", "x", ""), Err(ArchiveError::InvalidName)));
    assert!(matches!(outputs.save("../escape", "x", ""), Err(ArchiveError::InvalidName)));
}

#[test]
fn groups_are_sorted_with_ascending_versions() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    outputs.save("zeta", "1", "").unwrap();
    outputs.save("alpha", "1", "").unwrap();
    outputs.save("alpha", "2", "").unwrap();
    outputs.save("alpha", "3", "").unwrap();

    let groups = outputs.groups().unwrap();
    let bases: Vec<&str> = groups.iter().map(|g| g.base.as_str()).collect();
    assert_eq!(bases, ["alpha", "zeta"]);
    let versions: Vec<u32> = groups[0].versions.iter().map(|v| v.version).collect();
    assert_eq!(versions, [1, 2, 3]);
}

#[test]
fn rename_moves_every_version_and_repoints_index() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    outputs.save("pods-output", "C1", "kubectl get pods").unwrap();
    outputs.save("pods-output", "C2", "kubectl get pods -A").unwrap();

    outputs.rename("pods-output", "my-pods").unwrap();

    assert_eq!(files(outputs.dir()), ["my-pods.txt", "my-pods_v2.txt"]);
    let index = outputs.load_index();
    assert_eq!(index.get("kubectl get pods").map(String::as_str), Some("my-pods"));
    assert_eq!(index.get("kubectl get pods -A").map(String::as_str), Some("my-pods"));
    assert_eq!(outputs.read("my-pods_v2.txt").unwrap(), "C2");
}

#[test]
fn rename_collision_changes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    outputs.save("a", "a1", "cmd-a").unwrap();
    outputs.save("a", "a2", "cmd-a").unwrap();
    outputs.save("b", "b1", "cmd-b").unwrap();
    outputs.save("b", "b2", "cmd-b").unwrap();

    let err = outputs.rename("a", "b").unwrap_err();
    assert!(matches!(err, ArchiveError::AlreadyExists(_)));

    assert_eq!(files(outputs.dir()), ["a.txt", "a_v2.txt", "b.txt", "b_v2.txt"]);
    assert_eq!(outputs.read("a.txt").unwrap(), "a1");
    assert_eq!(outputs.load_index().get("cmd-a").map(String::as_str), Some("a"));
}

#[test]
fn rename_to_same_name_is_a_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    outputs.save("same", "x", "").unwrap();
    outputs.rename("same", "same").unwrap();
    assert_eq!(files(outputs.dir()), ["same.txt"]);
}

#[test]
fn rename_missing_group_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    assert!(matches!(outputs.rename("ghost", "other"), Err(ArchiveError::NotFound(_))));
}

#[test]
fn deleting_last_version_purges_index() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    outputs.save("svc", "1", "kubectl get svc").unwrap();
    outputs.save("svc", "2", "kubectl get svc").unwrap();

    outputs.delete_version("svc.txt").unwrap();
    assert_eq!(
        outputs.load_index().get("kubectl get svc").map(String::as_str),
        Some("svc")
    );

    outputs.delete_version("svc_v2.txt").unwrap();
    assert!(outputs.load_index().is_empty());
    assert!(outputs.groups().unwrap().is_empty());
}

#[test]
fn delete_group_removes_files_and_index() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    outputs.save("keep", "k", "kubectl get nodes").unwrap();
    outputs.save("drop", "1", "kubectl get pods").unwrap();
    outputs.save("drop", "2", "kubectl get pods").unwrap();

    outputs.delete("drop").unwrap();

    assert_eq!(files(outputs.dir()), ["keep.txt"]);
    let index = outputs.load_index();
    assert!(!index.contains_key("kubectl get pods"));
    assert!(index.contains_key("kubectl get nodes"));
    assert!(matches!(outputs.delete("drop"), Err(ArchiveError::NotFound(_))));
}

#[test]
fn resolve_for_command_heals_stale_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    outputs.save("pods", "x", "kubectl get pods").unwrap();
    assert_eq!(
        outputs.resolve_for_command("kubectl get pods").unwrap().as_deref(),
        Some("pods")
    );
    assert_eq!(outputs.resolve_for_command("kubectl get svc").unwrap(), None);

    // Remove the file behind the store's back
    std::fs::remove_file(outputs.dir().join("pods.txt")).unwrap();
    assert_eq!(outputs.resolve_for_command("kubectl get pods").unwrap(), None);
    assert!(outputs.load_index().is_empty());
}

#[test]
fn malformed_index_reads_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    std::fs::create_dir_all(outputs.dir()).unwrap();
    std::fs::write(outputs.dir().join(INDEX_FILE), "{not json").unwrap();

    assert!(outputs.load_index().is_empty());
    assert_eq!(outputs.resolve_for_command("kubectl get pods").unwrap(), None);
    outputs.save("fresh", "x", "kubectl get pods").unwrap();
    assert_eq!(outputs.load_index().len(), 1);
}

#[test]
fn missing_directory_reads_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let outputs = store(&tmp);
    assert!(outputs.groups().unwrap().is_empty());
    assert!(matches!(outputs.read("nope.txt"), Err(ArchiveError::NotFound(_))));
}
