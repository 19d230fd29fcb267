use kube_wizard::command::{Action, ResourceKind};
use kube_wizard::flags::{ChecklistEntry, FlagChecklist, NAMESPACE_LABEL};
use kube_wizard::selection::Selection;

fn selection_for(action: Action) -> Selection {
    let mut selection = Selection::default();
    selection.resource = Some(ResourceKind::Pods);
    selection.action = Some(action);
    selection
}

fn index_of(checklist: &FlagChecklist, token: &str) -> usize {
    checklist
        .entries()
        .iter()
        .position(|e| matches!(e, ChecklistEntry::Flag { token: t, .. } if t == token))
        .unwrap()
}

fn namespace_index(checklist: &FlagChecklist) -> usize {
    checklist
        .entries()
        .iter()
        .position(|e| matches!(e, ChecklistEntry::Namespace { .. }))
        .unwrap()
}

#[test]
fn checklist_layout() {
    let checklist = FlagChecklist::for_action(Action::Delete);
    let labels = checklist.labels();
    assert_eq!(labels.first().map(String::as_str), Some("Done (Continue)"));
    assert_eq!(labels[1], "───");
    assert_eq!(labels[2], "[ ] --grace-period=0");
    assert_eq!(labels.last().unwrap(), &format!("[ ] {}", NAMESPACE_LABEL));
    assert_eq!(checklist.len(), 2 + 3 + 1);
}

#[test]
fn toggling_a_flag_twice_restores_state() {
    let mut checklist = FlagChecklist::for_action(Action::Get);
    let mut selection = selection_for(Action::Get);

    checklist.toggle(index_of(&checklist, "-o wide"), &mut selection);
    checklist.toggle(index_of(&checklist, "--show-labels"), &mut selection);
    let before = selection.clone();

    let idx = index_of(&checklist, "-A");
    assert!(checklist.toggle(idx, &mut selection));
    assert_eq!(selection.flags(), ["-o wide", "--show-labels", "-A"]);
    assert_eq!(checklist.get(idx).unwrap().label(), "[x] -A");

    assert!(checklist.toggle(idx, &mut selection));
    assert_eq!(selection, before);
    assert_eq!(checklist.get(idx).unwrap().label(), "[ ] -A");
}

#[test]
fn removing_a_middle_flag_keeps_order() {
    let mut checklist = FlagChecklist::for_action(Action::Logs);
    let mut selection = selection_for(Action::Logs);
    for token in ["-f", "--tail=100", "--previous"] {
        checklist.toggle(index_of(&checklist, token), &mut selection);
    }
    checklist.toggle(index_of(&checklist, "--tail=100"), &mut selection);
    assert_eq!(selection.flags(), ["-f", "--previous"]);
}

#[test]
fn done_and_separator_do_not_toggle() {
    let mut checklist = FlagChecklist::for_action(Action::Get);
    let mut selection = selection_for(Action::Get);
    assert!(!checklist.toggle(0, &mut selection));
    assert!(!checklist.toggle(1, &mut selection));
    assert!(!checklist.toggle(99, &mut selection));
    assert!(selection.flags().is_empty());
    assert!(!checklist.get(0).unwrap().is_checked());
}

#[test]
fn namespace_toggle_sets_input_requirement_without_a_flag() {
    let mut checklist = FlagChecklist::for_action(Action::Get);
    let mut selection = selection_for(Action::Get);
    let ns = namespace_index(&checklist);

    assert!(checklist.toggle(ns, &mut selection));
    assert!(selection.needs_namespace_input);
    assert!(selection.flags().is_empty());
    assert_eq!(checklist.get(ns).unwrap().label(), format!("[x] {}", NAMESPACE_LABEL));
}

#[test]
fn namespace_toggle_is_independent_of_generic_flags() {
    let mut checklist = FlagChecklist::for_action(Action::Get);
    let mut selection = selection_for(Action::Get);
    let ns = namespace_index(&checklist);

    checklist.toggle(index_of(&checklist, "-o wide"), &mut selection);
    checklist.toggle(ns, &mut selection);
    assert!(selection.set_custom_namespace("team-a"));
    checklist.toggle(index_of(&checklist, "--show-labels"), &mut selection);
    assert_eq!(selection.flags(), ["-o wide", "-n team-a", "--show-labels"]);

    checklist.toggle(ns, &mut selection);
    assert!(!selection.needs_namespace_input);
    assert!(selection.custom_namespace.is_empty());
    assert_eq!(selection.flags(), ["-o wide", "--show-labels"]);
}

#[test]
fn extract_field_has_only_namespace_entry() {
    let checklist = FlagChecklist::for_action(Action::ExtractField);
    assert_eq!(checklist.len(), 3);
    assert!(matches!(checklist.get(2), Some(ChecklistEntry::Namespace { checked: false })));
}
