#![allow(clippy::clone_on_copy)]

use super::*;
use uuid::Uuid;

fn id() -> ShapeId {
    Uuid::new_v4()
}

#[test]
fn starts_empty() {
    let s = SelectionState::new();
    assert!(s.is_empty());
    assert_eq!(s.len(), 0);
    assert_eq!(s.single(), None);
}

#[test]
fn select_only_replaces() {
    let mut s = SelectionState::new();
    let (a, b) = (id(), id());
    s.select_only(a);
    s.select_only(b);
    assert_eq!(s.len(), 1);
    assert!(s.is_selected(&b));
    assert!(!s.is_selected(&a));
}

#[test]
fn single_only_for_exactly_one() {
    let mut s = SelectionState::new();
    let (a, b) = (id(), id());
    assert_eq!(s.single(), None);
    s.select_only(a);
    assert_eq!(s.single(), Some(a));
    s.add(b);
    assert_eq!(s.single(), None);
}

#[test]
fn add_and_remove() {
    let mut s = SelectionState::new();
    let (a, b) = (id(), id());
    s.add(a);
    s.add(b);
    assert_eq!(s.len(), 2);
    s.remove(&a);
    assert!(!s.is_selected(&a));
    assert!(s.is_selected(&b));
}

#[test]
fn toggle_flips_membership() {
    let mut s = SelectionState::new();
    let a = id();
    s.toggle(a);
    assert!(s.is_selected(&a));
    s.toggle(a);
    assert!(!s.is_selected(&a));
}

#[test]
fn select_many_replaces_set() {
    let mut s = SelectionState::new();
    let (a, b, c) = (id(), id(), id());
    s.select_only(a);
    s.select_many(vec![b, c]);
    assert_eq!(s.len(), 2);
    assert!(!s.is_selected(&a));
    assert!(s.is_selected(&b));
    assert!(s.is_selected(&c));
}

#[test]
fn clear_empties() {
    let mut s = SelectionState::new();
    s.add(id());
    s.add(id());
    s.clear();
    assert!(s.is_empty());
}

#[test]
fn retain_prunes_dangling_ids() {
    let mut s = SelectionState::new();
    let (keep, drop) = (id(), id());
    s.add(keep);
    s.add(drop);
    s.retain(|i| *i == keep);
    assert!(s.is_selected(&keep));
    assert!(!s.is_selected(&drop));
}
