//! Hygiene — enforces coding standards at test time.
//!
//! Scans the crate's production sources for patterns that violate the
//! error-handling policy (nothing in the interaction core may panic or
//! silently discard). Every pattern has a budget of zero; sibling
//! `*_test.rs` modules are exempt.

use std::fs;
use std::path::{Path, PathBuf};

/// (needle, why it is banned in production code)
const BANNED: &[(&str, &str)] = &[
    (".unwrap()", "panics take down the whole canvas"),
    (".expect(", "panics take down the whole canvas"),
    ("panic!(", "panics take down the whole canvas"),
    ("unreachable!(", "a wrong assumption becomes a crash"),
    ("todo!(", "stubs must not ship"),
    ("unimplemented!(", "stubs must not ship"),
    ("let _ =", "discards a value without inspecting it"),
    (".ok()", "discards an error without inspecting it"),
    ("#[allow(dead_code)]", "dead code should be deleted, not silenced"),
];

struct SourceFile {
    path: PathBuf,
    content: String,
}

fn production_sources() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no production sources found; is the cwd the crate root?");
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let is_source = path.extension().is_some_and(|e| e == "rs");
        let is_test = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with("_test.rs"));
        if is_source && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path, content });
            }
        }
    }
}

#[test]
fn production_code_stays_within_budgets() {
    let files = production_sources();
    let mut violations = Vec::new();
    for (needle, reason) in BANNED {
        for file in &files {
            for (line_no, line) in file.content.lines().enumerate() {
                if line.contains(needle) {
                    violations.push(format!(
                        "  {}:{} contains `{}` ({reason})",
                        file.path.display(),
                        line_no + 1,
                        needle,
                    ));
                }
            }
        }
    }
    assert!(
        violations.is_empty(),
        "hygiene violations found:\n{}",
        violations.join("\n")
    );
}

#[test]
fn every_module_has_a_doc_header() {
    let files = production_sources();
    for file in &files {
        let has_header = file
            .content
            .lines()
            .take(5)
            .any(|line| line.starts_with("//!") || line.starts_with("#[cfg(test)]"));
        assert!(
            has_header,
            "{} is missing a module doc header",
            file.path.display()
        );
    }
}
