//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! the domain stays pure, and services reach the host only through ports.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and return its non-comment lines outside `#[cfg(test)]` blocks.
fn read_production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    let mut depth = 0i32;
    let mut test_depth: Option<i32> = None;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") && test_depth.is_none() {
            test_depth = Some(depth);
        }
        let in_test = test_depth.is_some();
        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if test_depth.is_some_and(|d| depth <= d) {
                        test_depth = None;
                    }
                }
                _ => {}
            }
        }
        let comment = trimmed.starts_with("//") || trimmed.starts_with('*');
        if !in_test && !comment {
            lines.push(line.to_string());
        }
    }
    lines
}

fn violations_in(dir: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(dir);
    let mut violations = Vec::new();
    for file in collect_rs_files(&root) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (i, line) in read_production_lines(&file).iter().enumerate() {
            for needle in forbidden {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}` in: {line}", i + 1));
                }
            }
        }
    }
    violations
}

// ── Domain purity ─────────────────────────────────────────────────────────────

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let violations = violations_in(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

// ── Services go through ports ─────────────────────────────────────────────────

#[test]
fn application_does_not_reach_into_infra_or_presentation() {
    let violations = violations_in(
        "application",
        &[
            "crate::infra",
            "crate::commands",
            "crate::output",
            "std::fs::",
            "std::process::Command",
            "tokio::process",
        ],
    );
    assert!(
        violations.is_empty(),
        "application/ must use port traits only:\n{}",
        violations.join("\n")
    );
}

// ── No inline JSON branching ──────────────────────────────────────────────────

#[test]
fn no_inline_json_branching_in_commands() {
    let violations = violations_in("commands", &["json: bool", "if json", "if !json"]);
    assert!(
        violations.is_empty(),
        "Found inline JSON branching in commands/: use app.renderer() instead:\n{}",
        violations.join("\n")
    );
}
