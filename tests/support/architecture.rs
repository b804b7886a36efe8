//! Source scans backing the layer contract tests.

use std::fs;
use std::path::{Path, PathBuf};

/// A source line that matched a scan.
#[derive(Debug)]
pub struct Hit {
    pub file: String,
    pub line: usize,
    pub text: String,
}

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix(manifest_dir())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Every `.rs` file under `dir`, sorted.
fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let mut pending = vec![manifest_dir().join(dir)];
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).unwrap_or_else(|e| panic!("failed to read {}: {e}", dir.display()));
        for entry in entries {
            let path = entry
                .unwrap_or_else(|e| panic!("failed to read entry in {}: {e}", dir.display()))
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

fn code_lines(file: &Path) -> Vec<(usize, String)> {
    let content = fs::read_to_string(file)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(idx, line)| (idx + 1, line.to_string()))
        .collect()
}

/// Code lines under `dir` mentioning any of `needles`. Comments are skipped.
pub fn references_in(dir: &str, needles: &[&str]) -> Vec<Hit> {
    let mut hits = Vec::new();
    for file in rust_sources(dir) {
        for (line, text) in code_lines(&file) {
            if needles.iter().any(|needle| text.contains(needle)) {
                hits.push(Hit {
                    file: display_path(&file),
                    line,
                    text,
                });
            }
        }
    }
    hits
}

/// [`references_in`] ignoring the files allowed to use `needles`.
pub fn references_outside(dir: &str, needles: &[&str], allowed: &[&str]) -> Vec<Hit> {
    references_in(dir, needles)
        .into_iter()
        .filter(|hit| !allowed.contains(&hit.file.as_str()))
        .collect()
}

/// Lines of `mod.rs` files that do more than declare modules.
pub fn mod_rs_logic(dir: &str) -> Vec<Hit> {
    let mut hits = Vec::new();
    for file in rust_sources(dir) {
        if file.file_name().and_then(|name| name.to_str()) != Some("mod.rs") {
            continue;
        }
        for (line, text) in code_lines(&file) {
            let trimmed = text.trim();
            let declares_module = trimmed.is_empty()
                || trimmed.starts_with("pub mod ")
                || trimmed.starts_with("mod ")
                || trimmed.starts_with("#[cfg");
            if !declares_module {
                hits.push(Hit {
                    file: display_path(&file),
                    line,
                    text,
                });
            }
        }
    }
    hits
}

pub fn exists(path: &str) -> bool {
    manifest_dir().join(path).exists()
}

pub fn read(path: &str) -> String {
    fs::read_to_string(manifest_dir().join(path))
        .unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}
