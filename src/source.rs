//! Source location lookup and doc-comment extraction.
//!
//! Handler references are opaque, so the builder cannot discover where a
//! handler is defined on its own. Instead the caller registers a
//! [`FuncSource`] per handler id (normally emitted by a build-time extraction
//! step) and the builder consumes the table purely as data. Comment mining
//! still happens against the real source file: the annotation block is the
//! contiguous run of `//` line comments immediately above the recorded
//! definition line.

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::router::Handler;

/// Where a handler function is defined.
#[derive(Debug, Clone)]
pub struct FuncSource {
    /// Path to the defining source file.
    pub file: PathBuf,
    /// 1-based line number of the definition.
    pub line: usize,
    /// Qualified function path, e.g. `example.com/project/api.ListWidgets`.
    pub function_path: String,
}

/// Lookup table from handler id to its defining source location.
///
/// A handler with no entry (e.g. a closure with no addressable definition)
/// simply fails to locate; the operation builder degrades gracefully.
#[derive(Debug, Default)]
pub struct SourceIndex {
    entries: HashMap<String, FuncSource>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the defining location for a handler.
    pub fn insert(
        &mut self,
        handler: &Handler,
        file: impl Into<PathBuf>,
        line: usize,
        function_path: impl Into<String>,
    ) {
        self.entries.insert(
            handler.id().to_string(),
            FuncSource {
                file: file.into(),
                line,
                function_path: function_path.into(),
            },
        );
    }

    /// Resolves a handler reference to its source location, if known.
    pub fn locate(&self, handler: &Handler) -> Option<&FuncSource> {
        self.entries.get(handler.id())
    }
}

/// Resolves the package name declared by a source file.
///
/// Only the package clause is inspected (fast path, not a full parse): the
/// first non-comment line of the form `package <name>`.
pub fn package_name(file: &Path) -> Option<String> {
    let content = fs::read_to_string(file).ok()?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("package ") {
            let name = rest.split_whitespace().next()?;
            return Some(name.trim_end_matches(';').to_string());
        }
        // Anything else before the package clause means there is none.
        return None;
    }
    None
}

/// Extracts the doc comment attached to the definition at `line` (1-based).
///
/// The comment is the contiguous block of `//` lines ending directly above
/// the definition. If that line is not a comment, the block ending one line
/// earlier is tried instead, to tolerate a single decorator line between the
/// comment and the definition.
pub fn func_comment(file: &Path, line: usize) -> Option<String> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(err) => {
            debug!("cannot read {} for comment mining: {}", file.display(), err);
            return None;
        }
    };
    let lines: Vec<&str> = content.lines().collect();

    comment_block_ending_at(&lines, line.checked_sub(1)?)
        .or_else(|| comment_block_ending_at(&lines, line.checked_sub(2)?))
}

/// The comment block whose last line is `end` (1-based), if that line is a
/// `//` comment.
fn comment_block_ending_at(lines: &[&str], end: usize) -> Option<String> {
    if end == 0 || end > lines.len() {
        return None;
    }
    let mut block = Vec::new();
    let mut idx = end; // 1-based
    while idx >= 1 {
        let line = lines[idx - 1].trim_start();
        if !line.starts_with("//") {
            break;
        }
        block.push(strip_comment_marker(line));
        if idx == 1 {
            break;
        }
        idx -= 1;
    }
    if block.is_empty() {
        return None;
    }
    block.reverse();
    Some(block.join("\n"))
}

fn strip_comment_marker(line: &str) -> String {
    let rest = line.trim_start_matches('/');
    rest.strip_prefix(' ').unwrap_or(rest).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_package_name_fast_path() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            "handlers.go",
            "// Package api serves widgets.\n\npackage api\n\nfunc f() {}\n",
        );
        assert_eq!(package_name(&path), Some("api".to_string()));
    }

    #[test]
    fn test_package_name_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "orphan.go", "func f() {}\n");
        assert_eq!(package_name(&path), None);
    }

    #[test]
    fn test_func_comment_block_above_definition() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            "handlers.go",
            "package api\n\n// Lists every widget.\n// response: Widget\nfunc ListWidgets() {}\n",
        );
        let comment = func_comment(&path, 5).unwrap();
        assert_eq!(comment, "Lists every widget.\nresponse: Widget");
    }

    #[test]
    fn test_func_comment_decorator_fallback() {
        let dir = TempDir::new().unwrap();
        let path = write_source(
            &dir,
            "handlers.go",
            "package api\n\n// response: Widget\n#[traced]\nfunc ListWidgets() {}\n",
        );
        // Line 4 is a decorator, not a comment; the block one line earlier wins.
        let comment = func_comment(&path, 5).unwrap();
        assert_eq!(comment, "response: Widget");
    }

    #[test]
    fn test_func_comment_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "handlers.go", "package api\n\nfunc Bare() {}\n");
        assert_eq!(func_comment(&path, 3), None);
    }

    #[test]
    fn test_locate_unknown_handler() {
        let index = SourceIndex::new();
        assert!(index.locate(&Handler::new("nope")).is_none());
    }
}
