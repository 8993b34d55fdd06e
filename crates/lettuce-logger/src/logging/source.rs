//! Source lookups for call-site attribution
//!
//! Files are read once per process and kept in memory. A file that cannot be
//! found is remembered as missing, so lookups never retry the disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

pub type SourceLines = Arc<[String]>;

static SOURCE_CACHE: Lazy<Mutex<HashMap<&'static str, Option<SourceLines>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// All lines of a source file recorded by `file!()` or a `Location`
pub fn source_lines(file: &'static str) -> Option<SourceLines> {
    let mut cache = SOURCE_CACHE.lock();
    cache
        .entry(file)
        .or_insert_with(|| {
            let path = locate_source(file)?;
            let content = std::fs::read_to_string(path).ok()?;
            Some(content.lines().map(str::to_string).collect())
        })
        .clone()
}

/// Get one line (1-based) of a source file, if it can be found on disk
pub fn source_line(file: &'static str, line: u32) -> Option<String> {
    let lines = source_lines(file)?;
    lines.get((line as usize).checked_sub(1)?).cloned()
}

/// Name of the nearest function declared at or above `line` of `file`
pub fn enclosing_function(file: &'static str, line: u32) -> Option<String> {
    let lines = source_lines(file)?;
    let end = (line as usize).min(lines.len());
    lines[..end].iter().rev().find_map(|text| function_declared_in(text))
}

/// The function name if `text` is a function declaration
///
/// Comment lines are skipped and `fn` must come first, after optional
/// visibility and `async` / `const` / `unsafe` / `extern "abi"` qualifiers.
pub(crate) fn function_declared_in(text: &str) -> Option<String> {
    let mut rest = text.trim_start();
    if rest.starts_with("//") || rest.starts_with("/*") || rest.starts_with('*') {
        return None;
    }
    loop {
        if let Some(after) = rest.strip_prefix("fn ") {
            let name: String = after
                .trim_start()
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            return (!name.is_empty()).then_some(name);
        }
        rest = strip_qualifier(rest)?.trim_start();
    }
}

/// Drop one leading declaration qualifier
fn strip_qualifier(text: &str) -> Option<&str> {
    if let Some(after) = text.strip_prefix("pub") {
        if let Some(scope) = after.strip_prefix('(') {
            return scope.find(')').map(|end| &scope[end + 1..]);
        }
        return after.starts_with(char::is_whitespace).then_some(after);
    }
    for keyword in ["async", "const", "unsafe", "extern"] {
        if let Some(after) = text.strip_prefix(keyword) {
            if !after.starts_with(char::is_whitespace) {
                return None;
            }
            let after = after.trim_start();
            if keyword == "extern" {
                if let Some(abi) = after.strip_prefix('"') {
                    return abi.find('"').map(|end| &abi[end + 1..]);
                }
            }
            return Some(after);
        }
    }
    None
}

/// Relative paths recorded at compile time are tried against the current
/// directory and each of its ancestors, which covers workspace builds.
fn locate_source(file: &str) -> Option<PathBuf> {
    let path = Path::new(file);
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}
