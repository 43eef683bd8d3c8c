//! Filename generation and sanitization.

use std::path::{Path, PathBuf};

/// Longest filename stem we produce, in bytes. Leaves room for an extension
/// under the common 255-byte limit.
const MAX_STEM_BYTES: usize = 200;

/// Name used when a title sanitizes to nothing.
const FALLBACK_NAME: &str = "untitled";

/// Turn an arbitrary title into a single safe path component.
///
/// Never fails: path separators become `-`, other reserved and control
/// characters become `_`, and names that would be `.`/`..` or empty become
/// `untitled`, so the result always stays inside its parent directory.
pub fn sanitize_filename(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // Windows drops trailing dots and spaces
    let trimmed = mapped.trim().trim_end_matches(['.', ' ']);

    // Trailing dots are gone, so "." and ".." cannot survive past this point
    let name = if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    };

    truncate_to_boundary(name, MAX_STEM_BYTES)
}

/// Sanitize a folder or account name for use as a directory.
pub fn sanitize_path_component(name: &str) -> String {
    sanitize_filename(name)
}

/// Compose `dir/<sanitized title>.<ext>`.
pub fn destination_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_filename(title), extension))
}

fn truncate_to_boundary(mut name: String, max: usize) -> String {
    if name.len() <= max {
        return name;
    }
    let mut cut = max;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    name.truncate(cut);
    name
}
