//! Application descriptors (`*.desktop` files).

use settings::constants::launcher;
use std::path::Path;

/// One launchable application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Display name, also the search haystack.
    pub name: String,
    /// Launch command template, field codes included.
    pub exec: String,
}

impl DesktopEntry {
    pub fn new(name: impl Into<String>, exec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exec: exec.into(),
        }
    }

    /// Command line to spawn: the first whitespace-delimited word of `exec`.
    ///
    /// Arguments and field codes (`%U`, `%f`, ...) are dropped.
    pub fn argv(&self) -> Option<Vec<String>> {
        self.exec
            .split_whitespace()
            .next()
            .map(|program| vec![program.to_string()])
    }
}

/// Parse descriptor contents. Returns `None` for malformed files and for entries
/// without a non-empty `Name` and `Exec` in the `[Desktop Entry]` group.
///
/// Only the exact `Name` and `Exec` keys are read; localized variants such as
/// `Name[de]` are ignored. The first occurrence of a key wins.
pub fn parse_descriptor(content: &str) -> Option<DesktopEntry> {
    let mut in_entry_group = false;
    let mut seen_group = false;
    let mut name: Option<String> = None;
    let mut exec: Option<String> = None;

    for raw in content.lines() {
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let group = header.trim_end().strip_suffix(']')?;
            seen_group = true;
            in_entry_group = group == launcher::DESCRIPTOR_SECTION;
            continue;
        }

        // Key-value lines are only valid inside a group.
        let (key, value) = line.split_once('=')?;
        if !seen_group {
            return None;
        }
        if !in_entry_group {
            continue;
        }

        let slot = match key.trim_end() {
            "Name" => &mut name,
            "Exec" => &mut exec,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(unescape(value.trim()));
        }
    }

    match (name, exec) {
        (Some(name), Some(exec)) if !name.is_empty() && !exec.is_empty() => {
            Some(DesktopEntry { name, exec })
        }
        _ => None,
    }
}

/// Resolve the key-file escapes `\s`, `\n`, `\t`, `\r` and `\\`.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Lazily read every descriptor in `dir`, in directory iteration order.
///
/// The directory is re-read on every call. Files that cannot be read or parsed are
/// skipped; a missing directory yields nothing.
pub fn scan(dir: &Path) -> impl Iterator<Item = DesktopEntry> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(read_dir) => Some(read_dir),
        Err(e) => {
            tracing::debug!("Cannot read applications dir {:?}: {}", dir, e);
            None
        }
    };

    read_dir
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .ends_with(launcher::DESCRIPTOR_SUFFIX)
        })
        .filter_map(|entry| {
            let path = entry.path();
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!("Skipping unreadable descriptor {:?}: {}", path, e);
                    return None;
                }
            };
            let parsed = parse_descriptor(&content);
            if parsed.is_none() {
                tracing::debug!("Skipping descriptor {:?}: no usable Name/Exec", path);
            }
            parsed
        })
}

/// The first `max` entries whose name contains `query` (case-sensitive).
///
/// An empty query matches nothing. Stops consuming `entries` once `max` matches are found.
pub fn filter(
    entries: impl IntoIterator<Item = DesktopEntry>,
    query: &str,
    max: usize,
) -> Vec<DesktopEntry> {
    if query.is_empty() {
        return Vec::new();
    }
    entries
        .into_iter()
        .filter(|entry| entry.name.contains(query))
        .take(max)
        .collect()
}
