//! Key-file settings support.
//!
//! Config location: `~/.config/alinuxd/conf.ini`
//!
//! ```ini
//! [Settings]
//! font_size=16
//! ```
//!
//! Only `font_size` in `[Settings]` is interpreted. Saving rewrites that one line and
//! leaves every other line of the file as it was.

use crate::constants::{font, settings};
use anyhow::{Context, Result};
use std::path::Path;

/// The `[Settings]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSection {
    /// Terminal font size in points. Parsed wide so out-of-range values can be rejected.
    pub font_size: i64,
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            font_size: i64::from(font::DEFAULT_SIZE),
        }
    }
}

/// User-facing config parsed from the settings file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub settings: SettingsSection,
}

impl Config {
    /// Font size to start with. Anything outside the allowed range yields the default.
    pub fn font_size(&self) -> i32 {
        i32::try_from(self.settings.font_size)
            .ok()
            .filter(|size| (font::MIN_SIZE..=font::MAX_SIZE).contains(size))
            .unwrap_or(font::DEFAULT_SIZE)
    }
}

/// One meaningful line of a key file.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Group(&'a str),
    Entry { key: &'a str, value: &'a str },
    /// Blank, comment, or anything not understood. Kept verbatim on save.
    Other,
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Other;
    }
    if let Some(header) = line.strip_prefix('[') {
        return match header.strip_suffix(']') {
            Some(group) => Line::Group(group),
            None => Line::Other,
        };
    }
    match line.split_once('=') {
        Some((key, value)) => Line::Entry {
            key: key.trim_end(),
            value: value.trim_start(),
        },
        None => Line::Other,
    }
}

/// Parse key-file contents. Unknown groups and keys are ignored, and malformed lines
/// are skipped. A later `font_size` overrides an earlier one.
pub fn parse_config(content: &str) -> Config {
    let mut config = Config::default();
    let mut in_settings = false;

    for raw in content.lines() {
        match classify(raw) {
            Line::Group(group) => in_settings = group == settings::SECTION,
            Line::Entry { key, value } if in_settings && key == settings::FONT_SIZE_KEY => {
                match value.parse::<i64>() {
                    Ok(size) => config.settings.font_size = size,
                    Err(e) => {
                        tracing::warn!("Ignoring font_size {:?}: {}", value, e);
                        config.settings.font_size = i64::from(font::DEFAULT_SIZE);
                    }
                }
            }
            Line::Entry { .. } | Line::Other => {}
        }
    }
    config
}

/// Load and parse the settings file. Returns default on any error.
pub fn load_config(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to read config: {}", e);
            }
            return Config::default();
        }
    };

    // Size guard
    if content.len() > settings::MAX_FILE_SIZE as usize {
        tracing::warn!(
            "Config file too large ({} bytes), using defaults",
            content.len()
        );
        return Config::default();
    }

    parse_config(&content)
}

/// `content` with `[Settings] font_size` set to `size`.
///
/// Every existing `font_size` line in the group is rewritten. A missing key goes right
/// after the group header; a missing group is appended at the end.
pub fn with_font_size(content: &str, size: i32) -> String {
    let assignment = format!("{}={}", settings::FONT_SIZE_KEY, size);
    let mut out: Vec<String> = Vec::new();
    let mut in_settings = false;
    let mut header_at: Option<usize> = None;
    let mut written = false;

    for raw in content.lines() {
        match classify(raw) {
            Line::Group(group) => {
                in_settings = group == settings::SECTION;
                if in_settings && header_at.is_none() {
                    header_at = Some(out.len());
                }
            }
            Line::Entry { key, .. } if in_settings && key == settings::FONT_SIZE_KEY => {
                out.push(assignment.clone());
                written = true;
                continue;
            }
            Line::Entry { .. } | Line::Other => {}
        }
        out.push(raw.to_string());
    }

    if !written {
        match header_at {
            Some(index) => out.insert(index + 1, assignment),
            None => {
                if out.last().is_some_and(|line| !line.trim().is_empty()) {
                    out.push(String::new());
                }
                out.push(format!("[{}]", settings::SECTION));
                out.push(assignment);
            }
        }
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Write the font size into the settings file, preserving everything else in it.
///
/// Creates the parent directory if needed.
pub fn save_font_size(path: &Path, size: i32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
    };

    std::fs::write(path, with_font_size(&content, size))
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
