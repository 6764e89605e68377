use std::sync::LazyLock;

use regex::Regex;

// Leading beatmap id, then the title, then one optional trailing (...) or [...] qualifier.
static FOLDER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d*\s*(.+?)(?:\s*[(\[].*?[)\]])?\s*$").expect("folder name pattern")
});

static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\s+)?(tv size|cut ver|short ver|full ver|game ver)\s*")
        .expect("version suffix pattern")
});

/// Derives a searchable "Artist - Title" string from a raw song folder name.
///
/// Strips a leading numeric id, one trailing bracketed qualifier such as
/// `(TV Size)` or `[Hard]`, and the first common version marker. Falls back to
/// the trimmed raw name when the cleanup would leave nothing.
pub fn normalize_folder_name(raw: &str) -> String {
    let trimmed = raw.trim();
    // A bare beatmap id has no title part to extract.
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.to_string();
    }
    let title = FOLDER_NAME
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed);

    let cleaned = VERSION_SUFFIX.replace(title, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        trimmed.to_string()
    } else {
        cleaned.to_string()
    }
}
