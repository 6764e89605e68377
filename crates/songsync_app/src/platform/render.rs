use std::fmt::Write as _;

use songsync_core::{normalize_folder_name, AppViewModel, ItemRowView};
use songsync_engine::Collection;

/// Turns successive view models into the lines worth printing.
#[derive(Debug, Default)]
pub struct Renderer {
    last_status: String,
    last_error: Option<String>,
}

impl Renderer {
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();
        if view.status_line != self.last_status {
            self.last_status.clone_from(&view.status_line);
            let done = view.counts.added + view.counts.failed;
            lines.push(format!("[{done}/{}] {}", view.items.len(), view.status_line));
        }
        if view.last_error != self.last_error {
            if let Some(err) = &view.last_error {
                lines.push(format!("error: {err}"));
            }
            self.last_error.clone_from(&view.last_error);
        }
        lines
    }
}

pub fn summary_table(view: &AppViewModel) -> String {
    let width = name_width(view.items.iter().map(|row| row.normalized_name.as_str()));
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:<width$} RESULT", "STATUS", "SONG");
    for row in &view.items {
        let line = format!(
            "{:<8} {:<width$} {}",
            row.status.to_string(),
            row.normalized_name,
            row_result(row)
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    let counts = view.counts;
    let _ = write!(
        out,
        "added {}, failed {}, pending {}",
        counts.added, counts.failed, counts.pending
    );
    if view.last_summary.is_some_and(|summary| summary.cancelled) {
        out.push_str(" (cancelled)");
    }
    out
}

fn row_result(row: &ItemRowView) -> &str {
    row.remote_id
        .as_deref()
        .or(row.failure_reason.as_deref())
        .unwrap_or("")
}

pub fn scan_table(names: &[String]) -> String {
    let width = name_width(names.iter().map(String::as_str));
    let mut out = String::new();
    for name in names {
        let _ = writeln!(out, "{name:<width$} -> {}", normalize_folder_name(name));
    }
    let _ = write!(out, "{} song folders", names.len());
    out
}

pub fn collections_table(collections: &[Collection]) -> String {
    if collections.is_empty() {
        return "No playlists found.".to_string();
    }
    let width = name_width(collections.iter().map(|c| c.id.as_str()));
    let mut out = String::new();
    for collection in collections {
        let _ = write!(out, "{:<width$} {}", collection.id, collection.title);
        if let Some(count) = collection.item_count {
            let _ = write!(out, " ({count} songs)");
        }
        out.push('\n');
    }
    out.pop();
    out
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|name| name.chars().count()).max().unwrap_or(0).min(60)
}
