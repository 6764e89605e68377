use std::fs;
use std::path::{Path, PathBuf};

use songsync_logging::{sync_debug, sync_info, sync_warn};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("songs folder {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot read songs folder: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Lists the song folders directly under `root`, sorted by name.
///
/// Symlinked folders are followed. Hidden, empty, unreadable and non UTF-8
/// folders are skipped with a log line; only a failure to read `root` itself
/// is an error.
pub fn scan_song_folders(root: &Path) -> Result<Vec<String>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true);

    let mut names = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                sync_warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = match entry.file_name().to_str() {
            Some(name) => name.to_string(),
            None => {
                sync_warn!("Skipping folder with non UTF-8 name {:?}", entry.file_name());
                continue;
            }
        };
        if name.starts_with('.') {
            continue;
        }
        match fs::read_dir(entry.path()) {
            Ok(mut contents) => {
                if contents.next().is_none() {
                    sync_debug!("Skipping empty folder {}", name);
                    continue;
                }
            }
            Err(err) => {
                sync_warn!("Skipping unreadable folder {}: {}", name, err);
                continue;
            }
        }
        names.push(name);
    }

    names.sort();
    sync_info!("Found {} song folders in {:?}", names.len(), root);
    Ok(names)
}
