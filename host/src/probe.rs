//! Autosave artifact probe.
//!
//! When the host has not reported an autosave over the feed, the monitor
//! can still observe the save files the host writes: `<name>_autosave.blend`
//! in one of a few temp directories, with the host process id embedded in
//! the filename. The newest matching file's mtime is the baseline.
//!
//! Everything here degrades silently: unreadable or missing directories are
//! skipped, and "no matching file" is simply `None`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

const AUTOSAVE_SUFFIX: &str = "_autosave.blend";

/// Scans candidate directories for the host's autosave artifacts.
#[derive(Debug)]
pub struct AutosaveProbe {
    dirs: Vec<PathBuf>,
    pid_tag: String,
}

impl AutosaveProbe {
    /// Probe for the current process's host, scanning the configured
    /// primary directory (if any), its parent, and the system temp dir.
    #[must_use]
    pub fn new(primary: Option<PathBuf>, host_pid: u32) -> Self {
        let mut dirs = Vec::new();
        if let Some(primary) = primary {
            if let Some(parent) = primary.parent() {
                let parent = parent.to_path_buf();
                dirs.push(primary);
                dirs.push(parent);
            } else {
                dirs.push(primary);
            }
        }
        dirs.push(std::env::temp_dir());
        dirs.dedup();

        Self {
            dirs,
            pid_tag: host_pid.to_string(),
        }
    }

    /// Probe explicit directories with an explicit pid tag.
    #[must_use]
    pub fn with_dirs(dirs: Vec<PathBuf>, pid_tag: impl Into<String>) -> Self {
        Self {
            dirs,
            pid_tag: pid_tag.into(),
        }
    }

    /// Directories this probe scans, in priority order.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// The mtime of the newest matching autosave file, if any exists.
    #[must_use]
    pub fn latest_autosave(&self) -> Option<DateTime<Utc>> {
        let mut newest: Option<DateTime<Utc>> = None;

        for dir in &self.dirs {
            if !dir.is_dir() {
                continue;
            }
            let Ok(listing) = fs::read_dir(dir) else {
                tracing::debug!(dir = %dir.display(), "autosave dir unreadable, skipping");
                continue;
            };

            for dir_entry in listing.flatten() {
                if !self.matches(&dir_entry.path()) {
                    continue;
                }
                let Ok(modified) = dir_entry.metadata().and_then(|meta| meta.modified()) else {
                    continue;
                };
                let modified = DateTime::<Utc>::from(modified);
                if newest.is_none_or(|current| modified > current) {
                    newest = Some(modified);
                }
            }
        }

        newest
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(AUTOSAVE_SUFFIX) && name.contains(&self.pid_tag))
    }
}
