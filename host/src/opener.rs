//! File-opening capability.
//!
//! "Open source in editor" and "reveal in file manager" are delegations to
//! the environment, not core logic. The trait keeps the UI layer decoupled
//! from the platform so tests can substitute a recording double, and the
//! registry never sees any of this.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },
    #[error("{path} has no containing directory")]
    NoParent { path: PathBuf },
}

/// Capability for delegating file actions to the environment.
pub trait FileOpener {
    fn open_in_editor(&self, path: &Path) -> Result<(), OpenError>;
    fn reveal_in_file_manager(&self, path: &Path) -> Result<(), OpenError>;
}

/// The real implementation: spawns the platform's opener, detached.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FileOpener for SystemOpener {
    fn open_in_editor(&self, path: &Path) -> Result<(), OpenError> {
        let (program, args) = editor_invocation(path);
        spawn(&program, &args)
    }

    fn reveal_in_file_manager(&self, path: &Path) -> Result<(), OpenError> {
        let (program, args) = reveal_invocation(path)?;
        spawn(&program, &args)
    }
}

fn spawn(program: &str, args: &[OsString]) -> Result<(), OpenError> {
    // Fire and forget: the opener outlives any interest we have in it.
    Command::new(program)
        .args(args)
        .spawn()
        .map(drop)
        .map_err(|source| OpenError::Launch {
            command: program.to_string(),
            source,
        })
}

/// `$VISUAL`/`$EDITOR` when set, otherwise the platform opener on the file
/// itself.
fn editor_invocation(path: &Path) -> (String, Vec<OsString>) {
    let configured = env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .ok()
        .filter(|editor| !editor.trim().is_empty());

    match configured {
        Some(editor) => (editor, vec![path.as_os_str().to_owned()]),
        None => platform_open(path),
    }
}

#[cfg(target_os = "windows")]
fn platform_open(path: &Path) -> (String, Vec<OsString>) {
    (
        "cmd".to_string(),
        vec![
            OsString::from("/C"),
            OsString::from("start"),
            OsString::from(""),
            path.as_os_str().to_owned(),
        ],
    )
}

#[cfg(target_os = "macos")]
fn platform_open(path: &Path) -> (String, Vec<OsString>) {
    ("open".to_string(), vec![path.as_os_str().to_owned()])
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_open(path: &Path) -> (String, Vec<OsString>) {
    ("xdg-open".to_string(), vec![path.as_os_str().to_owned()])
}

#[cfg(target_os = "windows")]
fn reveal_invocation(path: &Path) -> Result<(String, Vec<OsString>), OpenError> {
    let mut select = OsString::from("/select,");
    select.push(path.as_os_str());
    Ok(("explorer.exe".to_string(), vec![select]))
}

#[cfg(target_os = "macos")]
fn reveal_invocation(path: &Path) -> Result<(String, Vec<OsString>), OpenError> {
    Ok((
        "open".to_string(),
        vec![OsString::from("-R"), path.as_os_str().to_owned()],
    ))
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_invocation(path: &Path) -> Result<(String, Vec<OsString>), OpenError> {
    // No "select in folder" convention on generic desktops; open the parent.
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).ok_or_else(|| {
        OpenError::NoParent {
            path: path.to_path_buf(),
        }
    })?;
    Ok((
        "xdg-open".to_string(),
        vec![parent.as_os_str().to_owned()],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn reveal_opens_the_parent_directory() {
        let (program, args) = reveal_invocation(Path::new("/addons/sculpt.py")).unwrap();
        assert_eq!(program, "xdg-open");
        assert_eq!(args, vec![OsString::from("/addons")]);
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn reveal_of_parentless_path_errors() {
        let err = reveal_invocation(Path::new("relative.py")).unwrap_err();
        assert!(matches!(err, OpenError::NoParent { .. }));
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn reveal_of_root_errors() {
        assert!(reveal_invocation(Path::new("/")).is_err());
    }
}
