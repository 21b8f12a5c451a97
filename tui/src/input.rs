//! Key handling for the panel.
//!
//! The panel only curates and delegates: selection movement, removing the
//! selected entry from the history, and handing the selected entry's source
//! path to the injected [`FileOpener`]. Nothing here reaches back into the
//! host.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use modalwatch_core::OperatorRegistry;
use modalwatch_host::FileOpener;

/// UI-side panel state: cursor position and a transient status message.
#[derive(Debug, Default)]
pub struct PanelState {
    selected: usize,
    status: Option<String>,
}

impl PanelState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Keep the cursor inside the list after entries are removed.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

pub fn handle_key(
    key: KeyEvent,
    registry: &mut OperatorRegistry,
    panel: &mut PanelState,
    opener: &dyn FileOpener,
) -> Outcome {
    // Release/repeat events would double-fire on some terminals.
    if key.kind != KeyEventKind::Press {
        return Outcome::Continue;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Outcome::Quit,
        KeyCode::Up | KeyCode::Char('k') => {
            panel.clear_status();
            panel.move_up();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            panel.clear_status();
            panel.move_down(registry.len());
        }
        KeyCode::Char('x') | KeyCode::Delete => remove_selected(registry, panel),
        KeyCode::Char('o') => open_selected(registry, panel, opener, OpenKind::Editor),
        KeyCode::Char('r') => open_selected(registry, panel, opener, OpenKind::Reveal),
        _ => {}
    }

    Outcome::Continue
}

enum OpenKind {
    Editor,
    Reveal,
}

fn remove_selected(registry: &mut OperatorRegistry, panel: &mut PanelState) {
    let Some(entry) = registry.list_entries().get(panel.selected()) else {
        return;
    };
    let id = entry.id();
    let name = entry.name().to_string();

    registry.remove(id);
    panel.clamp(registry.len());
    panel.set_status(format!("Removed {name} from list"));
}

fn open_selected(
    registry: &OperatorRegistry,
    panel: &mut PanelState,
    opener: &dyn FileOpener,
    kind: OpenKind,
) {
    let Some(entry) = registry.list_entries().get(panel.selected()) else {
        return;
    };

    let Some(path) = entry.source().path() else {
        panel.set_status(format!("No source file for {}", entry.name()));
        return;
    };

    let result = match kind {
        OpenKind::Editor => opener.open_in_editor(path),
        OpenKind::Reveal => opener.reveal_in_file_manager(path),
    };

    match result {
        Ok(()) => match kind {
            OpenKind::Editor => panel.set_status(format!("Opened {}", path.display())),
            OpenKind::Reveal => panel.set_status(format!("Revealed {}", path.display())),
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), "file open failed: {err}");
            panel.set_status(err.to_string());
        }
    }
}
