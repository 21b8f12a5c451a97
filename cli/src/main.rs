//! Modalwatch binary - terminal session management and the event loop.
//!
//! # Architecture
//!
//! The binary bridges the host feed (JSON lines on stdin, decoded by
//! [`modalwatch_host::feed`]) and the panel ([`modalwatch_tui`]), with
//! RAII-based terminal management and guaranteed cleanup.
//!
//! ```text
//! stdin ──> feed reader task ──> mpsc ──> FeedBridge ──> OperatorRegistry
//!                                                             │
//! autosave probe (periodic) ──> AutosaveState <───────────────┤
//!                                                             v
//!                keyboard ──> handle_key ──> draw() every frame tick
//! ```
//!
//! Keyboard input still works with the feed piped into stdin: crossterm
//! reads key events from the controlling tty, not the stdin pipe.

use std::{
    env,
    fs::{self, OpenOptions},
    io::{BufRead, Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use modalwatch_config::MonitorConfig;
use modalwatch_core::{AutosaveState, OperatorRegistry};
use modalwatch_host::{AutosaveProbe, FeedBridge, HostEvent, SystemOpener, decode_line};
use modalwatch_tui::{Outcome, PanelContext, PanelState, draw, handle_key};

/// Render cadence.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Probe the filesystem for autosave artifacts every this many frames.
const PROBE_EVERY_FRAMES: u64 = 40;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.modalwatch/logs/modalwatch.log
    if let Some(config_path) = MonitorConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("modalwatch.log"));
    }

    // Fallback: ./.modalwatch/logs/modalwatch.log (constrained environments)
    candidates.push(PathBuf::from(".modalwatch").join("logs").join("modalwatch.log"));

    candidates
}

/// The process id embedded in the host's autosave filenames.
///
/// The original panel runs inside the host and uses its own pid; a
/// standalone monitor is told the host pid through the environment and
/// falls back to its own (useful when launched by the host itself).
fn host_pid() -> u32 {
    env::var("MODALWATCH_HOST_PID")
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_else(std::process::id)
}

/// RAII terminal session: raw mode + alternate screen, restored on drop
/// even when the event loop errors out.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(out))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

fn spawn_feed_reader(tx: UnboundedSender<HostEvent>) {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match decode_line(&line) {
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => tracing::warn!("skipping malformed feed line: {err}"),
            }
        }
        tracing::debug!("host feed closed");
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = MonitorConfig::load().unwrap_or_default();
    let probe = AutosaveProbe::new(config.probe_temp_dir(), host_pid());
    let opener = SystemOpener::new();

    let (tx, rx) = unbounded_channel();
    spawn_feed_reader(tx);

    let mut session = TerminalSession::new()?;
    let result = run(&mut session, &config, &probe, &opener, rx).await;
    drop(session);

    result
}

async fn run(
    session: &mut TerminalSession,
    config: &MonitorConfig,
    probe: &AutosaveProbe,
    opener: &SystemOpener,
    mut feed: UnboundedReceiver<HostEvent>,
) -> Result<()> {
    let mut registry = OperatorRegistry::new();
    let mut autosave = AutosaveState::new();
    let mut bridge = FeedBridge::new();
    let mut panel = PanelState::new();

    if let Some(at) = probe.latest_autosave() {
        autosave.record_probed(at);
    }

    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let mut frame_count: u64 = 0;

    loop {
        ticker.tick().await;
        frame_count += 1;

        while let Ok(host_event) = feed.try_recv() {
            bridge.apply(host_event, &mut registry, &mut autosave, Utc::now());
        }
        panel.clamp(registry.len());

        if frame_count % PROBE_EVERY_FRAMES == 0
            && let Some(at) = probe.latest_autosave()
        {
            autosave.record_probed(at);
        }

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                match handle_key(key, &mut registry, &mut panel, opener) {
                    Outcome::Quit => return Ok(()),
                    Outcome::Continue => {}
                }
            }
        }

        let ctx = PanelContext {
            since: autosave.since(Utc::now()),
            interval_minutes: config.autosave_interval_minutes(),
            high_contrast: config.high_contrast(),
        };
        session.terminal.draw(|frame| {
            draw(frame, &registry, &ctx, &mut panel);
        })?;
    }
}
