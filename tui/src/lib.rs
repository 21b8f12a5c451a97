//! TUI rendering for the Modalwatch panel using ratatui.

mod format;
mod input;
mod theme;

pub use format::{autosave_line, elapsed_phrase, is_overdue, truncate_with_ellipsis};
pub use input::{Outcome, PanelState, handle_key};
pub use theme::{Glyphs, Palette, glyphs};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
};

use modalwatch_core::OperatorRegistry;
use modalwatch_types::{OperatorEntry, SinceAutosave};

const EMPTY_PLACEHOLDER: &str = "No (active) modal operators to display";

/// Everything the panel needs from outside the UI layer for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PanelContext {
    pub since: SinceAutosave,
    pub interval_minutes: u64,
    pub high_contrast: bool,
}

/// Main draw function.
pub fn draw(
    frame: &mut Frame,
    registry: &OperatorRegistry,
    ctx: &PanelContext,
    panel: &mut PanelState,
) {
    let palette = Palette::for_options(ctx.high_contrast);
    let glyphs = glyphs(ctx.high_contrast);

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Autosave status
            Constraint::Min(3),    // Operator history
            Constraint::Length(1), // Status message
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    draw_autosave_status(frame, chunks[0], ctx, &palette, &glyphs);
    draw_history(frame, chunks[1], registry, ctx, panel, &palette, &glyphs);
    draw_status_message(frame, chunks[2], panel, &palette);
    draw_help_bar(frame, chunks[3], &palette);
}

fn draw_autosave_status(
    frame: &mut Frame,
    area: Rect,
    ctx: &PanelContext,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let overdue = is_overdue(ctx.since, ctx.interval_minutes);
    let (glyph, style) = if overdue {
        (
            glyphs.warning,
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (glyphs.info, Style::default().fg(palette.accent))
    };

    let line = Line::from(vec![
        Span::styled(glyph, style),
        Span::raw(" "),
        Span::styled(autosave_line(ctx.since), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_history(
    frame: &mut Frame,
    area: Rect,
    registry: &OperatorRegistry,
    ctx: &PanelContext,
    panel: &mut PanelState,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Modal operators ")
        .border_style(Style::default().fg(palette.border))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(palette.bg_panel));

    let inner_width = usize::from(area.width.saturating_sub(4));

    if registry.is_empty() {
        let placeholder = Paragraph::new(Line::from(vec![
            Span::styled(glyphs.finished, Style::default().fg(palette.text_muted)),
            Span::raw(" "),
            Span::styled(EMPTY_PLACEHOLDER, Style::default().fg(palette.text_muted)),
        ]))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = registry
        .list_entries()
        .iter()
        .map(|entry| ListItem::new(entry_line(entry, inner_width, palette, glyphs)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(palette.bg_highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(panel.selected().min(registry.len().saturating_sub(1))));
    frame.render_stateful_widget(list, area, &mut state);
}

fn entry_line<'a>(
    entry: &'a OperatorEntry,
    width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'a> {
    let (glyph, glyph_style) = if entry.status().is_active() {
        (glyphs.active, Style::default().fg(palette.success))
    } else {
        (glyphs.finished, Style::default().fg(palette.text_muted))
    };

    let label = match entry.module() {
        Some(module) => format!("{} ({module})", entry.name()),
        None => entry.name().to_string(),
    };

    let detail = format!("  started {}", entry.started_at().format("%H:%M:%S"));
    let actions = if entry.source().is_known() {
        "  [o] open  [r] reveal  [x] remove"
    } else {
        "  [x] remove"
    };

    // Leave room for the glyph, the highlight symbol, and the fixed tails.
    let label_budget = width.saturating_sub(4 + detail.len() + actions.len());
    let label = truncate_with_ellipsis(&label, label_budget.max(8));

    Line::from(vec![
        Span::styled(glyph, glyph_style),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(palette.text_primary)),
        Span::styled(detail, Style::default().fg(palette.text_muted)),
        Span::styled(actions, Style::default().fg(palette.text_muted)),
    ])
}

fn draw_status_message(frame: &mut Frame, area: Rect, panel: &PanelState, palette: &Palette) {
    let Some(status) = panel.status() else {
        return;
    };
    let line = Line::from(Span::styled(
        status.to_string(),
        Style::default().fg(palette.warning),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_help_bar(frame: &mut Frame, area: Rect, palette: &Palette) {
    let line = Line::from(Span::styled(
        "↑/↓ select · o open in editor · r reveal in file manager · x remove · q quit",
        Style::default().fg(palette.text_muted),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
