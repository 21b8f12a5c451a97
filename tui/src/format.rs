//! Display formatting for the panel.

use chrono::Duration;
use unicode_width::UnicodeWidthChar;

use modalwatch_types::SinceAutosave;

/// Human phrasing for an elapsed duration since autosave.
///
/// Thresholds: under a minute, exactly-one-minute wording up to two
/// minutes, then whole minutes (floored). Negative elapsed time (clock
/// skew between host and monitor) reads as the smallest bucket.
#[must_use]
pub fn elapsed_phrase(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds();
    if secs < 60 {
        "less than a minute ago".to_string()
    } else if secs < 120 {
        "1 minute ago".to_string()
    } else {
        format!("{} minutes ago", secs / 60)
    }
}

/// The full autosave status line.
#[must_use]
pub fn autosave_line(since: SinceAutosave) -> String {
    match since {
        SinceAutosave::Never => "No autosave during this session".to_string(),
        SinceAutosave::Elapsed(elapsed) => format!("Autosaved {}", elapsed_phrase(elapsed)),
    }
}

/// Whether the elapsed time has exceeded the host's autosave interval.
///
/// Compares whole minutes, like the host preference it mirrors. `Never` is
/// informational, not overdue: the session may simply be younger than one
/// interval.
#[must_use]
pub fn is_overdue(since: SinceAutosave, interval_minutes: u64) -> bool {
    match since.seconds() {
        None => false,
        Some(secs) => secs.max(0) as u64 / 60 > interval_minutes,
    }
}

/// Truncate to a display-cell budget, appending an ellipsis when cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            out.push('…');
            return out;
        }
        width += ch_width;
        out.push(ch);
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_phrase_buckets() {
        assert_eq!(elapsed_phrase(Duration::seconds(0)), "less than a minute ago");
        assert_eq!(elapsed_phrase(Duration::seconds(59)), "less than a minute ago");
        assert_eq!(elapsed_phrase(Duration::seconds(61)), "1 minute ago");
        assert_eq!(elapsed_phrase(Duration::seconds(119)), "1 minute ago");
        assert_eq!(elapsed_phrase(Duration::seconds(120)), "2 minutes ago");
        assert_eq!(elapsed_phrase(Duration::seconds(185)), "3 minutes ago");
    }

    #[test]
    fn elapsed_phrase_tolerates_clock_skew() {
        assert_eq!(elapsed_phrase(Duration::seconds(-5)), "less than a minute ago");
    }

    #[test]
    fn autosave_line_renders_never_distinctly() {
        assert_eq!(
            autosave_line(SinceAutosave::Never),
            "No autosave during this session"
        );
        assert_eq!(
            autosave_line(SinceAutosave::Elapsed(Duration::seconds(300))),
            "Autosaved 5 minutes ago"
        );
    }

    #[test]
    fn overdue_compares_whole_minutes() {
        let since = |secs| SinceAutosave::Elapsed(Duration::seconds(secs));
        assert!(!is_overdue(since(110), 2));
        assert!(!is_overdue(since(120), 2)); // exactly 2 minutes: not yet
        assert!(is_overdue(since(180), 2));
        assert!(!is_overdue(SinceAutosave::Never, 2));
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_with_ellipsis("Sculpt", 20), "Sculpt");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let out = truncate_with_ellipsis("Sculpt Stroke (sculpt_plus)", 10);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 10);
    }
}
