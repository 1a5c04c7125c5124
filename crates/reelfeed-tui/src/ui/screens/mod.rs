//! Per-route screen rendering.

pub mod feed;
pub mod login;
pub mod signup;
pub mod upload;
pub mod video;

use ratatui::text::{Line, Span};

use super::styles;

/// Width of the value column in form fields
const FIELD_WIDTH: usize = 32;

/// One `Label: [value▌]` form row. Long values show their tail.
pub(crate) fn form_field<'a>(label: &str, value: &str, focused: bool, masked: bool) -> Line<'a> {
    let shown: String = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let count = shown.chars().count();
    let visible: String = shown.chars().skip(count.saturating_sub(FIELD_WIDTH - 1)).collect();
    let cursor = if focused { "▌" } else { "" };

    Line::from(vec![
        Span::styled(format!("  {:>12}: [", label), styles::muted_style()),
        Span::styled(
            format!("{:<width$}", format!("{}{}", visible, cursor), width = FIELD_WIDTH),
            styles::input_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Submit button row; shows `busy_label` while the request runs
pub(crate) fn form_button<'a>(label: &str, busy_label: &str, focused: bool, busy: bool) -> Line<'a> {
    let text = if busy {
        format!("  {}  ", busy_label)
    } else if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let style = if busy {
        styles::muted_style()
    } else {
        styles::input_style(focused)
    };

    Line::from(vec![
        Span::raw("                ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}
