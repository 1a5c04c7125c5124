use ratatui::style::{Color, Modifier, Style};

// Palette
pub const BRAND: Color = Color::Rgb(220, 72, 72);
pub const LINK: Color = Color::Rgb(96, 148, 220);
pub const KEY: Color = Color::Rgb(230, 180, 80);
pub const OK: Color = Color::Rgb(88, 176, 112);
pub const FAIL: Color = Color::Rgb(224, 96, 96);
pub const DIM: Color = Color::Rgb(136, 136, 144);
pub const SURFACE: Color = Color::Rgb(40, 40, 52);
pub const OFF: Color = Color::Rgb(70, 70, 78);
const TEXT: Color = Color::Rgb(230, 230, 235);

pub fn title_style() -> Style {
    Style::new().fg(BRAND).add_modifier(Modifier::BOLD)
}

/// Highlighted row in the feed and recommendation lists
pub fn selected_style() -> Style {
    Style::new().bg(SURFACE).fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::new().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::new().fg(DIM)
}

pub fn highlight_style() -> Style {
    Style::new().fg(LINK)
}

pub fn success_style() -> Style {
    Style::new().fg(OK)
}

pub fn error_style() -> Style {
    Style::new().fg(FAIL)
}

pub fn border_style(focused: bool) -> Style {
    Style::new().fg(if focused { BRAND } else { DIM })
}

pub fn status_bar_style() -> Style {
    Style::new().bg(Color::Rgb(24, 24, 32)).fg(TEXT)
}

pub fn help_key_style() -> Style {
    Style::new().fg(KEY).add_modifier(Modifier::BOLD)
}

/// Numbered page link; the current page is inverted, the cursor underlined
pub fn page_link_style(active: bool, under_cursor: bool) -> Style {
    let style = if active {
        Style::new().fg(Color::Black).bg(BRAND).add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(LINK)
    };
    if under_cursor {
        style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED)
    } else {
        style
    }
}

/// Previous/Next control, dimmed when there is nowhere to go
pub fn page_control_style(enabled: bool) -> Style {
    Style::new().fg(if enabled { KEY } else { OFF })
}

/// Form input; focused fields get the selection background
pub fn input_style(focused: bool) -> Style {
    if focused {
        selected_style()
    } else {
        list_item_style()
    }
}
