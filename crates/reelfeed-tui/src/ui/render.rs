use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use reelfeed_core::routes::Route;
use reelfeed_core::SessionState;

use crate::app::{App, AppState};
use crate::notifications::NotificationKind;

use super::screens::{feed, login, signup, upload, video};
use super::styles;

/// Width of a toast box
const TOAST_WIDTH: u16 = 44;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_nav_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    render_notifications(frame, app, chunks[1]);

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  ▶ reelfeed";

    let right: Vec<Span> = match app.session.state() {
        SessionState::Unresolved => vec![Span::styled("Loading session...", styles::muted_style())],
        SessionState::Authenticated => {
            let mut spans = Vec::new();
            if let Some(user) = app.session.current_user() {
                spans.push(Span::styled(
                    format!("({}) {} ", user.initial(), user.name),
                    styles::highlight_style(),
                ));
                spans.push(Span::styled(format!("<{}>", user.email), styles::muted_style()));
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled("[u]", styles::help_key_style()));
            spans.push(Span::raw("pload  "));
            spans.push(Span::styled("[o]", styles::help_key_style()));
            spans.push(Span::raw(" log out"));
            spans
        }
        SessionState::Anonymous => vec![
            Span::styled("[l]", styles::help_key_style()),
            Span::raw("ogin  "),
            Span::styled("[s]", styles::help_key_style()),
            Span::raw("ign up"),
        ],
    };

    let right_width: usize = right.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(title.chars().count() + right_width + 2);

    let mut spans = vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
    ];
    spans.extend(right);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.is_waiting_for_session() {
        render_placeholder(frame, area, "Checking your session...");
        return;
    }

    match &app.route {
        Route::Home(_) => feed::render(frame, app, area),
        Route::Video { .. } => video::render(frame, app, area),
        Route::Login => login::render(frame, app, area),
        Route::Signup => signup::render(frame, app, area),
        Route::Upload => upload::render(frame, app, area),
    }
}

/// Centered single message, used for loading states
pub fn render_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let y = area.y + area.height / 2;
    let line_area = Rect::new(area.x, y.min(area.y + area.height.saturating_sub(1)), area.width, 1);
    let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, line_area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.route {
        Route::Home(_) => "↑/↓ select | Enter open | ←/→ page | Home/End first/last | Tab page bar | q quit",
        Route::Video { .. } => "↑/↓ select | Enter open | Esc back | q quit",
        Route::Login | Route::Signup | Route::Upload => "Tab next field | Enter submit | Esc back",
    };

    let left_text = format!(" {} ", app.route);
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Toasts stacked in the top-right corner of the content area, newest last
fn render_notifications(frame: &mut Frame, app: &App, area: Rect) {
    if app.notifications.is_empty() {
        return;
    }

    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    let mut y = area.y;

    for notification in app.notifications.iter() {
        let inner_width = width.saturating_sub(2).max(1) as usize;
        let description_rows = notification.description.chars().count().div_ceil(inner_width).max(1);
        let height = (description_rows as u16 + 3).min(area.height);
        if y + height > area.y + area.height {
            break;
        }

        let toast_area = Rect::new(x, y, width, height);
        frame.render_widget(Clear, toast_area);

        let (border, title_style) = match notification.kind {
            NotificationKind::Success => (styles::success_style(), styles::success_style()),
            NotificationKind::Error => (styles::error_style(), styles::error_style()),
        };

        let block = Block::default()
            .title(format!(" {} ", notification.title))
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_style(border);

        let paragraph = Paragraph::new(notification.description.as_str())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, toast_area);

        y += height;
    }
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 7, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
