use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{form_button, form_field};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let dialog = centered_rect_fixed(56, 11, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from(""),
        form_field("Email", &form.email, form.focus == LoginField::Email, false),
        form_field("Password", &form.password, form.focus == LoginField::Password, true),
        Line::from(""),
        form_button(
            "Login",
            "Logging in...",
            form.focus == LoginField::Button,
            form.submitting,
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("  No account? Press ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" then ", styles::muted_style()),
            Span::styled("[s]", styles::help_key_style()),
            Span::styled(" to sign up.", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Log in ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}
