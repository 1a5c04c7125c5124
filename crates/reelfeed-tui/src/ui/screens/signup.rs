use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, SignupField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{form_button, form_field};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.signup;
    let dialog = centered_rect_fixed(56, 10, area);
    frame.render_widget(Clear, dialog);

    let lines = vec![
        Line::from(""),
        form_field("Name", &form.name, form.focus == SignupField::Name, false),
        form_field("Email", &form.email, form.focus == SignupField::Email, false),
        form_field("Password", &form.password, form.focus == SignupField::Password, true),
        Line::from(""),
        form_button(
            "Sign up",
            "Creating account...",
            form.focus == SignupField::Button,
            form.submitting,
        ),
    ];

    let block = Block::default()
        .title(" Create an account ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}
