use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, UploadField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{form_button, form_field};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let upload = &app.upload;
    let height = if upload.error.is_some() { 14 } else { 12 };
    let dialog = centered_rect_fixed(60, height, area);
    frame.render_widget(Clear, dialog);

    let mut lines = vec![
        Line::from(""),
        form_field("Video file", &upload.file_input, upload.focus == UploadField::File, false),
        form_field("Title", &upload.form.title, upload.focus == UploadField::Title, false),
        form_field(
            "Description",
            &upload.form.description,
            upload.focus == UploadField::Description,
            false,
        ),
        Line::from(Span::styled(
            "                MP4 only. Description is optional.",
            styles::muted_style(),
        )),
        Line::from(""),
        form_button(
            "Upload",
            "Uploading...",
            upload.focus == UploadField::Button,
            upload.loading,
        ),
    ];

    if let Some(ref error) = upload.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(" Upload a video ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), dialog);
}
