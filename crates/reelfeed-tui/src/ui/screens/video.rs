use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use reelfeed_core::browse::{VideoDetail, VideoLookup};

use crate::app::App;
use crate::ui::render::render_placeholder;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match &app.video.lookup {
        None => render_placeholder(frame, area, "Loading video..."),
        Some(VideoLookup::NotFound) => render_not_found(frame, area),
        Some(VideoLookup::Failed(message)) => render_failed(frame, message, area),
        Some(VideoLookup::Found(detail)) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(area);

            render_details(frame, detail, chunks[0]);
            render_recommendations(frame, app, detail, chunks[1]);
        }
    }
}

fn render_details(frame: &mut Frame, detail: &VideoDetail, area: Rect) {
    let video = &detail.video;

    let mut lines = vec![
        Line::from(Span::styled(video.title.clone(), styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Uploaded by: ", styles::muted_style()),
            Span::styled(video.uploader.name.clone(), styles::highlight_style()),
        ]),
        Line::from(vec![
            Span::styled("Date:        ", styles::muted_style()),
            Span::raw(video.upload_date_display()),
        ]),
        Line::from(vec![
            Span::styled("Watch:       ", styles::muted_style()),
            Span::raw(video.video_url.clone()),
        ]),
    ];

    if !video.description.trim().is_empty() {
        lines.push(Line::from(""));
        for paragraph in video.description.lines() {
            lines.push(Line::from(paragraph.to_string()));
        }
    }

    let block = Block::default()
        .title(" Video ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(paragraph, area);
}

fn render_recommendations(frame: &mut Frame, app: &App, detail: &VideoDetail, area: Rect) {
    let block = Block::default()
        .title(" Recommended Videos ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (banner_area, list_area) = match detail.recommendations_error {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(inner);
            (Some(chunks[0]), chunks[1])
        }
        None => (None, inner),
    };

    if let (Some(area), Some(error)) = (banner_area, &detail.recommendations_error) {
        let banner = Paragraph::new(vec![
            Line::from(Span::styled("Error", styles::error_style())),
            Line::from(Span::styled(error.clone(), styles::error_style())),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(banner, area);
    }

    if detail.recommended.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No recommendations available.",
            styles::muted_style(),
        )));
        frame.render_widget(paragraph, list_area);
        return;
    }

    let items: Vec<ListItem> = detail
        .recommended
        .iter()
        .enumerate()
        .map(|(i, video)| {
            let style = if i == app.video.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(vec![
                Line::from(video.title.clone()),
                Line::from(Span::styled(
                    format!("  {} · {}", video.uploader.name, video.upload_date_display()),
                    styles::muted_style(),
                )),
            ])
            .style(style)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.video.selection));
    frame.render_stateful_widget(List::new(items), list_area, &mut state);
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Video Not Found", styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(
            "  The video you are looking for does not exist.",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Esc]", styles::help_key_style()),
            Span::styled(" back to videos", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_failed(frame: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", message), styles::error_style())),
    ];

    let block = Block::default()
        .title(" Video ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}
