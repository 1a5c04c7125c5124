use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use reelfeed_core::pagination::{PageItem, PageWindow};

use crate::app::{App, FeedFocus};
use crate::ui::render::render_placeholder;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let feed = &app.feed;

    let title = match &feed.page {
        Some(page) => {
            let mut title = format!(" Videos · page {} of {} ", feed.query.page, page.response.page_count());
            if let Some(age) = page.cached_age.as_ref().filter(|_| page.stale) {
                title.push_str(&format!("(offline, cached {}) ", age));
            }
            title
        }
        None => " Videos ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if feed.loading && feed.page.is_none() {
        frame.render_widget(block, chunks[0]);
        render_placeholder(frame, chunks[0], "Loading videos...");
        return;
    }

    if let Some(ref error) = feed.error {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", error), styles::error_style())),
        ])
        .wrap(Wrap { trim: false })
        .block(block);
        frame.render_widget(paragraph, chunks[0]);
        return;
    }

    let Some(page) = &feed.page else {
        frame.render_widget(block, chunks[0]);
        return;
    };

    if page.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(page.empty_message(), styles::muted_style())),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, chunks[0]);
        return;
    }

    let items: Vec<ListItem> = page
        .videos()
        .iter()
        .enumerate()
        .map(|(i, video)| {
            let selected = i == feed.selection;
            let mut lines = vec![
                Line::from(Span::styled(video.title.clone(), styles::title_style())),
                Line::from(vec![
                    Span::styled("  by ", styles::muted_style()),
                    Span::styled(video.uploader.name.clone(), styles::highlight_style()),
                    Span::styled(format!("  ·  {}", video.upload_date_display()), styles::muted_style()),
                ]),
            ];
            if let Some(excerpt) = video.description_excerpt() {
                lines.push(Line::from(Span::styled(format!("  {}", excerpt), styles::muted_style())));
            }
            lines.push(Line::from(""));

            let style = if selected {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(lines).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(feed.selection));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    if page.shows_pagination() {
        let cursor = (feed.focus == FeedFocus::Pages).then_some(feed.page_cursor);
        render_pagination(frame, &page.window(), cursor, chunks[1]);
    }
}

fn render_pagination(frame: &mut Frame, window: &PageWindow, cursor: Option<u32>, area: Rect) {
    let mut spans = vec![Span::styled(
        "‹ Previous",
        styles::page_control_style(window.previous().is_some()),
    )];
    spans.push(Span::raw("   "));

    for item in window.items() {
        match item {
            PageItem::Page { number, active } => {
                spans.push(Span::styled(
                    format!(" {} ", number),
                    styles::page_link_style(active, cursor == Some(number)),
                ));
            }
            PageItem::Ellipsis => spans.push(Span::styled(" … ", styles::muted_style())),
        }
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        "Next ›",
        styles::page_control_style(window.next().is_some()),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
