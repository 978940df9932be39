//! Browse screen and its search/details overlays

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

use crate::markup::{book_detail, book_summary};
use crate::model::{HitMap, HitTarget, NO_RESULTS, Overlay, Pane, ViewSnapshot};
use super::utils::{bordered, centered_rect, render_entry_stack, render_pane_status};

pub fn render_browse(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot, hit_map: &mut HitMap) {
    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Welcome to the Den",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from("Press / or click the search bar to look for books."),
        Line::from("Open a result to see its details, then press o for the full book page."),
        Line::from("Press c to open your reading club forum."),
    ])
    .style(Style::default().fg(Color::Gray))
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(intro, area);

    match snapshot.panels.overlay() {
        Overlay::Closed => {}
        Overlay::Search => render_search_overlay(frame, area, snapshot, hit_map),
        Overlay::Details => render_details_overlay(frame, area, snapshot, hit_map),
    }
}

fn render_search_overlay(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot, hit_map: &mut HitMap) {
    let popup = centered_rect(area, 80, 90);
    frame.render_widget(Clear, popup);
    hit_map.register(popup, HitTarget::SearchOverlay);

    let block = bordered("Search results", true).style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let query = Line::from(vec![
        Span::styled("Query: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}▏", snapshot.ui.search_input),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    frame.render_widget(Paragraph::new(query), chunks[0]);

    let results = snapshot.panels.results();
    if render_pane_status(
        frame,
        chunks[1],
        results,
        Block::default(),
        "Type a title and press Enter.",
    ) {
        return;
    }
    if let Pane::Loaded(books) = results {
        if books.is_empty() {
            frame.render_widget(
                Paragraph::new(NO_RESULTS).style(Style::default().fg(Color::DarkGray)),
                chunks[1],
            );
            return;
        }
        let entries = books.iter().map(book_summary).collect();
        render_entry_stack(
            frame,
            chunks[1],
            entries,
            Some(snapshot.panels.selected_result()),
            hit_map,
            HitTarget::SearchResult,
        );
    }
}

fn render_details_overlay(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot, hit_map: &mut HitMap) {
    let popup = centered_rect(area, 80, 90);
    frame.render_widget(Clear, popup);
    hit_map.register(popup, HitTarget::DetailsOverlay);

    let block = bordered("Book details", true).style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let details = snapshot.panels.details();
    if render_pane_status(frame, inner, details, Block::default(), "") {
        return;
    }
    let Some(book) = details.loaded() else {
        return;
    };

    let mut text = book_detail(book, &snapshot.session);
    // The reading list hint gets its own row so it can be clicked
    let hint = if snapshot.session.is_logged_in() {
        text.lines.pop()
    } else {
        None
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(if hint.is_some() { 1 } else { 0 }),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), chunks[0]);
    if let Some(hint) = hint {
        frame.render_widget(Paragraph::new(hint), chunks[1]);
        hit_map.register(chunks[1], HitTarget::ReadingListButton);
    }
}
