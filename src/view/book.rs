//! Book page rendering (header, tab strip, active tab pane)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::markup::{club_entry, comment_entry, star_rating};
use crate::model::{BookPage, BookTab, HitMap, HitTarget};
use super::utils::{bordered, render_pane_status, selection_style};

const TAB_SEPARATOR: &str = " │ ";

pub fn render_book_page(frame: &mut Frame, area: Rect, page: Option<&BookPage>, hit_map: &mut HitMap) {
    let Some(page) = page else {
        let empty = Paragraph::new("Open a book from the search results to see its page.")
            .style(Style::default().fg(Color::DarkGray))
            .block(bordered("Book", false));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + authors
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Active pane
        ])
        .split(area);

    let book = page.book();
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            book.title.clone().unwrap_or_default(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(book.authors.join(", "), Style::default().fg(Color::Cyan))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(header, chunks[0]);

    render_tab_strip(frame, chunks[1], page, hit_map);

    let tab = page.active_tab();
    let pane = chunks[2];
    match tab {
        BookTab::Description => {
            let text = book.description.clone().unwrap_or_default();
            let description = Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(bordered(tab.title(), true));
            frame.render_widget(description, pane);
        }
        BookTab::Statistics => render_statistics(frame, pane, page),
        BookTab::Comments => render_comments(frame, pane, page),
        BookTab::AddComment => render_add_comment(frame, pane),
        BookTab::Clubs => render_clubs(frame, pane, page, hit_map),
    }
}

fn render_tab_strip(frame: &mut Frame, area: Rect, page: &BookPage, hit_map: &mut HitMap) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = Vec::new();
    let mut x = inner.x;
    for (i, tab) in BookTab::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(TAB_SEPARATOR, Style::default().fg(Color::DarkGray)));
            x = x.saturating_add(TAB_SEPARATOR.chars().count() as u16);
        }
        let loading = match tab {
            BookTab::Comments => page.comments().is_loading(),
            BookTab::Clubs => page.clubs().is_loading(),
            _ => false,
        };
        let label = format!("{} {}{}", i + 1, tab.title(), if loading { "…" } else { "" });
        let width = label.chars().count() as u16;
        let style = if page.is_active(tab) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let visible = width.min(inner.right().saturating_sub(x));
        hit_map.register(Rect::new(x, inner.y, visible, 1), HitTarget::BookTab(tab));
        spans.push(Span::styled(label, style));
        x = x.saturating_add(width);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_statistics(frame: &mut Frame, area: Rect, page: &BookPage) {
    let book = page.book();
    let row = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:>12}  "), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ])
    };
    let lines = vec![
        row("Rating", star_rating(book.average_rating)),
        row("Pages", format!("{} pages", book.page_count)),
        row("Publisher", book.publisher.clone().unwrap_or_default()),
        row("Published", book.published_date.clone().unwrap_or_default()),
        row("Categories", book.categories.join(", ")),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(bordered(BookTab::Statistics.title(), true)),
        area,
    );
}

fn render_comments(frame: &mut Frame, area: Rect, page: &BookPage) {
    let block = bordered(BookTab::Comments.title(), true);
    if render_pane_status(frame, area, page.comments(), block.clone(), "") {
        return;
    }
    let Some(comments) = page.comments().loaded() else {
        return;
    };
    let mut lines = Vec::new();
    for comment in comments {
        lines.extend(comment_entry(comment).lines);
        lines.push(Line::default());
    }
    if comments.is_empty() {
        lines.push(Line::from(Span::styled("No comments yet.", Style::default().fg(Color::DarkGray))));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_add_comment(frame: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let text = Text::from(vec![
        Line::from("Comments are written on the Den website, where the form is protected."),
        Line::default(),
        Line::from(vec![Span::styled("Rating       ", label), Span::raw("0 to 5 stars")]),
        Line::from(vec![Span::styled("Comment      ", label), Span::raw("free text")]),
        Line::from(vec![
            Span::styled("Audience     ", label),
            Span::raw("Private (my eyes only)"),
        ]),
        Line::from(vec![
            Span::raw("             "),
            Span::raw("Public (visible to all Den's members)"),
        ]),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(bordered(BookTab::AddComment.title(), true)),
        area,
    );
}

fn render_clubs(frame: &mut Frame, area: Rect, page: &BookPage, hit_map: &mut HitMap) {
    let block = bordered(BookTab::Clubs.title(), true);
    if render_pane_status(frame, area, page.clubs(), block.clone(), "") {
        return;
    }
    let Some(clubs) = page.clubs().loaded() else {
        return;
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(Span::styled(
        "On the reading list of:",
        Style::default().fg(Color::Yellow),
    ))];
    if clubs.included.is_empty() {
        lines.push(Line::from(Span::styled("none yet", Style::default().fg(Color::DarkGray))));
    }
    lines.extend(clubs.included.iter().map(|name| club_entry(name)));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Add to another club (Enter):",
        Style::default().fg(Color::Yellow),
    )));
    let header_rows = lines.len() as u16;

    for (i, name) in clubs.choices.iter().enumerate() {
        let row = inner.y.saturating_add(header_rows + i as u16);
        if row < inner.bottom() {
            hit_map.register(Rect::new(inner.x, row, inner.width, 1), HitTarget::ClubChoice(i));
        }
        lines.push(club_entry(name).style(selection_style(i == page.club_selected())));
    }
    if clubs.choices.is_empty() {
        lines.push(Line::from(Span::styled(
            "No other clubs available",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
