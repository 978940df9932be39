//! Layout rendering (top bar with the search trigger, footer hints)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{HitMap, HitTarget, Overlay, Screen, ViewSnapshot};

pub fn render_top_bar(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot, hit_map: &mut HitMap) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search trigger
            Constraint::Length(30), // Screen switcher
        ])
        .split(area);

    let searching = snapshot.panels.overlay() == Overlay::Search;
    let search_style = if searching {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if snapshot.ui.search_input.is_empty() {
        "Press / to search books..."
    } else {
        &snapshot.ui.search_input
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(if searching {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(search, chunks[0]);
    hit_map.register(chunks[0], HitTarget::SearchTrigger);

    let screens = [(Screen::Browse, "b Browse"), (Screen::Book, "Book"), (Screen::Club, "c Club")];
    let mut spans = Vec::new();
    for (i, (screen, name)) in screens.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        let style = if *screen == snapshot.ui.screen {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(*name, style));
    }
    let switcher = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" BookwormDen "));
    frame.render_widget(switcher, chunks[1]);
}

pub fn render_footer(frame: &mut Frame, area: Rect, snapshot: &ViewSnapshot) {
    let user = match &snapshot.session.username {
        Some(name) => format!(" Signed in as {name} "),
        None => " Not signed in ".to_string(),
    };
    let hints = match (snapshot.ui.screen, snapshot.panels.overlay()) {
        (Screen::Browse, Overlay::Search) => "Enter search/open · ↑↓ select · Esc close",
        (Screen::Browse, Overlay::Details) => "o open page · a reading list · Esc close",
        (Screen::Browse, Overlay::Closed) => "/ search · c club · ? help · q quit",
        (Screen::Book, _) => "1-5 / ←→ tabs · ↑↓ select club · Enter add · Esc back",
        (Screen::Club, _) => "Tab focus · ↑↓ select · e edit · d remove · Esc back",
    };

    let line = Line::from(vec![
        Span::styled(user, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
