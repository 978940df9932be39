//! Club page rendering (forum, composer, members panel)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

use crate::markup::{message_edit_entry, message_entry};
use crate::model::{ClubFocus, ClubPage, HitMap, HitTarget, Session};
use super::utils::{bordered, render_entry_stack, render_pane_status, selection_style, truncate_string};

pub fn render_club_page(
    frame: &mut Frame,
    area: Rect,
    page: Option<&ClubPage>,
    session: &Session,
    hit_map: &mut HitMap,
) {
    let Some(page) = page else {
        let empty = Paragraph::new("No club selected. Start with --club <id> to open a forum.")
            .style(Style::default().fg(Color::DarkGray))
            .block(bordered("Club", false));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(68), // Forum + composer
            Constraint::Percentage(32), // Members
        ])
        .split(area);

    let notice_rows = page.notices().len() as u16;
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(notice_rows),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(columns[0]);

    if notice_rows > 0 {
        let notices: Vec<Line> = page
            .notices()
            .iter()
            .map(|notice| Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Red))))
            .collect();
        frame.render_widget(Paragraph::new(notices), left[0]);
    }

    render_forum(frame, left[1], page, session, hit_map);
    render_composer(frame, left[2], page, hit_map);
    render_members(frame, columns[1], page, hit_map);
}

fn render_forum(frame: &mut Frame, area: Rect, page: &ClubPage, session: &Session, hit_map: &mut HitMap) {
    let focused = page.focus() == ClubFocus::Forum;
    let block = bordered(&format!("Club #{} forum", page.club_id()), focused);
    hit_map.register(area, HitTarget::ClubPane(ClubFocus::Forum));
    if render_pane_status(frame, area, page.messages(), block.clone(), "") {
        return;
    }
    let Some(messages) = page.messages().loaded() else {
        return;
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if messages.is_empty() {
        frame.render_widget(
            Paragraph::new("No messages yet. Be the first to write one!")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let entries = messages
        .iter()
        .map(|message| match page.editing() {
            Some(edit) if edit.message_id == message.id => message_edit_entry(edit),
            _ => message_entry(message, session),
        })
        .collect();
    render_entry_stack(
        frame,
        inner,
        entries,
        Some(page.selected()),
        hit_map,
        HitTarget::ForumMessage,
    );
}

fn render_composer(frame: &mut Frame, area: Rect, page: &ClubPage, hit_map: &mut HitMap) {
    let focused = page.focus() == ClubFocus::Composer;
    let text = if page.composer().is_empty() && !focused {
        Span::styled("Write a message...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("{}{}", page.composer(), if focused { "▏" } else { "" }))
    };
    frame.render_widget(
        Paragraph::new(Line::from(text)).block(bordered("New message (Enter to send)", focused)),
        area,
    );
    hit_map.register(area, HitTarget::ClubPane(ClubFocus::Composer));
}

fn render_members(frame: &mut Frame, area: Rect, page: &ClubPage, hit_map: &mut HitMap) {
    let focused = page.focus() == ClubFocus::Members;
    let block = bordered("Members", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    hit_map.register(area, HitTarget::ClubPane(ClubFocus::Members));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(page.suggestions().len().min(8) as u16 + 1),
            Constraint::Min(0),
        ])
        .split(inner);

    let query = Line::from(vec![
        Span::styled("User: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}{}", page.member_query(), if focused { "▏" } else { "" }),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    frame.render_widget(Paragraph::new(query), rows[0]);

    let width = rows[1].width as usize;
    let suggestions: Vec<Line> = page
        .suggestions()
        .iter()
        .take(8)
        .enumerate()
        .map(|(i, suggestion)| {
            let row = Rect::new(rows[1].x, rows[1].y + i as u16, rows[1].width, 1);
            hit_map.register(row, HitTarget::UserSuggestion(i));
            Line::from(truncate_string(suggestion, width))
                .style(selection_style(i == page.suggestion_selected()))
        })
        .collect();
    frame.render_widget(Paragraph::new(suggestions), rows[1]);

    let mut log = vec![Line::from(Span::styled(
        "Enter add · Del remove",
        Style::default().fg(Color::DarkGray),
    ))];
    log.extend(
        page.membership_log()
            .iter()
            .map(|entry| Line::from(Span::styled(entry.clone(), Style::default().fg(Color::Green)))),
    );
    frame.render_widget(
        Paragraph::new(log)
            .wrap(Wrap { trim: false })
            .block(Block::default()),
        rows[2],
    );
}
