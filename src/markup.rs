//! Text builders for server records
//!
//! Every builder is a pure mapping from a record to styled ratatui text.
//! Missing optional fields render as empty text.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use crate::model::{Book, Comment, Message, PendingEdit, Session};

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';
const MAX_STARS: usize = 5;

pub const READING_LIST_HINT: &str = "[a] Add to reading list";

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn label(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn title_line(book: &Book) -> Line<'static> {
    Line::from(Span::styled(
        text_or_empty(&book.title),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))
}

fn multiline(text: &str, style: Style) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

/// Exactly five symbols, filled first. Fractions round down and the count
/// is clamped to the range; NaN counts as zero.
pub fn star_rating(rating: f64) -> String {
    let filled = if rating.is_nan() {
        0
    } else {
        rating.floor().clamp(0.0, MAX_STARS as f64) as usize
    };
    let mut stars = String::with_capacity(MAX_STARS * 3);
    stars.extend(std::iter::repeat_n(FILLED_STAR, filled));
    stars.extend(std::iter::repeat_n(EMPTY_STAR, MAX_STARS - filled));
    stars
}

/// A search result entry.
pub fn book_summary(book: &Book) -> Text<'static> {
    let mut lines = vec![
        title_line(book),
        Line::from(Span::styled(
            book.authors.join(", "),
            Style::default().fg(Color::Cyan),
        )),
        label("Published", text_or_empty(&book.published_date)),
    ];
    lines.extend(multiline(
        &text_or_empty(&book.description),
        Style::default().fg(Color::Gray),
    ));
    lines.push(label("Cover", text_or_empty(&book.thumbnail)));
    Text::from(lines)
}

/// Full detail view. The reading list hint is only offered to a logged-in user.
pub fn book_detail(book: &Book, session: &Session) -> Text<'static> {
    let mut lines = vec![
        title_line(book),
        Line::from(Span::styled(
            book.authors.join(", "),
            Style::default().fg(Color::Cyan),
        )),
        label("Published", text_or_empty(&book.published_date)),
        label("Publisher", text_or_empty(&book.publisher)),
        Line::from(format!("{} pages", book.page_count)),
        Line::from(Span::styled(
            star_rating(book.average_rating),
            Style::default().fg(Color::Yellow),
        )),
        label("Categories", book.categories.join(", ")),
        Line::default(),
    ];
    lines.extend(multiline(
        &text_or_empty(&book.description),
        Style::default().fg(Color::Gray),
    ));
    lines.push(label("Cover", text_or_empty(&book.thumbnail)));
    if session.is_logged_in() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            READING_LIST_HINT,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    }
    Text::from(lines)
}

pub fn comment_entry(comment: &Comment) -> Text<'static> {
    let mut lines = multiline(&text_or_empty(&comment.comment), Style::default());
    lines.push(Line::from(vec![
        Span::styled(
            format!("by {}", text_or_empty(&comment.username)),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Rating: {}", text_or_empty(&comment.rating)),
            Style::default().fg(Color::Yellow),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!("posted on {}", text_or_empty(&comment.date)),
        Style::default().fg(Color::DarkGray),
    )));
    Text::from(lines)
}

pub fn club_entry(name: &str) -> Line<'static> {
    Line::from(format!("• {name}"))
}

/// A forum message. Remove and edit hints appear on the session user's own
/// messages only.
pub fn message_entry(message: &Message, session: &Session) -> Text<'static> {
    let mut header = vec![
        Span::styled(
            message.author_name(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(message.timestamp.clone(), Style::default().fg(Color::DarkGray)),
    ];
    if session.is_author_of(message) {
        header.push(Span::raw("  "));
        header.push(Span::styled(
            "[e] edit  [d] remove",
            Style::default().fg(Color::Magenta),
        ));
    }
    let mut lines = vec![Line::from(header)];
    lines.extend(multiline(&message.message, Style::default()));
    Text::from(lines)
}

/// The in-place edit control that replaces a message while it is edited.
pub fn message_edit_entry(edit: &PendingEdit) -> Text<'static> {
    let mut lines = vec![Line::from(Span::styled(
        "Editing (Enter to save, Esc to cancel)",
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(multiline(
        &format!("{}▏", edit.buffer),
        Style::default().fg(Color::Yellow),
    ));
    if edit.is_modified() {
        lines.push(Line::from(Span::styled(
            format!("was: {}", edit.original),
            Style::default().fg(Color::DarkGray),
        )));
    }
    Text::from(lines)
}

/// The paragraph shown in place of a pane's content after a failure.
pub fn error_paragraph(message: &str) -> Text<'static> {
    Text::from(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    )))
}

#[cfg(test)]
pub(crate) fn plain(text: &Text) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
