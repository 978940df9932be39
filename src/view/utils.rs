//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Text,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::markup::error_paragraph;
use crate::model::{HitMap, HitTarget, Pane};

/// A popup rectangle centered in `area`, sized as a percentage of it.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let scale = |length: u16, percent: u16| (u32::from(length) * u32::from(percent.min(100)) / 100) as u16;
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn bordered(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .padding(Padding::horizontal(1))
        .border_style(border_style)
}

pub fn selection_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Draw the placeholder for a pane that has no content to show. Returns
/// false when the pane is loaded and the caller should draw it.
pub fn render_pane_status<T>(frame: &mut Frame, area: Rect, pane: &Pane<T>, block: Block, idle: &str) -> bool {
    let paragraph = match pane {
        Pane::Loaded(_) => return false,
        Pane::Idle => Paragraph::new(idle.to_string()).style(Style::default().fg(Color::DarkGray)),
        Pane::Loading => Paragraph::new("Loading...").style(Style::default().fg(Color::Yellow)),
        Pane::Failed(message) => Paragraph::new(error_paragraph(message)),
    };
    frame.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
    true
}

/// Rows `text` occupies once wrapped to `width` columns.
fn wrapped_height(text: &Text, width: u16) -> usize {
    let width = usize::from(width.max(1));
    text.lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum::<usize>()
        .max(1)
}

/// Stack multi-line entries top to bottom, scrolled so the selected entry
/// is visible. Long lines wrap inside the entry. Each drawn entry is
/// registered under `target(index)`.
pub fn render_entry_stack(
    frame: &mut Frame,
    area: Rect,
    entries: Vec<Text<'static>>,
    selected: Option<usize>,
    hit_map: &mut HitMap,
    target: impl Fn(usize) -> HitTarget,
) {
    // The left marker border takes one column
    let text_width = area.width.saturating_sub(1);
    // One extra row per entry for the gap below it
    let heights: Vec<usize> = entries
        .iter()
        .map(|entry| wrapped_height(entry, text_width) + 1)
        .collect();

    let mut first = 0;
    if let Some(selected) = selected.filter(|s| *s < entries.len()) {
        while first < selected && heights[first..=selected].iter().sum::<usize>() > usize::from(area.height) {
            first += 1;
        }
    }

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (index, entry) in entries.into_iter().enumerate().skip(first) {
        if y >= bottom {
            break;
        }
        let room = bottom - y;
        let height = (heights[index] - 1).min(usize::from(room)) as u16;
        let entry_area = Rect::new(area.x, y, area.width, height);
        let is_selected = selected == Some(index);
        let marker = Block::default().borders(Borders::LEFT).border_style(if is_selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        });
        frame.render_widget(
            Paragraph::new(entry).wrap(Wrap { trim: false }).block(marker),
            entry_area,
        );
        hit_map.register(entry_area, target(index));
        y = y.saturating_add(heights[index].min(usize::from(room)) as u16);
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}
