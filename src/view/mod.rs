//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared helpers (popup geometry, pane placeholders, entry stacks)
//! - `layout`: Top bar with the search trigger and the footer
//! - `browse`: Browse screen with the search and details overlays
//! - `book`: Book page with its tab strip
//! - `club`: Club forum and members panel
//! - `overlays`: Modal overlays (error, help)
//!
//! Rendering returns the [`HitMap`] of the frame so mouse clicks can be
//! resolved against exactly what was drawn.

mod utils;
mod layout;
mod browse;
mod book;
mod club;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{HitMap, HitTarget, Screen, ViewSnapshot};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, snapshot: &ViewSnapshot) -> HitMap {
        let mut hit_map = HitMap::new();
        hit_map.register(frame.area(), HitTarget::Background);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + screen switcher
                Constraint::Min(0),    // Active screen
                Constraint::Length(1), // Footer hints
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], snapshot, &mut hit_map);

        match snapshot.ui.screen {
            Screen::Browse => browse::render_browse(frame, chunks[1], snapshot, &mut hit_map),
            Screen::Book => book::render_book_page(frame, chunks[1], snapshot.book_page.as_ref(), &mut hit_map),
            Screen::Club => club::render_club_page(
                frame,
                chunks[1],
                snapshot.club_page.as_ref(),
                &snapshot.session,
                &mut hit_map,
            ),
        }

        layout::render_footer(frame, chunks[2], snapshot);

        // Error notification overlay (if there's an error)
        if snapshot.ui.error_message.is_some() {
            overlays::render_error_notification(frame, &snapshot.ui);
        }

        // Help popup overlay (if open)
        if snapshot.ui.show_help_popup {
            overlays::render_help_popup(frame);
        }

        hit_map
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::*;
    use crate::model::{
        Book, BookPage, BookTab, ClubChoices, Overlay, PanelController, SEARCH_ERROR, Session, UiState,
    };
    use crate::gateway::GatewayError;

    fn snapshot(panels: PanelController, session: Session) -> ViewSnapshot {
        ViewSnapshot {
            ui: UiState::default(),
            panels,
            book_page: None,
            club_page: None,
            session,
        }
    }

    fn draw(snapshot: &ViewSnapshot) -> (String, HitMap) {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut hit_map = HitMap::new();
        terminal
            .draw(|frame| hit_map = AppView::render(frame, snapshot))
            .unwrap();
        (screen_text(terminal.backend().buffer()), hit_map)
    }

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn book(id: &str, title: &str, author: &str) -> Book {
        Book {
            id: id.to_string(),
            title: Some(title.to_string()),
            authors: vec![author.to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn search_results_render_in_server_order() {
        let mut panels = PanelController::new();
        panels.open_search();
        let request = panels.begin_search("herbert").unwrap();
        panels.apply_search(
            request.token,
            Ok(vec![book("1", "Dune", "Frank Herbert"), book("2", "Chapterhouse", "Brian Herbert")]),
        );

        let (text, hit_map) = draw(&snapshot(panels, Session::default()));

        let dune = text.find("Dune").unwrap();
        let chapterhouse = text.find("Chapterhouse").unwrap();
        assert!(dune < chapterhouse);
        assert!(text.contains("Frank Herbert"));
        assert!(text.contains("Brian Herbert"));

        let first = hit_map.area_of(HitTarget::SearchResult(0)).unwrap();
        let second = hit_map.area_of(HitTarget::SearchResult(1)).unwrap();
        assert_eq!(hit_map.target_at(first.x + 2, first.y), HitTarget::SearchResult(0));
        assert!(second.y > first.y);
    }

    #[test]
    fn failed_search_renders_only_the_error() {
        let mut panels = PanelController::new();
        let request = panels.begin_search("dune").unwrap();
        panels.apply_search(request.token, Err(GatewayError::Transport("refused".into())));

        let (text, hit_map) = draw(&snapshot(panels, Session::default()));

        assert!(text.contains(SEARCH_ERROR));
        assert_eq!(hit_map.area_of(HitTarget::SearchResult(0)), None);
    }

    #[test]
    fn reading_list_button_requires_login() {
        let mut panels = PanelController::new();
        let token = panels.open_details();
        panels.apply_details(token, Ok(book("1", "Dune", "Frank Herbert")));
        assert_eq!(panels.overlay(), Overlay::Details);

        let (anonymous, anonymous_hits) = draw(&snapshot(panels.clone(), Session::default()));
        let (member, member_hits) = draw(&snapshot(panels, Session::new(Some("ana".into()))));

        assert!(!anonymous.contains("Add to reading list"));
        assert_eq!(anonymous_hits.area_of(HitTarget::ReadingListButton), None);
        assert!(member.contains("Add to reading list"));
        assert!(member_hits.area_of(HitTarget::ReadingListButton).is_some());
    }

    #[test]
    fn book_page_registers_every_tab() {
        let mut page = BookPage::new(book("1", "Dune", "Frank Herbert"));
        let token = page.activate(BookTab::Clubs).unwrap();
        page.apply_clubs(
            token,
            Ok(ClubChoices {
                included: vec!["Classics".into()],
                choices: vec!["Sci-Fi".into()],
            }),
        );
        let mut view = snapshot(PanelController::new(), Session::default());
        view.ui.screen = Screen::Book;
        view.book_page = Some(page);

        let (text, hit_map) = draw(&view);

        for tab in BookTab::ALL {
            let area = hit_map.area_of(HitTarget::BookTab(tab)).unwrap();
            assert_eq!(hit_map.target_at(area.x, area.y), HitTarget::BookTab(tab));
        }
        assert!(text.contains("Classics"));
        let choice = hit_map.area_of(HitTarget::ClubChoice(0)).unwrap();
        assert_eq!(hit_map.target_at(choice.x, choice.y), HitTarget::ClubChoice(0));
    }

    #[test]
    fn search_trigger_is_clickable() {
        let (_, hit_map) = draw(&snapshot(PanelController::new(), Session::default()));
        assert_eq!(hit_map.target_at(5, 1), HitTarget::SearchTrigger);
        assert_eq!(hit_map.target_at(5, 20), HitTarget::Background);
    }
}
