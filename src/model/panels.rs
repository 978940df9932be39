//! Search and details overlays on the browse screen
//!
//! At most one overlay is open at a time. Each overlay owns a content pane
//! and a [`Generation`]; responses are applied only when their token is still
//! current, so a slow reply cannot overwrite a panel that has moved on.

use super::content::Book;
use super::types::{Generation, HitTarget, Pane, RequestToken};
use crate::gateway::ApiResult;
use crate::tokenizer::convert_search_string;

pub const SEARCH_ERROR: &str = "Error to connect to the search server, please try again.";
pub const NO_RESULTS: &str = "No books found.";

/// Which overlay is visible on the browse screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Search,
    Details,
}

/// A search ready to be sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub query: String,
}

#[derive(Clone, Debug, Default)]
pub struct PanelController {
    overlay: Overlay,
    results: Pane<Vec<Book>>,
    selected_result: usize,
    last_query: String,
    details: Pane<Book>,
    search_generation: Generation,
    details_generation: Generation,
}

impl PanelController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn results(&self) -> &Pane<Vec<Book>> {
        &self.results
    }

    pub fn details(&self) -> &Pane<Book> {
        &self.details
    }

    pub fn selected_result(&self) -> usize {
        self.selected_result
    }

    /// Tokenized form of the most recent search.
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn details_book(&self) -> Option<&Book> {
        self.details.loaded()
    }

    /// Show the search overlay. The details overlay closes and loses its content.
    pub fn open_search(&mut self) {
        self.details = Pane::Idle;
        self.details_generation.invalidate();
        self.overlay = Overlay::Search;
    }

    /// Clear the previous results and mark the search pane as loading.
    ///
    /// Blank input issues no request.
    pub fn begin_search(&mut self, raw_query: &str) -> Option<SearchRequest> {
        if raw_query.trim().is_empty() {
            return None;
        }
        self.overlay = Overlay::Search;
        self.results = Pane::Loading;
        self.selected_result = 0;
        self.last_query = convert_search_string(raw_query);
        Some(SearchRequest {
            token: self.search_generation.advance(),
            query: self.last_query.clone(),
        })
    }

    /// Returns false when the response was stale and discarded.
    pub fn apply_search(&mut self, token: RequestToken, result: ApiResult<Vec<Book>>) -> bool {
        if !self.search_generation.is_current(token) {
            tracing::debug!("Discarding stale search response");
            return false;
        }
        self.results = match result {
            Ok(books) => Pane::Loaded(books),
            Err(e) => {
                tracing::warn!(error = %e, "Search request failed");
                Pane::Failed(SEARCH_ERROR.to_string())
            }
        };
        self.selected_result = 0;
        true
    }

    pub fn select_next_result(&mut self) {
        if let Some(books) = self.results.loaded() {
            if self.selected_result + 1 < books.len() {
                self.selected_result += 1;
            }
        }
    }

    pub fn select_previous_result(&mut self) {
        self.selected_result = self.selected_result.saturating_sub(1);
    }

    pub fn result_id(&self, index: usize) -> Option<String> {
        self.results
            .loaded()
            .and_then(|books| books.get(index))
            .map(|book| book.id.clone())
    }

    /// Close the search overlay and start loading a book into the details overlay.
    pub fn open_details(&mut self) -> RequestToken {
        self.search_generation.invalidate();
        self.overlay = Overlay::Details;
        self.details = Pane::Loading;
        self.details_generation.advance()
    }

    pub fn apply_details(&mut self, token: RequestToken, result: ApiResult<Book>) -> bool {
        if !self.details_generation.is_current(token) {
            tracing::debug!("Discarding stale details response");
            return false;
        }
        self.details = match result {
            Ok(book) => Pane::Loaded(book),
            Err(e) => {
                tracing::warn!(error = %e, "Details request failed");
                Pane::Failed(SEARCH_ERROR.to_string())
            }
        };
        true
    }

    pub fn close(&mut self, overlay: Overlay) {
        if self.overlay != overlay || overlay == Overlay::Closed {
            return;
        }
        match overlay {
            Overlay::Search => self.search_generation.invalidate(),
            Overlay::Details => self.details_generation.invalidate(),
            Overlay::Closed => {}
        }
        self.overlay = Overlay::Closed;
    }

    /// Close whichever overlay the click landed outside of.
    ///
    /// Both checks run independently; a click on an overlay's trigger leaves
    /// that overlay alone.
    pub fn handle_click(&mut self, target: HitTarget) -> bool {
        let before = self.overlay;
        if self.overlay == Overlay::Search
            && !target.is_inside_search_overlay()
            && target != HitTarget::SearchTrigger
        {
            self.close(Overlay::Search);
        }
        if self.overlay == Overlay::Details
            && !target.is_inside_details_overlay()
            && !target.is_details_trigger()
        {
            self.close(Overlay::Details);
        }
        before != self.overlay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;

    fn book(id: &str, title: &str, author: &str) -> Book {
        Book {
            id: id.to_string(),
            title: Some(title.to_string()),
            authors: vec![author.to_string()],
            ..Default::default()
        }
    }

    fn transport_error() -> GatewayError {
        GatewayError::Transport("connection refused".to_string())
    }

    #[test]
    fn starts_closed() {
        let panels = PanelController::new();
        assert_eq!(panels.overlay(), Overlay::Closed);
        assert_eq!(panels.results(), &Pane::Idle);
    }

    #[test]
    fn open_search_closes_and_clears_details() {
        let mut panels = PanelController::new();
        let token = panels.open_details();
        panels.apply_details(token, Ok(book("1", "Dune", "Herbert")));

        panels.open_search();

        assert_eq!(panels.overlay(), Overlay::Search);
        assert_eq!(panels.details(), &Pane::Idle);
    }

    #[test]
    fn search_tokenizes_and_loads_results_in_order() {
        let mut panels = PanelController::new();
        panels.open_search();
        let request = panels.begin_search("test \"quoted phrase\" test").unwrap();

        assert_eq!(request.query, "test+\"quoted phrase\"+test");
        assert_eq!(panels.last_query(), request.query);
        assert!(panels.results().is_loading());

        let books = vec![book("1", "A", "X"), book("2", "B", "Y")];
        assert!(panels.apply_search(request.token, Ok(books.clone())));
        assert_eq!(panels.results(), &Pane::Loaded(books));
    }

    #[test]
    fn blank_search_issues_no_request() {
        let mut panels = PanelController::new();
        panels.open_search();
        assert_eq!(panels.begin_search("   "), None);
        assert_eq!(panels.results(), &Pane::Idle);
    }

    #[test]
    fn failed_search_shows_only_the_error() {
        let mut panels = PanelController::new();
        let request = panels.begin_search("dune").unwrap();
        panels.apply_search(request.token, Err(transport_error()));

        assert_eq!(panels.results(), &Pane::Failed(SEARCH_ERROR.to_string()));
    }

    #[test]
    fn empty_success_is_not_a_failure() {
        let mut panels = PanelController::new();
        let request = panels.begin_search("zzzz").unwrap();
        panels.apply_search(request.token, Ok(vec![]));

        assert_eq!(panels.results(), &Pane::Loaded(vec![]));
    }

    #[test]
    fn superseded_search_response_is_discarded() {
        let mut panels = PanelController::new();
        let first = panels.begin_search("first").unwrap();
        let second = panels.begin_search("second").unwrap();

        assert!(panels.apply_search(second.token, Ok(vec![book("2", "Second", "B")])));
        assert!(!panels.apply_search(first.token, Ok(vec![book("1", "First", "A")])));

        let titles: Vec<_> = panels
            .results()
            .loaded()
            .unwrap()
            .iter()
            .map(|b| b.title.clone().unwrap())
            .collect();
        assert_eq!(titles, vec!["Second"]);
    }

    #[test]
    fn opening_details_closes_search_and_drops_pending_search() {
        let mut panels = PanelController::new();
        let search = panels.begin_search("dune").unwrap();
        let details = panels.open_details();

        assert_eq!(panels.overlay(), Overlay::Details);
        assert!(panels.details().is_loading());
        assert!(!panels.apply_search(search.token, Ok(vec![])));

        assert!(panels.apply_details(details, Err(transport_error())));
        assert_eq!(panels.details(), &Pane::Failed(SEARCH_ERROR.to_string()));
    }

    #[test]
    fn closed_details_ignore_late_response() {
        let mut panels = PanelController::new();
        let token = panels.open_details();
        panels.close(Overlay::Details);

        assert!(!panels.apply_details(token, Ok(book("1", "Dune", "Herbert"))));
        assert_eq!(panels.overlay(), Overlay::Closed);
    }

    #[test]
    fn click_outside_search_closes_it() {
        let mut panels = PanelController::new();
        panels.open_search();

        assert!(!panels.handle_click(HitTarget::SearchOverlay));
        assert!(!panels.handle_click(HitTarget::SearchResult(0)));
        assert!(!panels.handle_click(HitTarget::SearchTrigger));
        assert_eq!(panels.overlay(), Overlay::Search);

        assert!(panels.handle_click(HitTarget::Background));
        assert_eq!(panels.overlay(), Overlay::Closed);
    }

    #[test]
    fn click_outside_details_closes_it() {
        let mut panels = PanelController::new();
        panels.open_details();

        assert!(!panels.handle_click(HitTarget::DetailsOverlay));
        assert!(!panels.handle_click(HitTarget::ReadingListButton));
        assert_eq!(panels.overlay(), Overlay::Details);

        assert!(panels.handle_click(HitTarget::SearchTrigger));
        assert_eq!(panels.overlay(), Overlay::Closed);
    }

    #[test]
    fn result_selection_stays_in_bounds() {
        let mut panels = PanelController::new();
        let request = panels.begin_search("x").unwrap();
        panels.apply_search(request.token, Ok(vec![book("1", "A", "X"), book("2", "B", "Y")]));

        panels.select_previous_result();
        assert_eq!(panels.selected_result(), 0);
        panels.select_next_result();
        panels.select_next_result();
        assert_eq!(panels.selected_result(), 1);
        assert_eq!(panels.result_id(1).as_deref(), Some("2"));
        assert_eq!(panels.result_id(5), None);
    }
}
