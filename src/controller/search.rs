//! Search overlay, details overlay and the reading list

use crate::gateway::BookClubApi;
use crate::model::{Book, BookPage, Overlay, RequestToken, Screen, SearchRequest};
use super::AppController;

impl<G: BookClubApi> AppController<G> {
    pub async fn open_search(&self) {
        self.model.set_screen(Screen::Browse).await;
        self.model.panels.lock().await.open_search();
    }

    /// Mark the results pane as loading for the typed query.
    pub(crate) async fn begin_search(&self) -> Option<SearchRequest> {
        let input = self.model.search_input().await;
        self.model.panels.lock().await.begin_search(&input)
    }

    pub(crate) async fn run_search(&self, request: SearchRequest) {
        tracing::info!(query = %request.query, "Searching books");
        let result = self.gateway.search_books(&request.query).await;
        if let Ok(books) = &result {
            tracing::debug!(count = books.len(), "Search returned");
        }

        self.model.panels.lock().await.apply_search(request.token, result);
    }

    /// Switch to the details overlay for result `index`. Returns the book id
    /// to fetch and the token its response must carry.
    pub(crate) async fn begin_details(&self, index: usize) -> Option<(String, RequestToken)> {
        let mut panels = self.model.panels.lock().await;
        let book_id = panels.result_id(index)?;
        Some((book_id, panels.open_details()))
    }

    pub(crate) async fn load_details(&self, book_id: String, token: RequestToken) {
        let result = self.gateway.book_detail(&book_id).await;
        self.model.panels.lock().await.apply_details(token, result);
    }

    pub async fn close_overlay(&self) {
        let mut panels = self.model.panels.lock().await;
        let overlay = panels.overlay();
        panels.close(overlay);
    }

    /// The book shown in the details overlay, when a user is logged in.
    pub(crate) async fn reading_list_candidate(&self) -> Option<Book> {
        if !self.model.session().is_logged_in() {
            return None;
        }
        self.model.panels.lock().await.details_book().cloned()
    }

    pub(crate) async fn save_to_reading_list(&self, book: Book) {
        match self.gateway.add_to_reading_list(&book).await {
            Ok(()) => tracing::info!(book_id = %book.id, "Book added to reading list"),
            Err(e) => {
                tracing::warn!(error = %e, book_id = %book.id, "Failed to add book to reading list");
                self.model.set_error(e.user_message().to_string()).await;
            }
        }
    }

    /// Leave the details overlay for the full book page.
    pub async fn open_book_page(&self) {
        let book = {
            let mut panels = self.model.panels.lock().await;
            let Some(book) = panels.details_book().cloned() else {
                return;
            };
            panels.close(Overlay::Details);
            book
        };

        tracing::info!(book_id = %book.id, "Opening book page");
        *self.model.book_page.lock().await = Some(BookPage::new(book));
        self.model.set_screen(Screen::Book).await;
    }
}
