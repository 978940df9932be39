//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and the gateway, and applies responses.
//! It is organized into submodules by responsibility:
//!
//! - `input`: The single key and mouse dispatcher
//! - `search`: Search and details overlays, reading list
//! - `book_page`: Book page tabs and club additions
//! - `forum`: Club forum messages
//! - `members`: Club membership management
//!
//! Each server operation comes in two halves. The first reads and updates
//! the model and is awaited by the dispatcher, so state changes happen in
//! the order the user made them. The second sends the request in a spawned
//! task and applies the response through its request token, so a superseded
//! response is dropped.

mod input;
mod search;
mod book_page;
mod forum;
mod members;

use std::future::Future;

use crate::gateway::BookClubApi;
use crate::model::{AppModel, BookPage, ClubPage};

#[derive(Clone)]
pub struct AppController<G: BookClubApi> {
    pub(crate) model: AppModel,
    pub(crate) gateway: G,
    page_size: usize,
}

impl<G: BookClubApi> AppController<G> {
    pub fn new(model: AppModel, gateway: G, page_size: usize) -> Self {
        Self {
            model,
            gateway,
            page_size,
        }
    }

    /// Run a controller operation in the background.
    pub(crate) fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(task(self.clone()));
    }

    /// Apply `edit` to the book page if it still shows `book_id`.
    pub(crate) async fn with_book_page<R>(&self, book_id: &str, edit: impl FnOnce(&mut BookPage) -> R) -> Option<R> {
        let mut guard = self.model.book_page.lock().await;
        guard
            .as_mut()
            .filter(|page| page.book().id == book_id)
            .map(edit)
    }

    /// Apply `edit` to the club page if it still shows `club_id`.
    pub(crate) async fn with_club_page<R>(&self, club_id: i64, edit: impl FnOnce(&mut ClubPage) -> R) -> Option<R> {
        let mut guard = self.model.club_page.lock().await;
        guard
            .as_mut()
            .filter(|page| page.club_id() == club_id)
            .map(edit)
    }
}
