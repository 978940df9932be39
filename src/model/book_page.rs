//! Book page with its five mutually exclusive tabs

use super::content::{Book, ClubChoices, Comment};
use super::types::{Generation, Pane, RequestToken};
use crate::gateway::ApiResult;

pub const NO_COMMENTS: &str = "No comments found in the server.";
pub const CLUBS_ERROR: &str = "Error to connect to the server, please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BookTab {
    #[default]
    Description,
    Statistics,
    Comments,
    AddComment,
    Clubs,
}

impl BookTab {
    pub const ALL: [BookTab; 5] = [
        BookTab::Description,
        BookTab::Statistics,
        BookTab::Comments,
        BookTab::AddComment,
        BookTab::Clubs,
    ];

    pub fn title(self) -> &'static str {
        match self {
            BookTab::Description => "Description",
            BookTab::Statistics => "Statistics",
            BookTab::Comments => "Comments",
            BookTab::AddComment => "Add Comment",
            BookTab::Clubs => "Clubs",
        }
    }

    /// Tabs whose pane is filled from the server on every activation.
    pub fn fetches_data(self) -> bool {
        matches!(self, BookTab::Comments | BookTab::Clubs)
    }

    pub fn next(self) -> Self {
        match self {
            Self::Description => Self::Statistics,
            Self::Statistics => Self::Comments,
            Self::Comments => Self::AddComment,
            Self::AddComment => Self::Clubs,
            Self::Clubs => Self::Description,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Description => Self::Clubs,
            Self::Statistics => Self::Description,
            Self::Comments => Self::Statistics,
            Self::AddComment => Self::Comments,
            Self::Clubs => Self::AddComment,
        }
    }

    /// `1`..`5` in display order.
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }
}

#[derive(Clone, Debug)]
pub struct BookPage {
    book: Book,
    active_tab: BookTab,
    comments: Pane<Vec<Comment>>,
    clubs: Pane<ClubChoices>,
    club_selected: usize,
    comments_generation: Generation,
    clubs_generation: Generation,
}

impl BookPage {
    pub fn new(book: Book) -> Self {
        Self {
            book,
            active_tab: BookTab::default(),
            comments: Pane::Idle,
            clubs: Pane::Idle,
            club_selected: 0,
            comments_generation: Generation::default(),
            clubs_generation: Generation::default(),
        }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn active_tab(&self) -> BookTab {
        self.active_tab
    }

    pub fn is_active(&self, tab: BookTab) -> bool {
        self.active_tab == tab
    }

    pub fn comments(&self) -> &Pane<Vec<Comment>> {
        &self.comments
    }

    pub fn clubs(&self) -> &Pane<ClubChoices> {
        &self.clubs
    }

    pub fn club_selected(&self) -> usize {
        self.club_selected
    }

    /// Make `tab` the only active tab. Returns a token when the tab's pane
    /// has to be fetched.
    pub fn activate(&mut self, tab: BookTab) -> Option<RequestToken> {
        self.active_tab = tab;
        if !tab.fetches_data() {
            return None;
        }
        if tab == BookTab::Clubs {
            self.clubs = Pane::Loading;
            self.club_selected = 0;
            Some(self.clubs_generation.advance())
        } else {
            self.comments = Pane::Loading;
            Some(self.comments_generation.advance())
        }
    }

    pub fn apply_comments(&mut self, token: RequestToken, result: ApiResult<Vec<Comment>>) -> bool {
        if !self.comments_generation.is_current(token) {
            return false;
        }
        self.comments = match result {
            Ok(comments) => Pane::Loaded(comments),
            Err(e) => {
                tracing::debug!(error = %e, book_id = %self.book.id, "No comments loaded");
                Pane::Failed(NO_COMMENTS.to_string())
            }
        };
        true
    }

    pub fn apply_clubs(&mut self, token: RequestToken, result: ApiResult<ClubChoices>) -> bool {
        if !self.clubs_generation.is_current(token) {
            return false;
        }
        self.clubs = match result {
            Ok(clubs) => Pane::Loaded(clubs),
            Err(e) => {
                tracing::warn!(error = %e, book_id = %self.book.id, "Failed to load reading clubs");
                Pane::Failed(CLUBS_ERROR.to_string())
            }
        };
        self.club_selected = 0;
        true
    }

    pub fn select_next_club(&mut self) {
        if let Some(clubs) = self.clubs.loaded() {
            if self.club_selected + 1 < clubs.choices.len() {
                self.club_selected += 1;
            }
        }
    }

    pub fn select_previous_club(&mut self) {
        self.club_selected = self.club_selected.saturating_sub(1);
    }

    pub fn select_club(&mut self, index: usize) {
        if self.clubs.loaded().is_some_and(|clubs| index < clubs.choices.len()) {
            self.club_selected = index;
        }
    }

    pub fn selected_choice(&self) -> Option<String> {
        self.clubs
            .loaded()
            .and_then(|clubs| clubs.choices.get(self.club_selected))
            .filter(|name| !name.is_empty())
            .cloned()
    }

    /// Move a club from the choices to the reading-list clubs.
    pub fn club_added(&mut self, club_name: &str) {
        if let Some(clubs) = self.clubs.loaded_mut() {
            clubs.choices.retain(|name| name != club_name);
            clubs.included.push(club_name.to_string());
            if self.club_selected >= clubs.choices.len() {
                self.club_selected = clubs.choices.len().saturating_sub(1);
            }
        }
    }
}
