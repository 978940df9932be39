//! Core type definitions for the application

use std::time::Instant;

use ratatui::layout::Rect;

use super::book_page::BookTab;
use super::club_page::ClubFocus;

/// Which top-level screen is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Browse,
    Book,
    Club,
}

/// Content of a panel that is filled by a server round-trip
#[derive(Clone, Debug, PartialEq)]
pub enum Pane<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for Pane<T> {
    fn default() -> Self {
        Pane::Idle
    }
}

impl<T> Pane<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Pane::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Pane::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Pane::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Pane::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one request issued for a pane. A response carrying a stale
/// token is discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Per-pane request counter.
#[derive(Clone, Debug, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn advance(&mut self) -> RequestToken {
        self.0 += 1;
        RequestToken(self.0)
    }

    /// Drop any response still in flight for this pane.
    pub fn invalidate(&mut self) {
        self.0 += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.0
    }
}

/// What a rendered screen region stands for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HitTarget {
    #[default]
    Background,
    SearchTrigger,
    SearchOverlay,
    SearchResult(usize),
    DetailsOverlay,
    ReadingListButton,
    BookTab(BookTab),
    ClubChoice(usize),
    ClubPane(ClubFocus),
    ForumMessage(usize),
    UserSuggestion(usize),
}

impl HitTarget {
    pub fn is_inside_search_overlay(self) -> bool {
        matches!(self, HitTarget::SearchOverlay | HitTarget::SearchResult(_))
    }

    pub fn is_inside_details_overlay(self) -> bool {
        matches!(self, HitTarget::DetailsOverlay | HitTarget::ReadingListButton)
    }

    /// Result entries are what open the details overlay.
    pub fn is_details_trigger(self) -> bool {
        matches!(self, HitTarget::SearchResult(_))
    }
}

/// Regions registered while rendering the last frame, in paint order.
#[derive(Clone, Debug, Default)]
pub struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, area: Rect, target: HitTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// The topmost target under a terminal cell.
    pub fn target_at(&self, column: u16, row: u16) -> HitTarget {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x.saturating_add(area.width)
                    && row >= area.y
                    && row < area.y.saturating_add(area.height)
            })
            .map(|(_, target)| *target)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn area_of(&self, target: HitTarget) -> Option<Rect> {
        self.regions
            .iter()
            .rev()
            .find(|(_, t)| *t == target)
            .map(|(area, _)| *area)
    }
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub screen: Screen,
    pub search_input: String,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}
