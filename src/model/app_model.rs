//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::book_page::BookPage;
use super::club_page::ClubPage;
use super::content::Session;
use super::panels::PanelController;
use super::types::{HitMap, HitTarget, Screen, UiState};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Everything the view needs to draw one frame
#[derive(Clone, Debug)]
pub struct ViewSnapshot {
    pub ui: UiState,
    pub panels: PanelController,
    pub book_page: Option<BookPage>,
    pub club_page: Option<ClubPage>,
    pub session: Session,
}

/// Main application model containing all state
///
/// Cloning shares the underlying state, so spawned request tasks can apply
/// their responses directly.
#[derive(Clone)]
pub struct AppModel {
    session: Session,
    pub ui_state: Arc<Mutex<UiState>>,
    pub panels: Arc<Mutex<PanelController>>,
    pub book_page: Arc<Mutex<Option<BookPage>>>,
    pub club_page: Arc<Mutex<Option<ClubPage>>>,
    hit_map: Arc<Mutex<HitMap>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            panels: Arc::new(Mutex::new(PanelController::new())),
            book_page: Arc::new(Mutex::new(None)),
            club_page: Arc::new(Mutex::new(None)),
            hit_map: Arc::new(Mutex::new(HitMap::new())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            ui: self.ui_state.lock().await.clone(),
            panels: self.panels.lock().await.clone(),
            book_page: self.book_page.lock().await.clone(),
            club_page: self.club_page.lock().await.clone(),
            session: self.session.clone(),
        }
    }

    // ========================================================================
    // Screens & Input
    // ========================================================================

    pub async fn screen(&self) -> Screen {
        self.ui_state.lock().await.screen
    }

    pub async fn set_screen(&self, screen: Screen) {
        self.ui_state.lock().await.screen = screen;
    }

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_input.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_input.pop();
    }

    pub async fn search_input(&self) -> String {
        self.ui_state.lock().await.search_input.clone()
    }

    // ========================================================================
    // Hit Testing
    // ========================================================================

    pub async fn set_hit_map(&self, hit_map: HitMap) {
        *self.hit_map.lock().await = hit_map;
    }

    pub async fn target_at(&self, column: u16, row: u16) -> HitTarget {
        self.hit_map.lock().await.target_at(column, row)
    }

    // ========================================================================
    // Errors & Popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() >= ERROR_DISPLAY_TIME {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}
