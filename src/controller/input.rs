//! Key and mouse event handling
//!
//! Every event goes through this one dispatcher. Mouse presses are resolved
//! against the hit map of the last frame, so nothing has to be re-bound when
//! content is redrawn.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::gateway::BookClubApi;
use crate::model::{BookTab, ClubFocus, ClubPage, HitTarget, Overlay, PageRequest, Screen};
use crate::tokenizer::convert_search_string;
use super::book_page::TabLoad;
use super::forum::ForumWrite;
use super::AppController;

impl<G: BookClubApi> AppController<G> {
    pub async fn handle_key_event(&self, key: KeyEvent, club: Option<i64>) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if self.model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if self.model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.model.hide_help_popup().await;
            }
            return Ok(());
        }

        // Ctrl+Q quits even while typing
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.model.set_should_quit(true).await;
            return Ok(());
        }

        let handled = match self.model.screen().await {
            Screen::Browse => self.handle_browse_key(key).await,
            Screen::Book => self.handle_book_key(key).await,
            Screen::Club => self.handle_club_key(key).await,
        };
        if handled {
            return Ok(());
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') => self.model.set_should_quit(true).await,
            KeyCode::Char('?') => self.model.show_help_popup().await,
            KeyCode::Char('/') => self.open_search().await,
            KeyCode::Char('b') => self.model.set_screen(Screen::Browse).await,
            KeyCode::Char('c') => match club {
                Some(club_id) => {
                    let request = self.enter_club_page(club_id).await;
                    self.spawn(move |c| async move { c.fetch_page(club_id, request).await });
                }
                None => {
                    self.model
                        .set_error("No club configured. Start with --club <id>.".to_string())
                        .await
                }
            },
            _ => {}
        }
        Ok(())
    }

    /// Returns true when the key was consumed by the browse screen.
    async fn handle_browse_key(&self, key: KeyEvent) -> bool {
        let overlay = self.model.panels.lock().await.overlay();
        match overlay {
            Overlay::Search => {
                match key.code {
                    KeyCode::Esc => self.close_overlay().await,
                    KeyCode::Enter => self.search_or_open_selected().await,
                    KeyCode::Up => self.model.panels.lock().await.select_previous_result(),
                    KeyCode::Down => self.model.panels.lock().await.select_next_result(),
                    KeyCode::Backspace => self.model.backspace_search().await,
                    KeyCode::Char(c) => self.model.append_to_search(c).await,
                    _ => return false,
                }
                true
            }
            Overlay::Details => {
                match key.code {
                    KeyCode::Esc => self.close_overlay().await,
                    KeyCode::Char('a') => self.save_details_to_reading_list().await,
                    KeyCode::Char('o') | KeyCode::Enter => self.open_book_page().await,
                    _ => return false,
                }
                true
            }
            Overlay::Closed => false,
        }
    }

    /// Enter in the search overlay sends a changed query, otherwise opens
    /// the highlighted result.
    async fn search_or_open_selected(&self) {
        let input = self.model.search_input().await;
        let (fresh_query, selected) = {
            let panels = self.model.panels.lock().await;
            let fresh = convert_search_string(&input) != panels.last_query()
                || panels.results().loaded().is_none();
            (fresh, panels.selected_result())
        };

        if fresh_query {
            if let Some(request) = self.begin_search().await {
                self.spawn(move |c| async move { c.run_search(request).await });
            }
        } else {
            self.show_details(selected).await;
        }
    }

    async fn show_details(&self, index: usize) {
        if let Some((book_id, token)) = self.begin_details(index).await {
            self.spawn(move |c| async move { c.load_details(book_id, token).await });
        }
    }

    async fn save_details_to_reading_list(&self) {
        if let Some(book) = self.reading_list_candidate().await {
            self.spawn(move |c| async move { c.save_to_reading_list(book).await });
        }
    }

    fn switch_tab(&self, load: Option<TabLoad>) {
        if let Some(load) = load {
            self.spawn(move |c| async move { c.load_tab(load).await });
        }
    }

    fn send_forum_write(&self, write: Option<ForumWrite>) {
        if let Some(write) = write {
            self.spawn(move |c| async move { c.write_forum(write).await });
        }
    }

    fn fetch_forum_page(&self, request: Option<(i64, PageRequest)>) {
        if let Some((club_id, request)) = request {
            self.spawn(move |c| async move { c.fetch_page(club_id, request).await });
        }
    }

    async fn refresh_user_suggestions(&self) {
        if let Some(lookup) = self.begin_user_lookup().await {
            self.spawn(move |c| async move { c.lookup_users(lookup).await });
        }
    }

    async fn send_member_change(&self, add: bool) {
        if let Some(change) = self.prepare_member_change(add).await {
            self.spawn(move |c| async move { c.change_membership(change).await });
        }
    }

    async fn handle_book_key(&self, key: KeyEvent) -> bool {
        let active = self
            .model
            .book_page
            .lock()
            .await
            .as_ref()
            .map(|page| page.active_tab());
        let Some(active) = active else {
            return false;
        };

        match key.code {
            KeyCode::Char(c) if BookTab::from_digit(c).is_some() => {
                if let Some(tab) = BookTab::from_digit(c) {
                    self.switch_tab(self.select_tab(tab).await);
                }
            }
            KeyCode::Right | KeyCode::Tab => self.switch_tab(self.step_tab(true).await),
            KeyCode::Left | KeyCode::BackTab => self.switch_tab(self.step_tab(false).await),
            KeyCode::Up if active == BookTab::Clubs => {
                if let Some(page) = self.model.book_page.lock().await.as_mut() {
                    page.select_previous_club();
                }
            }
            KeyCode::Down if active == BookTab::Clubs => {
                if let Some(page) = self.model.book_page.lock().await.as_mut() {
                    page.select_next_club();
                }
            }
            KeyCode::Enter if active == BookTab::Clubs => {
                if let Some((book_id, club)) = self.selected_club_choice().await {
                    self.spawn(move |c| async move { c.add_to_club(book_id, club).await });
                }
            }
            KeyCode::Esc | KeyCode::Backspace => self.model.set_screen(Screen::Browse).await,
            _ => return false,
        }
        true
    }

    async fn handle_club_key(&self, key: KeyEvent) -> bool {
        let state = self
            .model
            .club_page
            .lock()
            .await
            .as_ref()
            .map(|page| (page.focus(), page.editing().is_some()));
        let Some((focus, editing)) = state else {
            return false;
        };

        if editing {
            return self.handle_edit_key(key).await;
        }
        if key.code == KeyCode::Tab {
            self.edit_club_page(|page| page.cycle_focus()).await;
            return true;
        }

        match focus {
            ClubFocus::Forum => match key.code {
                KeyCode::Up => self.edit_club_page(|page| page.select_previous()).await,
                KeyCode::Down => self.edit_club_page(|page| page.select_next()).await,
                KeyCode::Char('e') => {
                    self.begin_edit().await;
                }
                KeyCode::Char('d') => self.send_forum_write(self.prepare_remove().await),
                KeyCode::Char('r') => self.fetch_forum_page(self.begin_reload().await),
                KeyCode::PageDown => self.fetch_forum_page(self.begin_load_older().await),
                KeyCode::Char('x') => self.edit_club_page(|page| page.dismiss_notices()).await,
                KeyCode::Esc => self.model.set_screen(Screen::Browse).await,
                _ => return false,
            },
            ClubFocus::Composer => match key.code {
                KeyCode::Enter => self.send_forum_write(self.prepare_post().await),
                KeyCode::Backspace => self.edit_club_page(|page| page.pop_composer()).await,
                KeyCode::Char(ch) => self.edit_club_page(|page| page.push_composer(ch)).await,
                KeyCode::Esc => self.edit_club_page(|page| page.set_focus(ClubFocus::Forum)).await,
                _ => return false,
            },
            ClubFocus::Members => match key.code {
                KeyCode::Char(ch) => {
                    self.edit_club_page(|page| page.push_member_query(ch)).await;
                    self.refresh_user_suggestions().await;
                }
                KeyCode::Backspace => {
                    self.edit_club_page(|page| page.pop_member_query()).await;
                    self.refresh_user_suggestions().await;
                }
                KeyCode::Up => self.edit_club_page(|page| page.select_previous_suggestion()).await,
                KeyCode::Down => self.edit_club_page(|page| page.select_next_suggestion()).await,
                KeyCode::Enter => self.send_member_change(true).await,
                KeyCode::Delete => self.send_member_change(false).await,
                KeyCode::Esc => self.edit_club_page(|page| page.set_focus(ClubFocus::Forum)).await,
                _ => return false,
            },
        }
        true
    }

    async fn handle_edit_key(&self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.edit_club_page(|page| page.cancel_edit()).await,
            KeyCode::Enter => self.send_forum_write(self.prepare_update().await),
            KeyCode::Backspace => self.edit_club_page(|page| page.pop_edit()).await,
            KeyCode::Char(ch) => self.edit_club_page(|page| page.push_edit(ch)).await,
            _ => return false,
        }
        true
    }

    async fn edit_club_page(&self, edit: impl FnOnce(&mut ClubPage)) {
        if let Some(page) = self.model.club_page.lock().await.as_mut() {
            edit(page);
        }
    }

    pub async fn handle_mouse_event(&self, mouse: MouseEvent) -> Result<()> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(());
        }
        if self.model.has_error().await {
            self.model.clear_error().await;
            return Ok(());
        }
        if self.model.is_help_popup_open().await {
            self.model.hide_help_popup().await;
            return Ok(());
        }

        let target = self.model.target_at(mouse.column, mouse.row).await;
        self.handle_click(target).await;
        Ok(())
    }

    /// Dispatch a click on `target`.
    pub async fn handle_click(&self, target: HitTarget) {
        if self.model.screen().await == Screen::Browse
            && self.model.panels.lock().await.handle_click(target)
        {
            tracing::debug!(?target, "Overlay closed by outside click");
        }

        match target {
            HitTarget::SearchTrigger => self.open_search().await,
            HitTarget::SearchResult(index) => self.show_details(index).await,
            HitTarget::ReadingListButton => self.save_details_to_reading_list().await,
            HitTarget::BookTab(tab) => self.switch_tab(self.select_tab(tab).await),
            HitTarget::ClubChoice(index) => {
                if let Some(page) = self.model.book_page.lock().await.as_mut() {
                    page.select_club(index);
                }
            }
            HitTarget::ClubPane(focus) => self.edit_club_page(|page| page.set_focus(focus)).await,
            HitTarget::ForumMessage(index) => {
                self.edit_club_page(|page| {
                    page.set_focus(ClubFocus::Forum);
                    page.select(index);
                })
                .await
            }
            HitTarget::UserSuggestion(index) => {
                self.edit_club_page(|page| {
                    page.set_focus(ClubFocus::Members);
                    page.select_suggestion(index);
                })
                .await
            }
            HitTarget::Background | HitTarget::SearchOverlay | HitTarget::DetailsOverlay => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::controller::AppController;
    use crate::gateway::fake::FakeGateway;
    use crate::model::{
        AppModel, Book, BookPage, BookTab, ClubChoices, ClubFocus, ClubPage, HitTarget, Overlay,
        Screen, Session,
    };

    fn controller() -> AppController<FakeGateway> {
        AppController::new(AppModel::new(Session::default()), FakeGateway::new(), 20)
    }

    fn book(id: &str) -> Book {
        Book {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Let spawned request tasks run to completion.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn active_tab(controller: &AppController<FakeGateway>) -> BookTab {
        controller.model.book_page.lock().await.as_ref().unwrap().active_tab()
    }

    async fn press(controller: &AppController<FakeGateway>, keys: &str) {
        for c in keys.chars() {
            controller.handle_key_event(key(KeyCode::Char(c)), None).await.unwrap();
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn slash_opens_search_and_typing_fills_input() {
        let controller = controller();
        controller.handle_key_event(key(KeyCode::Char('/')), None).await.unwrap();
        for c in "q b".chars() {
            controller.handle_key_event(key(KeyCode::Char(c)), None).await.unwrap();
        }

        assert_eq!(controller.model.panels.lock().await.overlay(), Overlay::Search);
        assert_eq!(controller.model.search_input().await, "q b");
        assert!(!controller.model.should_quit().await);
    }

    #[tokio::test]
    async fn q_quits_outside_text_input() {
        let controller = controller();
        controller.handle_key_event(key(KeyCode::Char('q')), None).await.unwrap();
        assert!(controller.model.should_quit().await);
    }

    #[tokio::test]
    async fn ctrl_q_quits_while_typing() {
        let controller = controller();
        controller.open_search().await;
        controller
            .handle_key_event(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL), None)
            .await
            .unwrap();
        assert!(controller.model.should_quit().await);
    }

    #[tokio::test]
    async fn outside_click_closes_search() {
        let controller = controller();
        controller.handle_click(HitTarget::SearchTrigger).await;
        assert_eq!(controller.model.panels.lock().await.overlay(), Overlay::Search);

        controller.handle_click(HitTarget::SearchOverlay).await;
        assert_eq!(controller.model.panels.lock().await.overlay(), Overlay::Search);

        controller.handle_click(HitTarget::Background).await;
        assert_eq!(controller.model.panels.lock().await.overlay(), Overlay::Closed);
    }

    #[tokio::test]
    async fn error_popup_swallows_keys_until_dismissed() {
        let controller = controller();
        controller.model.set_error("boom".into()).await;

        controller.handle_key_event(key(KeyCode::Char('q')), None).await.unwrap();
        assert!(!controller.model.should_quit().await);

        controller.handle_key_event(key(KeyCode::Esc), None).await.unwrap();
        assert!(!controller.model.has_error().await);
    }

    #[tokio::test]
    async fn club_key_without_club_reports_error() {
        let controller = controller();
        controller.handle_key_event(key(KeyCode::Char('c')), None).await.unwrap();
        assert!(controller.model.has_error().await);
    }

    #[tokio::test]
    async fn composer_keys_edit_text() {
        let controller = controller();
        *controller.model.club_page.lock().await = Some(ClubPage::new(1, 20));
        controller.model.set_screen(Screen::Club).await;

        controller.handle_key_event(key(KeyCode::Tab), None).await.unwrap();
        for c in "hiq".chars() {
            controller.handle_key_event(key(KeyCode::Char(c)), None).await.unwrap();
        }
        controller.handle_key_event(key(KeyCode::Backspace), None).await.unwrap();

        let composer = controller
            .with_club_page(1, |page| page.composer().to_string())
            .await;
        assert_eq!(composer.as_deref(), Some("hi"));
        assert!(!controller.model.should_quit().await);
    }

    #[tokio::test]
    async fn clicking_a_pane_moves_focus() {
        let controller = controller();
        *controller.model.club_page.lock().await = Some(ClubPage::new(1, 20));
        controller.model.set_screen(Screen::Club).await;

        controller
            .handle_click(HitTarget::ClubPane(ClubFocus::Members))
            .await;

        let focus = controller.with_club_page(1, |page| page.focus()).await;
        assert_eq!(focus, Some(ClubFocus::Members));
    }

    #[tokio::test]
    async fn escape_right_after_enter_keeps_search_closed() {
        let gateway = FakeGateway::new();
        gateway.script(|s| s.search = Some(Ok(vec![book("1")])));
        let controller = AppController::new(AppModel::new(Session::default()), gateway.clone(), 20);

        press(&controller, "/x").await;
        controller.handle_key_event(key(KeyCode::Enter), None).await.unwrap();
        controller.handle_key_event(key(KeyCode::Esc), None).await.unwrap();
        settle().await;

        assert_eq!(gateway.calls(), ["search_books:x"]);
        assert_eq!(controller.model.panels.lock().await.overlay(), Overlay::Closed);
    }

    #[tokio::test]
    async fn outside_click_right_after_choosing_a_result_keeps_details_closed() {
        let gateway = FakeGateway::new();
        gateway.script(|s| {
            s.search = Some(Ok(vec![book("1")]));
            s.detail = Some(Ok(book("1")));
        });
        let controller = AppController::new(AppModel::new(Session::default()), gateway.clone(), 20);
        press(&controller, "/x").await;
        controller.handle_key_event(key(KeyCode::Enter), None).await.unwrap();
        settle().await;

        controller.handle_click(HitTarget::SearchResult(0)).await;
        controller.handle_click(HitTarget::Background).await;
        settle().await;

        assert_eq!(gateway.calls().last().unwrap(), "book_detail:1");
        assert_eq!(controller.model.panels.lock().await.overlay(), Overlay::Closed);
    }

    #[tokio::test]
    async fn tab_keys_take_effect_in_press_order() {
        let gateway = FakeGateway::new();
        gateway.script(|s| {
            s.comments = Some(Ok(vec![]));
            s.clubs = Some(Ok(ClubChoices::default()));
        });
        let controller = AppController::new(AppModel::new(Session::default()), gateway.clone(), 20);
        *controller.model.book_page.lock().await = Some(BookPage::new(book("vol1")));
        controller.model.set_screen(Screen::Book).await;
        press(&controller, "354").await;
        assert_eq!(active_tab(&controller).await, BookTab::AddComment);

        press(&controller, "1").await;
        settle().await;

        assert_eq!(active_tab(&controller).await, BookTab::Description);
        let mut calls = gateway.calls();
        calls.sort();
        assert_eq!(calls, ["book_clubs:vol1", "book_comments:vol1"]);
    }

    #[tokio::test]
    async fn clicked_tab_is_active_before_its_fetch_returns() {
        let controller = controller();
        *controller.model.book_page.lock().await = Some(BookPage::new(book("vol1")));
        controller.model.set_screen(Screen::Book).await;

        controller.handle_click(HitTarget::BookTab(BookTab::Comments)).await;

        let page = controller.model.book_page.lock().await;
        let page = page.as_ref().unwrap();
        assert!(page.is_active(BookTab::Comments));
        assert!(page.comments().is_loading());
    }
}
