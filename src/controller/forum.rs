//! Club forum: loading, posting, editing and removing messages

use crate::gateway::BookClubApi;
use crate::model::{ClubPage, PageRequest, Screen};
use super::AppController;

/// A forum change to send, captured when the user asked for it
#[derive(Clone, Debug)]
pub(crate) enum ForumWrite {
    Post { club_id: i64, text: String },
    Remove { club_id: i64, message_id: i64 },
    Update { club_id: i64, message_id: i64, text: String },
}

impl<G: BookClubApi> AppController<G> {
    /// Switch to the club screen now. Returns the first page to fetch.
    pub(crate) async fn enter_club_page(&self, club_id: i64) -> PageRequest {
        let request = {
            let mut club_page = self.model.club_page.lock().await;
            if club_page.as_ref().map(ClubPage::club_id) != Some(club_id) {
                *club_page = None;
            }
            club_page
                .get_or_insert_with(|| ClubPage::new(club_id, self.page_size))
                .begin_load()
        };
        self.model.set_screen(Screen::Club).await;
        request
    }

    pub(crate) async fn fetch_page(&self, club_id: i64, request: PageRequest) {
        let result = self
            .gateway
            .club_messages(club_id, request.start, request.quantity)
            .await;
        self.with_club_page(club_id, |page| page.apply_messages(request, result))
            .await;
    }

    /// Mark the forum as loading its newest page.
    pub(crate) async fn begin_reload(&self) -> Option<(i64, PageRequest)> {
        let mut club_page = self.model.club_page.lock().await;
        let page = club_page.as_mut()?;
        Some((page.club_id(), page.begin_load()))
    }

    /// The next page of older messages, once a page is loaded.
    pub(crate) async fn begin_load_older(&self) -> Option<(i64, PageRequest)> {
        let mut club_page = self.model.club_page.lock().await;
        let page = club_page.as_mut()?;
        Some((page.club_id(), page.begin_load_older()?))
    }

    pub(crate) async fn prepare_post(&self) -> Option<ForumWrite> {
        let club_page = self.model.club_page.lock().await;
        let page = club_page.as_ref()?;
        Some(ForumWrite::Post {
            club_id: page.club_id(),
            text: page.composed_text()?,
        })
    }

    /// The selected message, if the session user wrote it.
    pub(crate) async fn prepare_remove(&self) -> Option<ForumWrite> {
        let club_page = self.model.club_page.lock().await;
        let page = club_page.as_ref()?;
        Some(ForumWrite::Remove {
            club_id: page.club_id(),
            message_id: page.removable_message(self.model.session())?,
        })
    }

    pub async fn begin_edit(&self) -> bool {
        let session = self.model.session().clone();
        let mut club_page = self.model.club_page.lock().await;
        club_page
            .as_mut()
            .is_some_and(|page| page.begin_edit(&session))
    }

    pub(crate) async fn prepare_update(&self) -> Option<ForumWrite> {
        let club_page = self.model.club_page.lock().await;
        let page = club_page.as_ref()?;
        let (message_id, text) = page.edit_submission()?;
        Some(ForumWrite::Update {
            club_id: page.club_id(),
            message_id,
            text,
        })
    }

    /// Send `write` and reload the forum when it went through.
    pub(crate) async fn write_forum(&self, write: ForumWrite) {
        let (club_id, reload) = match write {
            ForumWrite::Post { club_id, text } => {
                let result = self.gateway.post_message(club_id, &text).await;
                (club_id, self.with_club_page(club_id, |page| page.message_sent(result)).await)
            }
            ForumWrite::Remove { club_id, message_id } => {
                tracing::info!(club_id, message_id, "Removing message");
                let result = self.gateway.delete_message(club_id, message_id).await;
                (club_id, self.with_club_page(club_id, |page| page.message_removed(result)).await)
            }
            ForumWrite::Update { club_id, message_id, text } => {
                let result = self.gateway.update_message(club_id, message_id, &text).await;
                (club_id, self.with_club_page(club_id, |page| page.edit_finished(result)).await)
            }
        };
        if reload == Some(true) {
            if let Some(request) = self.with_club_page(club_id, ClubPage::begin_load).await {
                self.fetch_page(club_id, request).await;
            }
        }
    }
}
