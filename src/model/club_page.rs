//! Club page: message forum and membership management

use super::content::{Member, Message, Session};
use super::types::{Generation, Pane, RequestToken};
use crate::gateway::ApiResult;

pub const LOAD_ERROR: &str = "Error - Failed to load messages";
pub const SEND_ERROR: &str = "Error - Failed to send the message";
pub const REMOVE_ERROR: &str = "Error - Failed to remove message";
pub const UPDATE_ERROR: &str = "Error - Failed to update message";

const MAX_NOTICES: usize = 5;

/// Which part of the club page receives typed input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClubFocus {
    #[default]
    Forum,
    Composer,
    Members,
}

impl ClubFocus {
    pub fn next(self) -> Self {
        match self {
            Self::Forum => Self::Composer,
            Self::Composer => Self::Members,
            Self::Members => Self::Forum,
        }
    }
}

/// An in-place edit of one of the user's own messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEdit {
    pub message_id: i64,
    pub original: String,
    pub buffer: String,
}

impl PendingEdit {
    pub fn is_modified(&self) -> bool {
        self.buffer.trim() != self.original
    }
}

/// A forum page fetch ready to be sent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub token: RequestToken,
    pub start: usize,
    pub quantity: usize,
}

#[derive(Clone, Debug)]
pub struct ClubPage {
    club_id: i64,
    page_size: usize,
    messages: Pane<Vec<Message>>,
    selected: usize,
    composer: String,
    editing: Option<PendingEdit>,
    notices: Vec<String>,
    focus: ClubFocus,
    member_query: String,
    suggestions: Vec<String>,
    suggestion_selected: usize,
    membership_log: Vec<String>,
    messages_generation: Generation,
    suggestions_generation: Generation,
}

impl ClubPage {
    pub fn new(club_id: i64, page_size: usize) -> Self {
        Self {
            club_id,
            page_size: page_size.max(1),
            messages: Pane::Idle,
            selected: 0,
            composer: String::new(),
            editing: None,
            notices: Vec::new(),
            focus: ClubFocus::default(),
            member_query: String::new(),
            suggestions: Vec::new(),
            suggestion_selected: 0,
            membership_log: Vec::new(),
            messages_generation: Generation::default(),
            suggestions_generation: Generation::default(),
        }
    }

    pub fn club_id(&self) -> i64 {
        self.club_id
    }

    pub fn messages(&self) -> &Pane<Vec<Message>> {
        &self.messages
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn composer(&self) -> &str {
        &self.composer
    }

    pub fn editing(&self) -> Option<&PendingEdit> {
        self.editing.as_ref()
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn focus(&self) -> ClubFocus {
        self.focus
    }

    pub fn member_query(&self) -> &str {
        &self.member_query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestion_selected(&self) -> usize {
        self.suggestion_selected
    }

    pub fn membership_log(&self) -> &[String] {
        &self.membership_log
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn set_focus(&mut self, focus: ClubFocus) {
        self.focus = focus;
    }

    fn push_notice(&mut self, notice: &str) {
        self.notices.insert(0, notice.to_string());
        self.notices.truncate(MAX_NOTICES);
    }

    fn log_membership(&mut self, line: String) {
        self.membership_log.insert(0, line);
        self.membership_log.truncate(MAX_NOTICES);
    }

    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }

    // ========================================================================
    // Forum messages
    // ========================================================================

    /// Reload the newest page of messages.
    pub fn begin_load(&mut self) -> PageRequest {
        self.messages = Pane::Loading;
        PageRequest {
            token: self.messages_generation.advance(),
            start: 0,
            quantity: self.page_size,
        }
    }

    pub fn apply_messages(&mut self, request: PageRequest, result: ApiResult<Vec<Message>>) -> bool {
        if !self.messages_generation.is_current(request.token) {
            return false;
        }
        match result {
            Ok(page) if request.start == 0 => {
                self.messages = Pane::Loaded(page);
            }
            Ok(mut page) => {
                if let Some(messages) = self.messages.loaded_mut() {
                    messages.append(&mut page);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, club_id = self.club_id, "Failed to load forum messages");
                if request.start == 0 {
                    self.messages = Pane::Failed(LOAD_ERROR.to_string());
                } else {
                    self.push_notice(LOAD_ERROR);
                }
            }
        }
        self.clamp_selection();
        true
    }

    /// Fetch the page after the messages already shown.
    pub fn begin_load_older(&mut self) -> Option<PageRequest> {
        let start = self.messages.loaded()?.len();
        Some(PageRequest {
            token: self.messages_generation.advance(),
            start,
            quantity: self.page_size,
        })
    }

    fn clamp_selection(&mut self) {
        let len = self.messages.loaded().map(Vec::len).unwrap_or(0);
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.messages.loaded().map(Vec::len).unwrap_or(0);
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp_selection();
    }

    pub fn selected_message(&self) -> Option<&Message> {
        self.messages.loaded()?.get(self.selected)
    }

    fn selected_own_message(&self, session: &Session) -> Option<&Message> {
        self.selected_message()
            .filter(|message| session.is_author_of(message))
    }

    pub fn push_composer(&mut self, c: char) {
        self.composer.push(c);
    }

    pub fn pop_composer(&mut self) {
        self.composer.pop();
    }

    /// Text to post, if the composer holds any.
    pub fn composed_text(&self) -> Option<String> {
        let text = self.composer.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Returns true when the forum should be reloaded.
    pub fn message_sent(&mut self, result: ApiResult<Message>) -> bool {
        match result {
            Ok(_) => {
                self.composer.clear();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, club_id = self.club_id, "Failed to send message");
                self.push_notice(SEND_ERROR);
                false
            }
        }
    }

    /// Id of the selected message if the session user may remove it.
    pub fn removable_message(&self, session: &Session) -> Option<i64> {
        self.selected_own_message(session).map(|message| message.id)
    }

    pub fn message_removed(&mut self, result: ApiResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, club_id = self.club_id, "Failed to remove message");
                self.push_notice(REMOVE_ERROR);
                false
            }
        }
    }

    /// Turn the selected message into an edit control. Only the author's
    /// own messages can be edited.
    pub fn begin_edit(&mut self, session: &Session) -> bool {
        let Some(message) = self.selected_own_message(session) else {
            return false;
        };
        let original = message.message.trim().to_string();
        self.editing = Some(PendingEdit {
            message_id: message.id,
            buffer: original.clone(),
            original,
        });
        true
    }

    pub fn push_edit(&mut self, c: char) {
        if let Some(edit) = self.editing.as_mut() {
            edit.buffer.push(c);
        }
    }

    pub fn pop_edit(&mut self) {
        if let Some(edit) = self.editing.as_mut() {
            edit.buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn edit_submission(&self) -> Option<(i64, String)> {
        self.editing
            .as_ref()
            .map(|edit| (edit.message_id, edit.buffer.clone()))
    }

    /// On failure the edit control stays open with the typed text.
    pub fn edit_finished(&mut self, result: ApiResult<Message>) -> bool {
        match result {
            Ok(_) => {
                self.editing = None;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, club_id = self.club_id, "Failed to update message");
                self.push_notice(UPDATE_ERROR);
                false
            }
        }
    }

    // ========================================================================
    // Membership
    // ========================================================================

    pub fn push_member_query(&mut self, c: char) {
        self.member_query.push(c);
    }

    pub fn pop_member_query(&mut self) {
        self.member_query.pop();
    }

    /// Start an autocomplete lookup for the member query.
    pub fn begin_user_search(&mut self) -> Option<(RequestToken, String)> {
        let query = self.member_query.trim().to_string();
        if query.is_empty() {
            self.suggestions.clear();
            self.suggestions_generation.invalidate();
            return None;
        }
        Some((self.suggestions_generation.advance(), query))
    }

    /// Lookup failures leave the list empty.
    pub fn apply_suggestions(&mut self, token: RequestToken, result: ApiResult<Vec<String>>) -> bool {
        if !self.suggestions_generation.is_current(token) {
            return false;
        }
        self.suggestions = result.unwrap_or_default();
        self.suggestion_selected = 0;
        true
    }

    pub fn select_next_suggestion(&mut self) {
        if self.suggestion_selected + 1 < self.suggestions.len() {
            self.suggestion_selected += 1;
        }
    }

    pub fn select_previous_suggestion(&mut self) {
        self.suggestion_selected = self.suggestion_selected.saturating_sub(1);
    }

    pub fn select_suggestion(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.suggestion_selected = index;
        }
    }

    /// Username for the highlighted suggestion, falling back to the raw query.
    pub fn member_username(&self) -> Option<String> {
        if let Some(suggestion) = self.suggestions.get(self.suggestion_selected) {
            return Some(username_from_suggestion(suggestion).to_string());
        }
        let query = self.member_query.trim();
        (!query.is_empty()).then(|| query.to_string())
    }

    pub fn member_added(&mut self, username: &str, result: ApiResult<Member>) {
        match result {
            Ok(member) => {
                self.log_membership(format!("Added {}", member.full_name()));
                self.member_query.clear();
                self.suggestions.clear();
            }
            Err(e) => {
                tracing::warn!(error = %e, username, "Failed to add member");
                self.push_notice(&format!("Error - Failed to add {username}"));
            }
        }
    }

    pub fn member_removed(&mut self, username: &str, result: ApiResult<Member>) {
        match result {
            Ok(member) => {
                self.log_membership(format!("Removed {}", member.full_name()));
                self.member_query.clear();
                self.suggestions.clear();
            }
            Err(e) => {
                tracing::warn!(error = %e, username, "Failed to remove member");
                self.push_notice(&format!("Error - Failed to remove {username}"));
            }
        }
    }
}

/// Suggestions read `"First Last - username"`.
pub fn username_from_suggestion(suggestion: &str) -> &str {
    suggestion
        .rsplit_once(" - ")
        .map(|(_, username)| username)
        .unwrap_or(suggestion)
        .trim()
}
