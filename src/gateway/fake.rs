//! Scripted in-memory gateway for controller tests

use std::sync::{Arc, Mutex};

use super::{ApiResult, BookClubApi, GatewayError};
use crate::model::{Book, ClubChoices, Comment, Member, Message};

#[derive(Default)]
pub struct Script {
    pub search: Option<ApiResult<Vec<Book>>>,
    pub detail: Option<ApiResult<Book>>,
    pub comments: Option<ApiResult<Vec<Comment>>>,
    pub clubs: Option<ApiResult<ClubChoices>>,
    pub add_book_to_club: Option<ApiResult<()>>,
    pub reading_list: Option<ApiResult<()>>,
    pub messages: Option<ApiResult<Vec<Message>>>,
    pub post_message: Option<ApiResult<Message>>,
    pub update_message: Option<ApiResult<Message>>,
    pub delete_message: Option<ApiResult<()>>,
    pub users: Option<ApiResult<Vec<String>>>,
    pub add_member: Option<ApiResult<Member>>,
    pub remove_member: Option<ApiResult<Member>>,
    pub calls: Vec<String>,
}

/// Answers every call from its [`Script`]; unscripted calls fail with a
/// transport error.
#[derive(Clone, Default)]
pub struct FakeGateway {
    script: Arc<Mutex<Script>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, edit: impl FnOnce(&mut Script)) {
        edit(&mut self.script.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    fn answer<T: Clone>(&self, call: String, pick: impl FnOnce(&Script) -> &Option<ApiResult<T>>) -> ApiResult<T> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(call);
        pick(&*script)
            .clone()
            .unwrap_or_else(|| Err(GatewayError::Transport("not scripted".to_string())))
    }
}

impl BookClubApi for FakeGateway {
    async fn search_books(&self, query: &str) -> ApiResult<Vec<Book>> {
        self.answer(format!("search_books:{query}"), |s| &s.search)
    }

    async fn book_detail(&self, book_id: &str) -> ApiResult<Book> {
        self.answer(format!("book_detail:{book_id}"), |s| &s.detail)
    }

    async fn book_comments(&self, volume_id: &str) -> ApiResult<Vec<Comment>> {
        self.answer(format!("book_comments:{volume_id}"), |s| &s.comments)
    }

    async fn book_clubs(&self, volume_id: &str) -> ApiResult<ClubChoices> {
        self.answer(format!("book_clubs:{volume_id}"), |s| &s.clubs)
    }

    async fn add_book_to_club(&self, volume_id: &str, club_name: &str) -> ApiResult<()> {
        self.answer(format!("add_book_to_club:{volume_id}:{club_name}"), |s| &s.add_book_to_club)
    }

    async fn add_to_reading_list(&self, book: &Book) -> ApiResult<()> {
        self.answer(format!("add_to_reading_list:{}", book.id), |s| &s.reading_list)
    }

    async fn club_messages(&self, club_id: i64, start: usize, quantity: usize) -> ApiResult<Vec<Message>> {
        self.answer(format!("club_messages:{club_id}:{start}:{quantity}"), |s| &s.messages)
    }

    async fn post_message(&self, club_id: i64, text: &str) -> ApiResult<Message> {
        self.answer(format!("post_message:{club_id}:{text}"), |s| &s.post_message)
    }

    async fn update_message(&self, club_id: i64, message_id: i64, text: &str) -> ApiResult<Message> {
        self.answer(format!("update_message:{club_id}:{message_id}:{text}"), |s| &s.update_message)
    }

    async fn delete_message(&self, club_id: i64, message_id: i64) -> ApiResult<()> {
        self.answer(format!("delete_message:{club_id}:{message_id}"), |s| &s.delete_message)
    }

    async fn search_users(&self, query: &str) -> ApiResult<Vec<String>> {
        self.answer(format!("search_users:{query}"), |s| &s.users)
    }

    async fn add_member(&self, club_id: i64, username: &str) -> ApiResult<Member> {
        self.answer(format!("add_member:{club_id}:{username}"), |s| &s.add_member)
    }

    async fn remove_member(&self, club_id: i64, username: &str) -> ApiResult<Member> {
        self.answer(format!("remove_member:{club_id}:{username}"), |s| &s.remove_member)
    }
}
