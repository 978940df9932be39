//! Gateway module - typed access to the reading-club server
//!
//! Every call returns an [`ApiResult`]; transport failures, error statuses and
//! malformed bodies are converted to [`GatewayError`] inside the gateway so
//! callers only branch on `Ok`/`Err`.
//!
//! - `error`: the error type and result alias
//! - `http`: the reqwest-backed implementation

mod error;
mod http;
#[cfg(test)]
pub mod fake;

use std::future::Future;

pub use error::{ApiResult, GatewayError};
pub use http::HttpGateway;

use crate::model::{Book, ClubChoices, Comment, Member, Message};

/// Operations the client needs from the server.
pub trait BookClubApi: Clone + Send + Sync + 'static {
    /// `GET /search?q=` with an already tokenized query.
    fn search_books(&self, query: &str) -> impl Future<Output = ApiResult<Vec<Book>>> + Send;

    /// `GET /book/{id}`
    fn book_detail(&self, book_id: &str) -> impl Future<Output = ApiResult<Book>> + Send;

    /// `GET /comments/{volume_id}`
    fn book_comments(&self, volume_id: &str)
    -> impl Future<Output = ApiResult<Vec<Comment>>> + Send;

    /// `GET /book/{volume_id}/clubs`
    fn book_clubs(&self, volume_id: &str) -> impl Future<Output = ApiResult<ClubChoices>> + Send;

    /// `POST /book/{volume_id}/add`
    fn add_book_to_club(
        &self,
        volume_id: &str,
        club_name: &str,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// `POST /den/add-book`
    fn add_to_reading_list(&self, book: &Book) -> impl Future<Output = ApiResult<()>> + Send;

    /// `GET /clubs/{club_id}/messages?start=&quantity=`
    fn club_messages(
        &self,
        club_id: i64,
        start: usize,
        quantity: usize,
    ) -> impl Future<Output = ApiResult<Vec<Message>>> + Send;

    /// `POST /clubs/{club_id}/messages`
    fn post_message(&self, club_id: i64, text: &str)
    -> impl Future<Output = ApiResult<Message>> + Send;

    /// `PATCH /clubs/{club_id}/messages/{message_id}`
    fn update_message(
        &self,
        club_id: i64,
        message_id: i64,
        text: &str,
    ) -> impl Future<Output = ApiResult<Message>> + Send;

    /// `DELETE /clubs/{club_id}/messages/{message_id}`
    fn delete_message(
        &self,
        club_id: i64,
        message_id: i64,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    /// `GET /user/search?q=`
    fn search_users(&self, query: &str) -> impl Future<Output = ApiResult<Vec<String>>> + Send;

    /// `POST /clubs/{club_id}/add`
    fn add_member(&self, club_id: i64, username: &str)
    -> impl Future<Output = ApiResult<Member>> + Send;

    /// `POST /clubs/{club_id}/delete`
    fn remove_member(
        &self,
        club_id: i64,
        username: &str,
    ) -> impl Future<Output = ApiResult<Member>> + Send;
}
