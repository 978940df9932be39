//! reqwest implementation of [`BookClubApi`]

use reqwest::RequestBuilder;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::Instrument;

use super::BookClubApi;
use super::error::{ApiResult, GatewayError};
use crate::logging::{api_span, log_api_outcome};
use crate::model::{
    AddedMember, Book, ClubChoices, Comment, CommentList, Member, Message, MessageList,
    MessageReply, RemovedMember, SearchHit,
};

const USER_AGENT_VALUE: &str = concat!("bookworm-den/", env!("CARGO_PKG_VERSION"));

/// Name of the Flask session cookie the server authenticates with.
const SESSION_COOKIE_NAME: &str = "session";

/// HTTP client for the reading-club server.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}={cookie}"))
                .map_err(|e| GatewayError::InvalidRequest(format!("bad session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| GatewayError::InvalidRequest(format!("failed to create HTTP client: {e}")))?;

        tracing::debug!(base_url, has_session = session_cookie.is_some(), "HTTP gateway created");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let result = Self::fetch_json(request).instrument(api_span(operation)).await;
        log_api_outcome(operation, &result);
        result
    }

    async fn execute(&self, operation: &'static str, request: RequestBuilder) -> ApiResult<()> {
        let result = async { Self::check_status(request.send().await?).map(|_| ()) }
            .instrument(api_span(operation))
            .await;
        log_api_outcome(operation, &result);
        result
    }

    async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        let response = Self::check_status(request.send().await?)?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Status {
                status: status.as_u16(),
                path: response.url().path().to_string(),
            })
        }
    }
}

impl BookClubApi for HttpGateway {
    async fn search_books(&self, query: &str) -> ApiResult<Vec<Book>> {
        let request = self.client.get(self.url("/search")).query(&[("q", query)]);
        let hits: Vec<SearchHit> = self.fetch("search_books", request).await?;
        Ok(hits.into_iter().map(|hit| hit.data).collect())
    }

    async fn book_detail(&self, book_id: &str) -> ApiResult<Book> {
        let request = self.client.get(self.url(&format!("/book/{book_id}")));
        self.fetch("book_detail", request).await
    }

    async fn book_comments(&self, volume_id: &str) -> ApiResult<Vec<Comment>> {
        let request = self.client.get(self.url(&format!("/comments/{volume_id}")));
        let list: CommentList = self.fetch("book_comments", request).await?;
        Ok(list.comments)
    }

    async fn book_clubs(&self, volume_id: &str) -> ApiResult<ClubChoices> {
        let request = self.client.get(self.url(&format!("/book/{volume_id}/clubs")));
        self.fetch("book_clubs", request).await
    }

    async fn add_book_to_club(&self, volume_id: &str, club_name: &str) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url(&format!("/book/{volume_id}/add")))
            .json(&json!({ "club_name": club_name }));
        self.execute("add_book_to_club", request).await
    }

    async fn add_to_reading_list(&self, book: &Book) -> ApiResult<()> {
        let page_count = book.page_count.to_string();
        let authors = book.authors.join(", ");
        let categories = book.categories.join(", ");
        let form = [
            ("api_id", book.id.as_str()),
            ("title", book.title.as_deref().unwrap_or_default()),
            ("cover", book.thumbnail.as_deref().unwrap_or_default()),
            ("authors", authors.as_str()),
            ("categories", categories.as_str()),
            ("description", book.description.as_deref().unwrap_or_default()),
            ("page_count", page_count.as_str()),
        ];
        let request = self.client.post(self.url("/den/add-book")).form(&form);
        self.execute("add_to_reading_list", request).await
    }

    async fn club_messages(
        &self,
        club_id: i64,
        start: usize,
        quantity: usize,
    ) -> ApiResult<Vec<Message>> {
        let request = self
            .client
            .get(self.url(&format!("/clubs/{club_id}/messages")))
            .query(&[("start", start), ("quantity", quantity)]);
        let list: MessageList = self.fetch("club_messages", request).await?;
        Ok(list.messages)
    }

    async fn post_message(&self, club_id: i64, text: &str) -> ApiResult<Message> {
        let request = self
            .client
            .post(self.url(&format!("/clubs/{club_id}/messages")))
            .json(&json!({ "message": text }));
        let reply: MessageReply = self.fetch("post_message", request).await?;
        Ok(reply.message)
    }

    async fn update_message(&self, club_id: i64, message_id: i64, text: &str) -> ApiResult<Message> {
        let request = self
            .client
            .patch(self.url(&format!("/clubs/{club_id}/messages/{message_id}")))
            .json(&json!({ "message": text }));
        let reply: MessageReply = self.fetch("update_message", request).await?;
        Ok(reply.message)
    }

    async fn delete_message(&self, club_id: i64, message_id: i64) -> ApiResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/clubs/{club_id}/messages/{message_id}")))
            .json(&json!({ "message": message_id }));
        self.execute("delete_message", request).await
    }

    async fn search_users(&self, query: &str) -> ApiResult<Vec<String>> {
        let request = self.client.get(self.url("/user/search")).query(&[("q", query)]);
        self.fetch("search_users", request).await
    }

    async fn add_member(&self, club_id: i64, username: &str) -> ApiResult<Member> {
        let request = self
            .client
            .post(self.url(&format!("/clubs/{club_id}/add")))
            .json(&json!({ "username": username }));
        let reply: AddedMember = self.fetch("add_member", request).await?;
        Ok(reply.added_member)
    }

    async fn remove_member(&self, club_id: i64, username: &str) -> ApiResult<Member> {
        let request = self
            .client
            .post(self.url(&format!("/clubs/{club_id}/delete")))
            .json(&json!({ "username": username }));
        let reply: RemovedMember = self.fetch("remove_member", request).await?;
        Ok(reply.removed_member)
    }
}
