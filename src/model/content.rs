//! Records hydrated from server JSON (books, comments, clubs, forum messages)

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A book volume as returned by `/search` and `/book/{id}`.
///
/// Search results only carry the summary fields; the detail fields fall back
/// to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Book {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub authors: Vec<String>,
    #[serde(default, rename = "publishedDate", deserialize_with = "optional_text")]
    pub published_date: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page_count: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "string_or_list")]
    pub categories: Vec<String>,
}

/// One element of the `/search` reply.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchHit {
    pub data: Book,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "optional_text")]
    pub book_id: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub username: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommentList {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Reading clubs of the current user, split by whether a book is already on
/// their reading list.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ClubChoices {
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// A club forum message.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_username: String,
}

impl Message {
    pub fn author_name(&self) -> String {
        format!("{} {}", self.user_first_name, self.user_last_name)
            .trim()
            .to_string()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MessageReply {
    pub message: Message,
}

/// Club member as echoed back by the membership endpoints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AddedMember {
    pub added_member: Member,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RemovedMember {
    pub removed_member: Member,
}

/// Who is using the client. Passed explicitly to anything that renders
/// user-dependent affordances.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub username: Option<String>,
}

impl Session {
    pub fn new(username: Option<String>) -> Self {
        Self {
            username: username.filter(|name| !name.trim().is_empty()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn is_author_of(&self, message: &Message) -> bool {
        self.username.as_deref() == Some(message.user_username.as_str())
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
        Value::Null => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        other => scalar_to_string(other).into_iter().collect(),
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    })
}
