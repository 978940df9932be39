//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (screens, panes, request tokens, hit map)
//! - `content`: Server payloads (books, comments, clubs, messages, members)
//! - `panels`: Search and details overlays on the browse screen
//! - `book_page`: Book page tabs and their lazily loaded panes
//! - `club_page`: Club forum and membership state
//! - `app_model`: Main application model with state management methods

mod types;
mod content;
mod panels;
mod book_page;
mod club_page;
mod app_model;

// Re-export all public types for convenient access
pub use types::{HitMap, HitTarget, Pane, RequestToken, Screen, UiState};

pub use content::{
    AddedMember, Book, ClubChoices, Comment, CommentList, Member, Message, MessageList,
    MessageReply, RemovedMember, SearchHit, Session,
};

pub use panels::{NO_RESULTS, Overlay, PanelController, SEARCH_ERROR, SearchRequest};

pub use book_page::{BookPage, BookTab, NO_COMMENTS};

pub use club_page::{
    ClubFocus, ClubPage, LOAD_ERROR, PageRequest, PendingEdit, REMOVE_ERROR, SEND_ERROR,
    UPDATE_ERROR,
};

pub use app_model::{AppModel, ViewSnapshot};
