use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type BookId = i32;

/// Body returned when creating a book whose id is already taken
pub const BOOK_ALREADY_EXISTS_MESSAGE: &str = "The book ID is existing already.";

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// A single book record, identified by a caller-chosen id
pub struct Book {
    /// Ignored on update, missing id defaults to 0
    #[serde(default)]
    pub id: BookId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Publication year
    #[serde(default)]
    pub year: i32,
}
