use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    borrow::{event::CreateBorrow, BorrowRecord, BorrowedBook},
    id::{BookId, BorrowId},
};
use serde::{Deserialize, Serialize};

use super::author::AuthorResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    #[garde(length(min = 1))]
    pub user_name: String,
    #[garde(skip)]
    pub book_id: BookId,
}

impl BorrowRequest {
    pub fn into_event(self, borrowed_at: DateTime<Utc>) -> CreateBorrow {
        CreateBorrow::new(self.user_name, self.book_id, borrowed_at)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecordResponse {
    pub id: BorrowId,
    pub user_name: String,
    pub book_id: BookId,
    pub book: BorrowedBookResponse,
    pub borrow_at: DateTime<Utc>,
    pub return_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BorrowRecord> for BorrowRecordResponse {
    fn from(value: BorrowRecord) -> Self {
        let BorrowRecord {
            id,
            user_name,
            borrow_at,
            return_at,
            created_at,
            updated_at,
            book,
        } = value;
        Self {
            id,
            user_name,
            book_id: book.id,
            book: book.into(),
            borrow_at,
            return_at,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedBookResponse {
    pub id: BookId,
    pub title: String,
    pub description: Option<String>,
    pub year: i32,
    pub author: Option<AuthorResponse>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<BorrowedBook> for BorrowedBookResponse {
    fn from(value: BorrowedBook) -> Self {
        let BorrowedBook {
            id,
            title,
            description,
            year,
            author,
            deleted_at,
        } = value;
        Self {
            id,
            title,
            description,
            year,
            author: author.map(AuthorResponse::from),
            deleted_at,
        }
    }
}
