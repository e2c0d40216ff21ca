use chrono::{DateTime, Utc};

use super::{
    author::Author,
    id::{BookId, BorrowId},
};

pub mod event;

#[derive(Debug, Clone)]
pub struct BorrowRecord {
    pub id: BorrowId,
    pub user_name: String,
    pub borrow_at: DateTime<Utc>,
    // None の間は貸出中
    pub return_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub book: BorrowedBook,
}

impl BorrowRecord {
    pub fn is_open(&self) -> bool {
        self.return_at.is_none()
    }
}

// 履歴は論理削除済みの蔵書も参照するので、著者は削除されている可能性がある
#[derive(Debug, Clone)]
pub struct BorrowedBook {
    pub id: BookId,
    pub title: String,
    pub description: Option<String>,
    pub year: i32,
    pub author: Option<Author>,
    pub deleted_at: Option<DateTime<Utc>>,
}
