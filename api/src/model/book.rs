use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    book::{
        event::{CreateBook, UpdateBook},
        Book, BookStatus, Borrowing,
    },
    id::{AuthorId, BookId, BorrowId},
};
use serde::{Deserialize, Serialize};

use super::author::AuthorResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub year: i32,
    #[garde(skip)]
    pub author_id: AuthorId,
}

impl From<CreateBookRequest> for CreateBook {
    fn from(value: CreateBookRequest) -> Self {
        let CreateBookRequest {
            title,
            description,
            year,
            author_id,
        } = value;
        CreateBook::new(title, description, year, author_id)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    #[garde(length(min = 1))]
    pub title: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub year: Option<i32>,
    #[garde(skip)]
    pub author_id: Option<AuthorId>,
}

#[derive(new)]
pub struct UpdateBookRequestWithId(BookId, UpdateBookRequest);

impl From<UpdateBookRequestWithId> for UpdateBook {
    fn from(value: UpdateBookRequestWithId) -> Self {
        let UpdateBookRequestWithId(
            book_id,
            UpdateBookRequest {
                title,
                description,
                year,
                author_id,
            },
        ) = value;
        UpdateBook::new(book_id, title, description, year, author_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatusResponse {
    Available,
    Borrowed,
}

impl From<BookStatus> for BookStatusResponse {
    fn from(value: BookStatus) -> Self {
        match value {
            BookStatus::Available => Self::Available,
            BookStatus::Borrowed => Self::Borrowed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub description: Option<String>,
    pub year: i32,
    pub status: BookStatusResponse,
    pub author: AuthorResponse,
    pub borrowing: Option<BookBorrowingResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(value: Book) -> Self {
        let status = value.status().into();
        let Book {
            id,
            title,
            description,
            year,
            author,
            borrowing,
            created_at,
            updated_at,
        } = value;
        Self {
            id,
            title,
            description,
            year,
            status,
            author: author.into(),
            borrowing: borrowing.map(BookBorrowingResponse::from),
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBorrowingResponse {
    pub borrow_id: BorrowId,
    pub borrowed_by: String,
    pub borrowed_at: DateTime<Utc>,
}

impl From<Borrowing> for BookBorrowingResponse {
    fn from(value: Borrowing) -> Self {
        let Borrowing {
            borrow_id,
            borrowed_by,
            borrowed_at,
        } = value;
        Self {
            borrow_id,
            borrowed_by,
            borrowed_at,
        }
    }
}
