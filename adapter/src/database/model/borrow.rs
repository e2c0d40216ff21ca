use chrono::{DateTime, NaiveDate, Utc};
use kernel::model::{
    author::Author,
    borrow::{BorrowRecord, BorrowedBook},
    id::{AuthorId, BookId, BorrowId},
};
use shared::error::AppError;

// 論理削除済みの蔵書も結合する。著者は削除済みなら NULL
macro_rules! select_borrow_records {
    ($tail:literal) => {
        concat!(
            "SELECT br.borrow_id, br.user_name, br.borrow_at, br.return_at, ",
            "br.created_at, br.updated_at, ",
            "b.book_id, b.title, b.description, b.year, b.deleted_at AS book_deleted_at, ",
            "a.author_id, a.name AS author_name, a.bio AS author_bio, a.dob AS author_dob, ",
            "a.created_at AS author_created_at, a.updated_at AS author_updated_at ",
            "FROM borrow_records AS br ",
            "INNER JOIN books AS b ON b.book_id = br.book_id ",
            "LEFT JOIN authors AS a ON a.author_id = b.author_id ",
            $tail
        )
    };
}
pub(crate) use select_borrow_records;

#[derive(sqlx::FromRow)]
pub struct BorrowRow {
    pub borrow_id: BorrowId,
    pub user_name: String,
    pub borrow_at: DateTime<Utc>,
    pub return_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub book_id: BookId,
    pub title: String,
    pub description: Option<String>,
    pub year: i32,
    pub book_deleted_at: Option<DateTime<Utc>>,
    pub author_id: Option<AuthorId>,
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
    pub author_dob: Option<NaiveDate>,
    pub author_created_at: Option<DateTime<Utc>>,
    pub author_updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<BorrowRow> for BorrowRecord {
    type Error = AppError;

    fn try_from(value: BorrowRow) -> Result<Self, Self::Error> {
        let BorrowRow {
            borrow_id,
            user_name,
            borrow_at,
            return_at,
            created_at,
            updated_at,
            book_id,
            title,
            description,
            year,
            book_deleted_at,
            author_id,
            author_name,
            author_bio,
            author_dob,
            author_created_at,
            author_updated_at,
        } = value;
        let author = match (
            author_id,
            author_name,
            author_dob,
            author_created_at,
            author_updated_at,
        ) {
            (Some(id), Some(name), Some(dob), Some(created_at), Some(updated_at)) => Some(Author {
                id,
                name,
                bio: author_bio,
                dob,
                created_at,
                updated_at,
            }),
            // 著者が削除済みなら結合結果はすべて NULL になる
            (None, None, None, None, None) => None,
            _ => {
                return Err(AppError::ConversionEntityError(format!(
                    "Borrow record {borrow_id} has an incomplete author for book {book_id}."
                )))
            }
        };
        Ok(BorrowRecord {
            id: borrow_id,
            user_name,
            borrow_at,
            return_at,
            created_at,
            updated_at,
            book: BorrowedBook {
                id: book_id,
                title,
                description,
                year,
                author,
                deleted_at: book_deleted_at,
            },
        })
    }
}
