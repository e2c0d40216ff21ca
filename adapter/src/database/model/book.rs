use chrono::{DateTime, NaiveDate, Utc};
use kernel::model::{
    author::Author,
    book::{Book, Borrowing},
    id::{AuthorId, BookId, BorrowId},
};

// 蔵書 1 冊に対して著者と未返却の貸出記録（高々 1 件）を結合する
macro_rules! select_books {
    ($tail:literal) => {
        concat!(
            "SELECT b.book_id, b.title, b.description, b.year, b.created_at, b.updated_at, ",
            "a.author_id, a.name AS author_name, a.bio AS author_bio, a.dob AS author_dob, ",
            "a.created_at AS author_created_at, a.updated_at AS author_updated_at, ",
            "br.borrow_id, br.user_name AS borrowed_by, br.borrow_at AS borrowed_at ",
            "FROM books AS b ",
            "INNER JOIN authors AS a ON a.author_id = b.author_id ",
            "LEFT JOIN borrow_records AS br ON br.book_id = b.book_id AND br.return_at IS NULL ",
            $tail
        )
    };
}
pub(crate) use select_books;

#[derive(sqlx::FromRow)]
pub struct BookRow {
    pub book_id: BookId,
    pub title: String,
    pub description: Option<String>,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: AuthorId,
    pub author_name: String,
    pub author_bio: Option<String>,
    pub author_dob: NaiveDate,
    pub author_created_at: DateTime<Utc>,
    pub author_updated_at: DateTime<Utc>,
    pub borrow_id: Option<BorrowId>,
    pub borrowed_by: Option<String>,
    pub borrowed_at: Option<DateTime<Utc>>,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        let BookRow {
            book_id,
            title,
            description,
            year,
            created_at,
            updated_at,
            author_id,
            author_name,
            author_bio,
            author_dob,
            author_created_at,
            author_updated_at,
            borrow_id,
            borrowed_by,
            borrowed_at,
        } = value;
        let borrowing = match (borrow_id, borrowed_by, borrowed_at) {
            (Some(borrow_id), Some(borrowed_by), Some(borrowed_at)) => Some(Borrowing {
                borrow_id,
                borrowed_by,
                borrowed_at,
            }),
            _ => None,
        };
        Book {
            id: book_id,
            title,
            description,
            year,
            author: Author {
                id: author_id,
                name: author_name,
                bio: author_bio,
                dob: author_dob,
                created_at: author_created_at,
                updated_at: author_updated_at,
            },
            borrowing,
            created_at,
            updated_at,
        }
    }
}
