use chrono::{DateTime, Datelike, Utc};
use shared::error::{AppError, AppResult};

use super::{
    author::Author,
    id::{BookId, BorrowId},
};

pub mod event;

#[derive(Debug, Clone)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub description: Option<String>,
    pub year: i32,
    pub author: Author,
    pub borrowing: Option<Borrowing>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn status(&self) -> BookStatus {
        match self.borrowing {
            Some(_) => BookStatus::Borrowed,
            None => BookStatus::Available,
        }
    }
}

// model::borrow の BorrowRecord とは別の型で、
// 上記 `Book` 型の borrowing フィールドとしてのみ使用する
#[derive(Debug, Clone)]
pub struct Borrowing {
    pub borrow_id: BorrowId,
    pub borrowed_by: String,
    pub borrowed_at: DateTime<Utc>,
}

/// 蔵書の貸出状態。未返却の貸出記録があれば貸出中
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookStatus {
    #[default]
    Available,
    Borrowed,
}

/// 出版年が現在の年（UTC）より後なら UnprocessableEntity
pub fn ensure_publication_year(year: i32) -> AppResult<()> {
    check_publication_year(year, Utc::now().year())
}

fn check_publication_year(year: i32, current_year: i32) -> AppResult<()> {
    if year > current_year {
        return Err(AppError::UnprocessableEntity(format!(
            "The year must not be later than {current_year}."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::AuthorId;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn book(borrowing: Option<Borrowing>) -> Book {
        let now = Utc::now();
        Book {
            id: BookId::new(1),
            title: "Animal Farm".into(),
            description: None,
            year: 1945,
            author: Author {
                id: AuthorId::new(1),
                name: "George Orwell".into(),
                bio: None,
                dob: NaiveDate::from_ymd_opt(1903, 6, 25).unwrap(),
                created_at: now,
                updated_at: now,
            },
            borrowing,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_follows_open_borrowing() {
        assert_eq!(book(None).status(), BookStatus::Available);
        let borrowing = Borrowing {
            borrow_id: BorrowId::new(9),
            borrowed_by: "Alice".into(),
            borrowed_at: Utc::now(),
        };
        assert_eq!(book(Some(borrowing)).status(), BookStatus::Borrowed);
    }

    #[rstest]
    #[case(1925, true)]
    #[case(2026, true)]
    #[case(2027, false)]
    #[case(3000, false)]
    fn publication_year_must_not_be_in_the_future(#[case] year: i32, #[case] accepted: bool) {
        assert_eq!(check_publication_year(year, 2026).is_ok(), accepted);
    }

    #[test]
    fn next_year_is_rejected_against_the_clock() {
        let next_year = Utc::now().year() + 1;
        assert!(matches!(
            ensure_publication_year(next_year),
            Err(AppError::UnprocessableEntity(_))
        ));
        assert!(ensure_publication_year(Utc::now().year()).is_ok());
    }
}
