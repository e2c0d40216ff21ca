use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::{
    model::{
        book::{
            ensure_publication_year,
            event::{CreateBook, DeleteBook, UpdateBook},
            Book,
        },
        id::{AuthorId, BookId},
        list::{ListOptions, PaginatedList},
    },
    repository::book::BookRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::book::{select_books, BookRow},
    ConnectionPool,
};

#[derive(new)]
pub struct BookRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn create(&self, event: CreateBook) -> AppResult<Book> {
        ensure_publication_year(event.year)?;

        let now = Utc::now();
        // 著者が存在するときだけ行が挿入される
        let book_id = sqlx::query_scalar::<_, BookId>(
            r#"
                INSERT INTO books (title, description, year, author_id, created_at, updated_at)
                SELECT ?, ?, ?, author_id, ?, ?
                FROM authors
                WHERE author_id = ?
                RETURNING book_id
            "#,
        )
        .bind(event.title)
        .bind(event.description)
        .bind(event.year)
        .bind(now)
        .bind(now)
        .bind(event.author_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| unknown_author(event.author_id))?;

        self.find_by_id(book_id).await?.ok_or_else(|| {
            AppError::NoRowAffectedError(format!("Book {book_id} disappeared after insert."))
        })
    }

    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Book>> {
        let mut tx = self.db.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE deleted_at IS NULL")
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let rows = sqlx::query_as::<_, BookRow>(select_books!(
            "WHERE b.deleted_at IS NULL ORDER BY b.book_id ASC LIMIT ? OFFSET ?"
        ))
        .bind(options.limit())
        .bind(options.offset())
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        let items = rows.into_iter().map(Book::from).collect();
        Ok(PaginatedList::new(items, total, options))
    }

    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(select_books!(
            "WHERE b.book_id = ? AND b.deleted_at IS NULL"
        ))
        .bind(book_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Book::from))
    }

    async fn update(&self, event: UpdateBook) -> AppResult<Book> {
        if let Some(year) = event.year {
            ensure_publication_year(year)?;
        }

        let res = sqlx::query(
            r#"
                UPDATE books
                SET title = COALESCE(?, title),
                    description = COALESCE(?, description),
                    year = COALESCE(?, year),
                    author_id = COALESCE(?, author_id),
                    updated_at = ?
                WHERE book_id = ?
                  AND deleted_at IS NULL
                  AND (? IS NULL OR EXISTS (SELECT 1 FROM authors WHERE author_id = ?))
            "#,
        )
        .bind(event.title)
        .bind(event.description)
        .bind(event.year)
        .bind(event.author_id)
        .bind(Utc::now())
        .bind(event.book_id)
        .bind(event.author_id)
        .bind(event.author_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let book = self.find_by_id(event.book_id).await?;
        match (res.rows_affected(), book, event.author_id) {
            (1, Some(book), _) => Ok(book),
            // 蔵書はあるのに更新されなかったのは著者が存在しないため
            (0, Some(_), Some(author_id)) => Err(unknown_author(author_id)),
            (_, None, _) => Err(book_not_found(event.book_id)),
            (rows, Some(_), _) => Err(AppError::NoRowAffectedError(format!(
                "Updating book {} affected {rows} rows.",
                event.book_id
            ))),
        }
    }

    async fn delete(&self, event: DeleteBook) -> AppResult<()> {
        let now = Utc::now();
        let res = sqlx::query(
            r#"
                UPDATE books
                SET deleted_at = ?, updated_at = ?
                WHERE book_id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(event.book_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(book_not_found(event.book_id));
        }
        tracing::info!(book_id = %event.book_id, "book soft-deleted");
        Ok(())
    }
}

fn book_not_found(book_id: BookId) -> AppError {
    AppError::EntityNotFound(format!("Book {book_id} was not found."))
}

fn unknown_author(author_id: AuthorId) -> AppError {
    AppError::UnprocessableEntity(format!("The selected author {author_id} does not exist."))
}
