use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::{
    model::{
        author::{
            event::{CreateAuthor, DeleteAuthor, UpdateAuthor},
            Author,
        },
        id::AuthorId,
        list::{ListOptions, PaginatedList},
    },
    repository::author::AuthorRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{model::author::AuthorRow, ConnectionPool};

const AUTHOR_HAS_BOOKS: &str = "Cannot delete author with existing books.";

#[derive(new)]
pub struct AuthorRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AuthorRepository for AuthorRepositoryImpl {
    async fn create(&self, event: CreateAuthor) -> AppResult<Author> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
                INSERT INTO authors (name, bio, dob, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                RETURNING author_id, name, bio, dob, created_at, updated_at
            "#,
        )
        .bind(event.name)
        .bind(event.bio)
        .bind(event.dob)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.into())
    }

    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Author>> {
        // 件数とページの中身を同じスナップショットから読む
        let mut tx = self.db.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let rows = sqlx::query_as::<_, AuthorRow>(
            r#"
                SELECT author_id, name, bio, dob, created_at, updated_at
                FROM authors
                ORDER BY author_id ASC
                LIMIT ? OFFSET ?
            "#,
        )
        .bind(options.limit())
        .bind(options.offset())
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        let items = rows.into_iter().map(Author::from).collect();
        Ok(PaginatedList::new(items, total, options))
    }

    async fn find_by_id(&self, author_id: AuthorId) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
                SELECT author_id, name, bio, dob, created_at, updated_at
                FROM authors
                WHERE author_id = ?
            "#,
        )
        .bind(author_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Author::from))
    }

    async fn update(&self, event: UpdateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, AuthorRow>(
            r#"
                UPDATE authors
                SET name = COALESCE(?, name),
                    bio = COALESCE(?, bio),
                    dob = COALESCE(?, dob),
                    updated_at = ?
                WHERE author_id = ?
                RETURNING author_id, name, bio, dob, created_at, updated_at
            "#,
        )
        .bind(event.name)
        .bind(event.bio)
        .bind(event.dob)
        .bind(Utc::now())
        .bind(event.author_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| author_not_found(event.author_id))?;

        Ok(row.into())
    }

    async fn delete(&self, event: DeleteAuthor) -> AppResult<()> {
        // 蔵書の有無の確認と削除を 1 文で行い、確認後に蔵書が登録される余地を残さない
        let res = sqlx::query(
            r#"
                DELETE FROM authors
                WHERE author_id = ?
                  AND NOT EXISTS (
                    SELECT 1 FROM books
                    WHERE books.author_id = authors.author_id
                      AND books.deleted_at IS NULL
                  )
            "#,
        )
        .bind(event.author_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() == 1 {
            tracing::info!(author_id = %event.author_id, "author deleted");
            return Ok(());
        }

        match self.find_by_id(event.author_id).await? {
            Some(_) => Err(AppError::Conflict(AUTHOR_HAS_BOOKS.into())),
            None => Err(author_not_found(event.author_id)),
        }
    }
}

fn author_not_found(author_id: AuthorId) -> AppError {
    AppError::EntityNotFound(format!("Author {author_id} was not found."))
}
