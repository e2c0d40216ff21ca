use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        borrow::{
            event::{CreateBorrow, UpdateReturned},
            BorrowRecord,
        },
        id::{BookId, BorrowId},
        list::{ListOptions, PaginatedList},
    },
    repository::borrow::BorrowRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::borrow::{select_borrow_records, BorrowRow},
    ConnectionPool,
};

const BOOK_ALREADY_BORROWED: &str =
    "This book is currently borrowed and cannot be borrowed again until returned.";
const BOOK_ALREADY_RETURNED: &str = "This book has already been returned.";

#[derive(new)]
pub struct BorrowRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BorrowRepository for BorrowRepositoryImpl {
    async fn create(&self, event: CreateBorrow) -> AppResult<BorrowRecord> {
        // 蔵書の存在確認・貸出中かどうかの確認・挿入を 1 文で行う。
        // 貸出中の判定は borrow_records_open_book_idx の一意制約に任せるので、
        // 同じ蔵書への同時の貸出は片方だけが成功する
        let inserted = sqlx::query_scalar::<_, BorrowId>(
            r#"
                INSERT INTO borrow_records (user_name, book_id, borrow_at, created_at, updated_at)
                SELECT ?, book_id, ?, ?, ?
                FROM books
                WHERE book_id = ? AND deleted_at IS NULL
                RETURNING borrow_id
            "#,
        )
        .bind(&event.user_name)
        .bind(event.borrowed_at)
        .bind(event.borrowed_at)
        .bind(event.borrowed_at)
        .bind(event.book_id)
        .fetch_optional(self.db.inner_ref())
        .await;

        let borrow_id = match inserted {
            Ok(Some(borrow_id)) => borrow_id,
            Ok(None) => {
                return Err(AppError::EntityNotFound(format!(
                    "Book {} was not found.",
                    event.book_id
                )))
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(book_id = %event.book_id, "rejected borrow of a borrowed book");
                return Err(AppError::Conflict(BOOK_ALREADY_BORROWED.into()));
            }
            Err(e) => return Err(AppError::SpecificOperationError(e)),
        };

        tracing::info!(%borrow_id, book_id = %event.book_id, "book borrowed");
        self.find_by_id(borrow_id).await?.ok_or_else(|| {
            AppError::NoRowAffectedError(format!("Borrow {borrow_id} disappeared after insert."))
        })
    }

    async fn update_returned(&self, event: UpdateReturned) -> AppResult<BorrowRecord> {
        // 未返却の記録だけを更新するので、同時の返却でも return_at は 1 度しか書かれない
        let res = sqlx::query(
            r#"
                UPDATE borrow_records
                SET return_at = ?, updated_at = ?
                WHERE borrow_id = ? AND return_at IS NULL
            "#,
        )
        .bind(event.returned_at)
        .bind(event.returned_at)
        .bind(event.borrow_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let record = self.find_by_id(event.borrow_id).await?;
        match (res.rows_affected(), record) {
            (1, Some(record)) => {
                tracing::info!(borrow_id = %event.borrow_id, "book returned");
                Ok(record)
            }
            (0, Some(_)) => Err(AppError::Conflict(BOOK_ALREADY_RETURNED.into())),
            (_, None) => Err(AppError::EntityNotFound(format!(
                "Borrow record {} was not found.",
                event.borrow_id
            ))),
            (rows, Some(_)) => Err(AppError::NoRowAffectedError(format!(
                "Returning borrow {} affected {rows} rows.",
                event.borrow_id
            ))),
        }
    }

    async fn find_history(&self, options: ListOptions) -> AppResult<PaginatedList<BorrowRecord>> {
        let mut tx = self.db.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records")
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        // created_at が同じ記録は主キーで順序を確定させ、ページ間の重複や欠落を防ぐ
        let rows = sqlx::query_as::<_, BorrowRow>(select_borrow_records!(
            "ORDER BY br.created_at DESC, br.borrow_id DESC LIMIT ? OFFSET ?"
        ))
        .bind(options.limit())
        .bind(options.offset())
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        let items = rows
            .into_iter()
            .map(BorrowRecord::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(PaginatedList::new(items, total, options))
    }

    async fn find_history_by_book_id(&self, book_id: BookId) -> AppResult<Vec<BorrowRecord>> {
        let mut tx = self.db.begin().await?;

        // 論理削除済みの蔵書の履歴も参照できる
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE book_id = ?)")
            .bind(book_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if !exists {
            return Err(AppError::EntityNotFound(format!(
                "Book {book_id} was not found."
            )));
        }

        let rows = sqlx::query_as::<_, BorrowRow>(select_borrow_records!(
            "WHERE br.book_id = ? ORDER BY br.created_at DESC, br.borrow_id DESC"
        ))
        .bind(book_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        rows.into_iter().map(BorrowRecord::try_from).collect()
    }
}

impl BorrowRepositoryImpl {
    async fn find_by_id(&self, borrow_id: BorrowId) -> AppResult<Option<BorrowRecord>> {
        let row = sqlx::query_as::<_, BorrowRow>(select_borrow_records!("WHERE br.borrow_id = ?"))
            .bind(borrow_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        row.map(BorrowRecord::try_from).transpose()
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;
    use crate::{
        database::testing::{setup_file_backed, setup_in_memory},
        repository::book::BookRepositoryImpl,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use kernel::{
        model::book::{event::DeleteBook, BookStatus},
        repository::book::BookRepository,
    };

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap()
    }

    async fn open_records(pool: &ConnectionPool, book_id: BookId) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE book_id = ? AND return_at IS NULL",
        )
        .bind(book_id)
        .fetch_one(pool.inner_ref())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn borrow_return_borrow_cycle() -> anyhow::Result<()> {
        let pool = setup_in_memory().await;
        let repo = BorrowRepositoryImpl::new(pool.clone());
        let books = BookRepositoryImpl::new(pool.clone());
        let book_id = BookId::new(3);

        let alice = repo
            .create(CreateBorrow::new("Alice".into(), book_id, at(1, 9)))
            .await?;
        assert!(alice.is_open());
        assert_eq!(alice.user_name, "Alice");
        assert_eq!(alice.borrow_at, at(1, 9));
        assert_eq!(alice.book.id, book_id);
        assert_eq!(alice.book.title, "Animal Farm");
        assert_eq!(
            books.find_by_id(book_id).await?.unwrap().status(),
            BookStatus::Borrowed
        );

        let bob = repo
            .create(CreateBorrow::new("Bob".into(), book_id, at(1, 10)))
            .await;
        match bob {
            Err(AppError::Conflict(message)) => assert_eq!(message, BOOK_ALREADY_BORROWED),
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(open_records(&pool, book_id).await, 1);

        let returned = repo
            .update_returned(UpdateReturned::new(alice.id, at(2, 9)))
            .await?;
        assert_eq!(returned.id, alice.id);
        assert_eq!(returned.return_at, Some(at(2, 9)));
        assert_eq!(
            books.find_by_id(book_id).await?.unwrap().status(),
            BookStatus::Available
        );

        let bob = repo
            .create(CreateBorrow::new("Bob".into(), book_id, at(3, 9)))
            .await?;
        assert_ne!(bob.id, alice.id);
        assert!(bob.is_open());

        let bob = repo
            .update_returned(UpdateReturned::new(bob.id, at(4, 9)))
            .await?;
        assert!(!bob.is_open());
        assert_eq!(open_records(&pool, book_id).await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn borrowing_a_missing_or_deleted_book_is_not_found() -> anyhow::Result<()> {
        let pool = setup_in_memory().await;
        let repo = BorrowRepositoryImpl::new(pool.clone());

        let res = repo
            .create(CreateBorrow::new("Alice".into(), BookId::new(999), at(1, 9)))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        BookRepositoryImpl::new(pool.clone())
            .delete(DeleteBook::new(BookId::new(6)))
            .await?;
        let res = repo
            .create(CreateBorrow::new("Alice".into(), BookId::new(6), at(1, 9)))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn returning_twice_is_a_conflict_and_keeps_return_at() -> anyhow::Result<()> {
        let repo = BorrowRepositoryImpl::new(setup_in_memory().await);
        // 記録 1 は fixture で返却済み
        let res = repo
            .update_returned(UpdateReturned::new(BorrowId::new(1), at(5, 9)))
            .await;
        match res {
            Err(AppError::Conflict(message)) => assert_eq!(message, BOOK_ALREADY_RETURNED),
            other => panic!("expected conflict, got {other:?}"),
        }

        let record = repo.find_by_id(BorrowId::new(1)).await?.unwrap();
        assert_eq!(
            record.return_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 10, 10, 0, 0).unwrap())
        );
        Ok(())
    }

    #[tokio::test]
    async fn returning_a_missing_record_is_not_found() {
        let repo = BorrowRepositoryImpl::new(setup_in_memory().await);
        let res = repo
            .update_returned(UpdateReturned::new(BorrowId::new(999), at(5, 9)))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn open_borrow_of_a_deleted_book_can_still_be_returned() -> anyhow::Result<()> {
        let pool = setup_in_memory().await;
        let repo = BorrowRepositoryImpl::new(pool.clone());
        BookRepositoryImpl::new(pool.clone())
            .delete(DeleteBook::new(BookId::new(5)))
            .await?;

        // 記録 4 は蔵書 5 の未返却の貸出
        let record = repo
            .update_returned(UpdateReturned::new(BorrowId::new(4), at(5, 9)))
            .await?;
        assert!(record.book.deleted_at.is_some());
        assert_eq!(record.book.author.unwrap().name, "J.R.R. Tolkien");
        Ok(())
    }

    #[tokio::test]
    async fn history_is_newest_first_with_book_and_author() -> anyhow::Result<()> {
        let repo = BorrowRepositoryImpl::new(setup_in_memory().await);

        let history = repo.find_history(ListOptions::default()).await?;
        assert_eq!(history.total, 4);
        let ids: Vec<i64> = history.items.iter().map(|r| r.id.raw()).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);

        let newest = &history.items[0];
        assert_eq!(newest.user_name, "Alice Williams");
        assert_eq!(newest.book.title, "The Hobbit");
        assert_eq!(newest.book.author.as_ref().unwrap().name, "J.R.R. Tolkien");
        Ok(())
    }

    #[tokio::test]
    async fn history_pages_neither_repeat_nor_skip() -> anyhow::Result<()> {
        let repo = BorrowRepositoryImpl::new(setup_in_memory().await);
        let book_id = BookId::new(7);
        let start = at(1, 0);
        for i in 0..20 {
            let borrowed_at = start + Duration::hours(i * 2);
            let record = repo
                .create(CreateBorrow::new(format!("Reader {i}"), book_id, borrowed_at))
                .await?;
            repo.update_returned(UpdateReturned::new(
                record.id,
                borrowed_at + Duration::hours(1),
            ))
            .await?;
        }

        let first = repo.find_history(ListOptions::new(1)?).await?;
        let second = repo.find_history(ListOptions::new(2)?).await?;
        assert_eq!(first.total, 24);
        assert_eq!(first.last_page, 2);
        assert_eq!(first.items.len(), 15);
        assert_eq!(second.items.len(), 9);

        let all: Vec<_> = first.items.iter().chain(second.items.iter()).collect();
        let distinct: HashSet<_> = all.iter().map(|r| r.id).collect();
        assert_eq!(distinct.len(), 24);
        assert!(all
            .windows(2)
            .all(|w| (w[0].created_at, w[0].id) > (w[1].created_at, w[1].id)));
        assert_eq!(all[0].user_name, "Reader 19");

        // 同じデータに対しては同じ結果を返す
        let again = repo.find_history(ListOptions::new(1)?).await?;
        let first_ids: Vec<_> = first.items.iter().map(|r| r.id).collect();
        let again_ids: Vec<_> = again.items.iter().map(|r| r.id).collect();
        assert_eq!(first_ids, again_ids);
        Ok(())
    }

    #[tokio::test]
    async fn history_by_book_includes_returned_records() -> anyhow::Result<()> {
        let repo = BorrowRepositoryImpl::new(setup_in_memory().await);
        let book_id = BookId::new(1);
        let second = repo
            .create(CreateBorrow::new("Carol".into(), book_id, at(1, 9)))
            .await?;

        let history = repo.find_history_by_book_id(book_id).await?;
        let ids: Vec<_> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, BorrowId::new(1)]);

        assert!(repo
            .find_history_by_book_id(BookId::new(3))
            .await?
            .is_empty());
        assert!(matches!(
            repo.find_history_by_book_id(BookId::new(999)).await,
            Err(AppError::EntityNotFound(_))
        ));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_borrows_of_one_book_admit_exactly_one() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let pool = setup_file_backed(dir.path(), 8).await;
        let repo = Arc::new(BorrowRepositoryImpl::new(pool.clone()));
        let book_id = BookId::new(3);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.create(CreateBorrow::new(format!("Reader {i}"), book_id, Utc::now()))
                        .await
                })
            })
            .collect();

        let mut succeeded = 0;
        let mut conflicted = 0;
        for handle in handles {
            match handle.await? {
                Ok(_) => succeeded += 1,
                Err(AppError::Conflict(_)) => conflicted += 1,
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }
        assert_eq!(succeeded, 1);
        assert_eq!(conflicted, 7);
        assert_eq!(open_records(&pool, book_id).await, 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_returns_of_one_record_admit_exactly_one() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let pool = setup_file_backed(dir.path(), 2).await;
        let repo = Arc::new(BorrowRepositoryImpl::new(pool.clone()));
        // 記録 2 は fixture で蔵書 2 の未返却の貸出
        let borrow_id = BorrowId::new(2);

        let handles: Vec<_> = [at(5, 9), at(5, 10)]
            .into_iter()
            .map(|returned_at| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.update_returned(UpdateReturned::new(borrow_id, returned_at))
                        .await
                })
            })
            .collect();

        let mut returned = Vec::new();
        let mut conflicted = 0;
        for handle in handles {
            match handle.await? {
                Ok(record) => returned.push(record),
                Err(AppError::Conflict(message)) => {
                    assert_eq!(message, BOOK_ALREADY_RETURNED);
                    conflicted += 1;
                }
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }
        assert_eq!(returned.len(), 1);
        assert_eq!(conflicted, 1);

        // 勝った方の return_at が上書きされずに残る
        let stored = repo.find_by_id(borrow_id).await?.unwrap();
        assert_eq!(stored.return_at, returned[0].return_at);
        assert_eq!(open_records(&pool, BookId::new(2)).await, 0);
        Ok(())
    }
}
