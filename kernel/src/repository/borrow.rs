use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    borrow::{
        event::{CreateBorrow, UpdateReturned},
        BorrowRecord,
    },
    id::BookId,
    list::{ListOptions, PaginatedList},
};

#[mockall::automock]
#[async_trait]
pub trait BorrowRepository: Send + Sync {
    // 貸出操作。未返却の貸出記録がある蔵書は Conflict
    async fn create(&self, event: CreateBorrow) -> AppResult<BorrowRecord>;
    // 返却操作。返却済みの貸出記録は Conflict
    async fn update_returned(&self, event: UpdateReturned) -> AppResult<BorrowRecord>;
    // すべての貸出記録（返却済みも含む）を新しい順に取得する
    async fn find_history(&self, options: ListOptions) -> AppResult<PaginatedList<BorrowRecord>>;
    // 蔵書の貸出履歴（返却済みも含む）
    async fn find_history_by_book_id(&self, book_id: BookId) -> AppResult<Vec<BorrowRecord>>;
}
