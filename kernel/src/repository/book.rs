use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    book::{
        event::{CreateBook, DeleteBook, UpdateBook},
        Book,
    },
    id::BookId,
    list::{ListOptions, PaginatedList},
};

#[mockall::automock]
#[async_trait]
pub trait BookRepository: Send + Sync {
    // 著者が存在しない、または出版年が未来の場合は UnprocessableEntity
    async fn create(&self, event: CreateBook) -> AppResult<Book>;
    // 論理削除済みの蔵書は含まない。主キーの昇順
    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Book>>;
    async fn find_by_id(&self, book_id: BookId) -> AppResult<Option<Book>>;
    async fn update(&self, event: UpdateBook) -> AppResult<Book>;
    // 論理削除。貸出記録には波及しない
    async fn delete(&self, event: DeleteBook) -> AppResult<()>;
}
