use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    author::{
        event::{CreateAuthor, DeleteAuthor, UpdateAuthor},
        Author,
    },
    id::AuthorId,
    list::{ListOptions, PaginatedList},
};

#[mockall::automock]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn create(&self, event: CreateAuthor) -> AppResult<Author>;
    // 主キーの昇順
    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Author>>;
    async fn find_by_id(&self, author_id: AuthorId) -> AppResult<Option<Author>>;
    async fn update(&self, event: UpdateAuthor) -> AppResult<Author>;
    // 論理削除されていない蔵書が 1 冊でもあれば Conflict
    async fn delete(&self, event: DeleteAuthor) -> AppResult<()>;
}
