use shared::error::{AppError, AppResult};

/// 一覧取得系の 1 ページあたりの件数
pub const PER_PAGE: i64 = 15;

// ページネーションの範囲を指定するための設定値。ページ番号は 1 始まり
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    page: i64,
}

impl ListOptions {
    pub fn new(page: i64) -> AppResult<Self> {
        if page < 1 {
            return Err(AppError::UnprocessableEntity(format!(
                "page must be 1 or greater, got {page}"
            )));
        }
        Ok(Self { page })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        PER_PAGE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PER_PAGE)
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { page: 1 }
    }
}

#[derive(Debug)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
}

impl<T> PaginatedList<T> {
    pub fn new(items: Vec<T>, total: i64, options: ListOptions) -> Self {
        let per_page = options.limit();
        let last_page = ((total + per_page - 1) / per_page).max(1);
        Self {
            items,
            total,
            per_page,
            current_page: options.page(),
            last_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
            last_page: self.last_page,
        }
    }
}
