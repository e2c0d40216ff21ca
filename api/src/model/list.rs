use garde::Validate;
use kernel::model::list::{ListOptions, PaginatedList};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

const DEFAULT_PAGE: i64 = 1;

#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    #[garde(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

impl ListQuery {
    pub fn into_options(self) -> AppResult<ListOptions> {
        ListOptions::new(self.page)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
}

impl<T, U> From<PaginatedList<U>> for PaginatedResponse<T>
where
    T: From<U>,
{
    fn from(value: PaginatedList<U>) -> Self {
        let PaginatedList {
            items,
            total,
            per_page,
            current_page,
            last_page,
        } = value.map(T::from);
        Self {
            items,
            total,
            per_page,
            current_page,
            last_page,
        }
    }
}
