use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{BookId, BorrowId};

#[derive(new, Debug)]
pub struct CreateBorrow {
    pub user_name: String,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
}

#[derive(new, Debug)]
pub struct UpdateReturned {
    pub borrow_id: BorrowId,
    pub returned_at: DateTime<Utc>,
}
