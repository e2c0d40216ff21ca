use derive_new::new;

use crate::model::id::{AuthorId, BookId};

#[derive(new, Debug)]
pub struct CreateBook {
    pub title: String,
    pub description: Option<String>,
    pub year: i32,
    pub author_id: AuthorId,
}

// None のフィールドは更新しない
#[derive(new, Debug)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub author_id: Option<AuthorId>,
}

#[derive(new, Debug)]
pub struct DeleteBook {
    pub book_id: BookId,
}
