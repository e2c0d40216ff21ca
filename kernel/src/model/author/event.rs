use chrono::NaiveDate;
use derive_new::new;

use crate::model::id::AuthorId;

#[derive(new, Debug)]
pub struct CreateAuthor {
    pub name: String,
    pub bio: Option<String>,
    pub dob: NaiveDate,
}

// None のフィールドは更新しない
#[derive(new, Debug)]
pub struct UpdateAuthor {
    pub author_id: AuthorId,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub dob: Option<NaiveDate>,
}

#[derive(new, Debug)]
pub struct DeleteAuthor {
    pub author_id: AuthorId,
}
