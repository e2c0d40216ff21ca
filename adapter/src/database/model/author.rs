use chrono::{DateTime, NaiveDate, Utc};
use kernel::model::{author::Author, id::AuthorId};

#[derive(sqlx::FromRow)]
pub struct AuthorRow {
    pub author_id: AuthorId,
    pub name: String,
    pub bio: Option<String>,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AuthorRow> for Author {
    fn from(value: AuthorRow) -> Self {
        let AuthorRow {
            author_id,
            name,
            bio,
            dob,
            created_at,
            updated_at,
        } = value;
        Author {
            id: author_id,
            name,
            bio,
            dob,
            created_at,
            updated_at,
        }
    }
}
