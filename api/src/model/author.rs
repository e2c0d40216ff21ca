use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    author::{
        event::{CreateAuthor, UpdateAuthor},
        Author,
    },
    id::AuthorId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(skip)]
    pub bio: Option<String>,
    #[garde(skip)]
    pub dob: NaiveDate,
}

impl From<CreateAuthorRequest> for CreateAuthor {
    fn from(value: CreateAuthorRequest) -> Self {
        let CreateAuthorRequest { name, bio, dob } = value;
        CreateAuthor::new(name, bio, dob)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorRequest {
    #[garde(length(min = 1))]
    pub name: Option<String>,
    #[garde(skip)]
    pub bio: Option<String>,
    #[garde(skip)]
    pub dob: Option<NaiveDate>,
}

#[derive(new)]
pub struct UpdateAuthorRequestWithId(AuthorId, UpdateAuthorRequest);

impl From<UpdateAuthorRequestWithId> for UpdateAuthor {
    fn from(value: UpdateAuthorRequestWithId) -> Self {
        let UpdateAuthorRequestWithId(author_id, UpdateAuthorRequest { name, bio, dob }) = value;
        UpdateAuthor::new(author_id, name, bio, dob)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: AuthorId,
    pub name: String,
    pub bio: Option<String>,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Author> for AuthorResponse {
    fn from(value: Author) -> Self {
        let Author {
            id,
            name,
            bio,
            dob,
            created_at,
            updated_at,
        } = value;
        Self {
            id,
            name,
            bio,
            dob,
            created_at,
            updated_at,
        }
    }
}
