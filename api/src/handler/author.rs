use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{author::event::DeleteAuthor, id::AuthorId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::{
    author::{AuthorResponse, CreateAuthorRequest, UpdateAuthorRequest, UpdateAuthorRequestWithId},
    list::{ListQuery, PaginatedResponse},
};

pub async fn register_author(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateAuthorRequest>,
) -> AppResult<(StatusCode, Json<AuthorResponse>)> {
    req.validate(&())?;

    registry
        .author_repository()
        .create(req.into())
        .await
        .map(|author| (StatusCode::CREATED, Json(author.into())))
}

pub async fn show_author_list(
    Query(query): Query<ListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedResponse<AuthorResponse>>> {
    query.validate(&())?;

    registry
        .author_repository()
        .find_all(query.into_options()?)
        .await
        .map(PaginatedResponse::from)
        .map(Json)
}

pub async fn show_author(
    Path(author_id): Path<AuthorId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AuthorResponse>> {
    registry
        .author_repository()
        .find_by_id(author_id)
        .await
        .and_then(|author| match author {
            Some(author) => Ok(Json(author.into())),
            None => Err(AppError::EntityNotFound(format!(
                "Author {author_id} was not found."
            ))),
        })
}

pub async fn update_author(
    Path(author_id): Path<AuthorId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateAuthorRequest>,
) -> AppResult<Json<AuthorResponse>> {
    req.validate(&())?;

    let update_author = UpdateAuthorRequestWithId::new(author_id, req);
    registry
        .author_repository()
        .update(update_author.into())
        .await
        .map(|author| Json(author.into()))
}

pub async fn delete_author(
    Path(author_id): Path<AuthorId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .author_repository()
        .delete(DeleteAuthor::new(author_id))
        .await
        .map(|_| StatusCode::OK)
}
