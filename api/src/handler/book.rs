use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{book::event::DeleteBook, id::BookId};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::model::{
    book::{BookResponse, CreateBookRequest, UpdateBookRequest, UpdateBookRequestWithId},
    borrow::BorrowRecordResponse,
    list::{ListQuery, PaginatedResponse},
};

pub async fn register_book(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    req.validate(&())?;

    registry
        .book_repository()
        .create(req.into())
        .await
        .map(|book| (StatusCode::CREATED, Json(book.into())))
}

pub async fn show_book_list(
    Query(query): Query<ListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedResponse<BookResponse>>> {
    query.validate(&())?;

    registry
        .book_repository()
        .find_all(query.into_options()?)
        .await
        .map(PaginatedResponse::from)
        .map(Json)
}

pub async fn show_book(
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookResponse>> {
    registry
        .book_repository()
        .find_by_id(book_id)
        .await
        .and_then(|book| match book {
            Some(book) => Ok(Json(book.into())),
            None => Err(AppError::EntityNotFound(format!(
                "Book {book_id} was not found."
            ))),
        })
}

pub async fn update_book(
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookRequest>,
) -> AppResult<Json<BookResponse>> {
    req.validate(&())?;

    let update_book = UpdateBookRequestWithId::new(book_id, req);
    registry
        .book_repository()
        .update(update_book.into())
        .await
        .map(|book| Json(book.into()))
}

pub async fn delete_book(
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .book_repository()
        .delete(DeleteBook::new(book_id))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_book_history(
    Path(book_id): Path<BookId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<Vec<BorrowRecordResponse>>> {
    registry
        .borrow_repository()
        .find_history_by_book_id(book_id)
        .await
        .map(|records| records.into_iter().map(BorrowRecordResponse::from).collect())
        .map(Json)
}
