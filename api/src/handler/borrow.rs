use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{borrow::event::UpdateReturned, id::BorrowId};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::model::{
    borrow::{BorrowRecordResponse, BorrowRequest},
    list::{ListQuery, PaginatedResponse},
};

pub async fn borrow_book(
    State(registry): State<AppRegistry>,
    Json(req): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRecordResponse>)> {
    req.validate(&())?;

    registry
        .borrow_repository()
        .create(req.into_event(Utc::now()))
        .await
        .map(|record| (StatusCode::CREATED, Json(record.into())))
}

pub async fn return_book(
    Path(borrow_id): Path<BorrowId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BorrowRecordResponse>> {
    let update_returned = UpdateReturned::new(borrow_id, Utc::now());

    registry
        .borrow_repository()
        .update_returned(update_returned)
        .await
        .map(|record| Json(record.into()))
}

pub async fn show_borrow_history(
    Query(query): Query<ListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedResponse<BorrowRecordResponse>>> {
    query.validate(&())?;

    registry
        .borrow_repository()
        .find_history(query.into_options()?)
        .await
        .map(PaginatedResponse::from)
        .map(Json)
}
