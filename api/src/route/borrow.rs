use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::borrow::{borrow_book, return_book, show_borrow_history};

pub fn build_borrow_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/borrow", post(borrow_book))
        .route("/borrow/history", get(show_borrow_history))
        .route("/return/:borrow_id", post(return_book))
}
