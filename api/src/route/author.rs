use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::author::{
    delete_author, register_author, show_author, show_author_list, update_author,
};

pub fn build_author_routers() -> Router<AppRegistry> {
    let authors_routers = Router::new()
        .route("/", post(register_author))
        .route("/", get(show_author_list))
        .route("/:author_id", get(show_author))
        .route("/:author_id", put(update_author))
        .route("/:author_id", delete(delete_author));

    Router::new().nest("/authors", authors_routers)
}
