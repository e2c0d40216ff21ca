use axum::Router;
use registry::AppRegistry;

use super::{
    author::build_author_routers, book::build_book_routers, borrow::build_borrow_routers,
    health::build_health_check_routers,
};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_author_routers())
        .merge(build_book_routers())
        .merge(build_borrow_routers());

    Router::new().nest("/api/v1", router)
}
