use axum::{routing::get, Router};

pub mod parties;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/parties", parties::router())
}
