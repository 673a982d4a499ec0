use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

mod auth;
mod recipes;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(auth::router()).merge(recipes::router())
}
