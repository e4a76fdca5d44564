pub mod dto;
pub mod handlers;
mod repo;
mod repo_types;
pub mod services;
pub mod week;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::plan_routes()
}
