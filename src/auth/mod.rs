use crate::state::AppState;
use axum::Router;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
mod services;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
