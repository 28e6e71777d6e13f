use crate::state::AppState;
use axum::Router;

pub mod dto;
pub(crate) mod extractors;
pub mod gate;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use extractors::CurrentUser;

pub fn router() -> Router<AppState> {
    handlers::router()
}
