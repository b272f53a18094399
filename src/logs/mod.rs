pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{LogStore, MemoryLogStore, PgLogStore};
pub use repo_types::{NewNutritionLog, NutritionLog};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::write_routes())
}
