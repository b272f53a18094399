pub mod aggregate;
pub mod handlers;
pub mod report;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use aggregate::{aggregate, DailySummary};
pub use report::{build_report, DailySummaryResponse};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::read_routes())
}
