//! Meal-photo analysis through an external vision model.

pub mod client;
pub mod handlers;
pub mod parse;

use thiserror::Error;

use crate::error::AppError;

pub use client::{NutritionAnalyzer, OpenAiAnalyzer};

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Transport, auth or upstream status failure.
    #[error("{0}")]
    Unavailable(String),

    /// The model answered, but not with the expected JSON.
    #[error("{reason}")]
    Parse { raw: String, reason: String },
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Unavailable(msg) => AppError::AnalysisUnavailable(msg),
            AnalysisError::Parse { raw, reason } => AppError::AnalysisParse { raw, reason },
        }
    }
}

pub fn router(max_upload_bytes: usize) -> axum::Router<crate::state::AppState> {
    handlers::write_routes(max_upload_bytes)
}
