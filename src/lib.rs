//! Meal logging backend: photo analysis, nutrition logs and daily summaries.

pub mod analysis;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod logs;
pub mod nutrition;
pub mod state;
pub mod summary;
