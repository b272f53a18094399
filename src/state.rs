use crate::analysis::{NutritionAnalyzer, OpenAiAnalyzer};
use crate::config::AppConfig;
use crate::logs::{LogStore, PgLogStore};
use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub logs: Arc<dyn LogStore>,
    pub analyzer: Arc<dyn NutritionAnalyzer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let logs = Arc::new(PgLogStore::new(db.clone())) as Arc<dyn LogStore>;
        let analyzer =
            Arc::new(OpenAiAnalyzer::new(config.analysis.clone())?) as Arc<dyn NutritionAnalyzer>;

        Ok(Self {
            db,
            config,
            logs,
            analyzer,
        })
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        logs: Arc<dyn LogStore>,
        analyzer: Arc<dyn NutritionAnalyzer>,
    ) -> Self {
        Self {
            db,
            config,
            logs,
            analyzer,
        }
    }
}
