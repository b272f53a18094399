use std::sync::RwLock;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewNutritionLog, NutritionLog};

/// Append-only store of nutrition logs.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persist a new log, assigning its id and `logged_at`.
    async fn insert(&self, user_id: Uuid, entry: NewNutritionLog) -> anyhow::Result<NutritionLog>;

    /// Logs owned by `user_id` with `start <= logged_at <= end`, oldest first.
    async fn find_by_owner_in_range(
        &self,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<NutritionLog>>;
}

#[derive(Clone)]
pub struct PgLogStore {
    db: PgPool,
}

impl PgLogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn insert(&self, user_id: Uuid, entry: NewNutritionLog) -> anyhow::Result<NutritionLog> {
        let row = sqlx::query_as::<_, NutritionLog>(
            r#"
            INSERT INTO nutrition_logs (id, user_id, meal_items_json, total_calories,
                                        total_carbohydrates_g, total_protein_g, total_fat_g,
                                        health_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, meal_items_json, total_calories, total_carbohydrates_g,
                      total_protein_g, total_fat_g, health_index, logged_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(entry.meal_items))
        .bind(entry.total_calories)
        .bind(entry.total_carbohydrates_g)
        .bind(entry.total_protein_g)
        .bind(entry.total_fat_g)
        .bind(entry.health_index)
        .fetch_one(&self.db)
        .await
        .context("insert nutrition log")?;
        Ok(row)
    }

    async fn find_by_owner_in_range(
        &self,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<NutritionLog>> {
        let rows = sqlx::query_as::<_, NutritionLog>(
            r#"
            SELECT id, user_id, meal_items_json, total_calories, total_carbohydrates_g,
                   total_protein_g, total_fat_g, health_index, logged_at
              FROM nutrition_logs
             WHERE user_id = $1
               AND logged_at BETWEEN $2 AND $3
             ORDER BY logged_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list nutrition logs by range")?;
        Ok(rows)
    }
}

/// In-process store used by tests and local wiring.
#[derive(Default)]
pub struct MemoryLogStore {
    rows: RwLock<Vec<NutritionLog>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row with a caller-chosen timestamp.
    pub fn insert_at(
        &self,
        user_id: Uuid,
        entry: NewNutritionLog,
        logged_at: OffsetDateTime,
    ) -> anyhow::Result<NutritionLog> {
        let row = NutritionLog {
            id: Uuid::new_v4(),
            user_id,
            meal_items_json: Json(entry.meal_items),
            total_calories: entry.total_calories,
            total_carbohydrates_g: entry.total_carbohydrates_g,
            total_protein_g: entry.total_protein_g,
            total_fat_g: entry.total_fat_g,
            health_index: entry.health_index,
            logged_at,
        };
        self.rows
            .write()
            .map_err(|_| anyhow::anyhow!("log store lock poisoned"))?
            .push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn insert(&self, user_id: Uuid, entry: NewNutritionLog) -> anyhow::Result<NutritionLog> {
        self.insert_at(user_id, entry, OffsetDateTime::now_utc())
    }

    async fn find_by_owner_in_range(
        &self,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<NutritionLog>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| anyhow::anyhow!("log store lock poisoned"))?;
        let mut out: Vec<NutritionLog> = rows
            .iter()
            .filter(|r| r.user_id == user_id && r.logged_at >= start && r.logged_at <= end)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.logged_at);
        Ok(out)
    }
}
