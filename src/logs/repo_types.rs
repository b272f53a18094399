use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::MealItemsPayload;

/// One logged meal. Rows are append-only; `logged_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct NutritionLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_items_json: Json<MealItemsPayload>,
    pub total_calories: f64,
    pub total_carbohydrates_g: f64,
    pub total_protein_g: f64,
    pub total_fat_g: f64,
    pub health_index: Option<f64>,
    pub logged_at: OffsetDateTime,
}

/// Validated fields for a new row; id and timestamp come from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNutritionLog {
    pub meal_items: MealItemsPayload,
    pub total_calories: f64,
    pub total_carbohydrates_g: f64,
    pub total_protein_g: f64,
    pub total_fat_g: f64,
    pub health_index: Option<f64>,
}
