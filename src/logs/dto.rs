use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::logs::repo_types::NutritionLog;
use crate::nutrition::MealItemsPayload;

/// Serialized form of a stored log, used on creation and nested in summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionLogResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    pub meal_items_json: MealItemsPayload,
    pub total_calories: f64,
    pub total_carbohydrates_g: f64,
    pub total_protein_g: f64,
    pub total_fat_g: f64,
    pub health_index: Option<f64>,
}

impl From<NutritionLog> for NutritionLogResponse {
    fn from(r: NutritionLog) -> Self {
        Self {
            id: r.id,
            logged_at: r.logged_at,
            meal_items_json: r.meal_items_json.0,
            total_calories: r.total_calories,
            total_carbohydrates_g: r.total_carbohydrates_g,
            total_protein_g: r.total_protein_g,
            total_fat_g: r.total_fat_g,
            health_index: r.health_index,
        }
    }
}
