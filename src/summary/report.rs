use serde::Serialize;
use time::Date;

use super::aggregate::DailySummary;
use crate::logs::dto::NutritionLogResponse;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// One day of the summary response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummaryResponse {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub total_calories: f64,
    pub total_carbohydrates_g: f64,
    pub total_protein_g: f64,
    pub total_fat_g: f64,
    pub total_estimated_weight_g: f64,
    pub average_health_index: Option<f64>,
    pub meals_count: usize,
    pub meals: Vec<NutritionLogResponse>,
}

impl From<DailySummary> for DailySummaryResponse {
    fn from(d: DailySummary) -> Self {
        Self {
            date: d.date,
            total_calories: d.total_calories,
            total_carbohydrates_g: d.total_carbohydrates_g,
            total_protein_g: d.total_protein_g,
            total_fat_g: d.total_fat_g,
            total_estimated_weight_g: d.total_estimated_weight_g,
            average_health_index: d.average_health_index,
            meals_count: d.meals_count,
            meals: d.meals.into_iter().map(NutritionLogResponse::from).collect(),
        }
    }
}

pub fn build_report(days: Vec<DailySummary>) -> Vec<DailySummaryResponse> {
    days.into_iter().map(DailySummaryResponse::from).collect()
}
