//! Payload shapes exchanged with the image analyzer and stored with each log.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macronutrients {
    pub carbohydrates_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
}

/// One detected food item. Unknown keys are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub name: String,
    pub estimated_weight_g: f64,
    pub calories: f64,
    pub macronutrients: Macronutrients,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-meal totals. Every field may be missing in analyzer output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealTotal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_weight_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbohydrates_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
}

/// Structured breakdown of a meal photo, as returned by the analyzer and
/// accepted by the log endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionPayload {
    #[serde(default)]
    pub meal_items: Option<Vec<MealItem>>,
    #[serde(default)]
    pub total: Option<MealTotal>,
    #[serde(default)]
    pub health_index: Option<f64>,
}

/// What gets persisted in `meal_items_json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealItemsPayload {
    #[serde(default)]
    pub meal_items: Vec<MealItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<MealTotal>,
}

impl MealItemsPayload {
    /// `total.estimated_weight_g`, or 0 when either level is absent.
    pub fn estimated_weight_g(&self) -> f64 {
        self.total
            .as_ref()
            .and_then(|t| t.estimated_weight_g)
            .unwrap_or(0.0)
    }
}
