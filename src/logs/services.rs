use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::repo::LogStore;
use super::repo_types::{NewNutritionLog, NutritionLog};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::nutrition::{MealItem, MealItemsPayload, MealTotal};

const REQUIRED: &str = "This field is required.";
const NOT_A_NUMBER: &str = "A valid number is required.";

/// Check a posted body and turn it into a storable row.
/// All field problems are reported together, including type mismatches.
pub fn validate_payload(body: &Value) -> AppResult<NewNutritionLog> {
    let mut errors = FieldErrors::new();
    if !body.is_object() {
        push(
            &mut errors,
            "non_field_errors",
            "Invalid data. Expected a dictionary.",
        );
        return Err(AppError::Validation(errors));
    }

    let total = body.get("total").filter(|t| !t.is_null());
    let total_field = |key: &str| total.and_then(|t| t.get(key));

    let total_calories = required_amount(&mut errors, "total_calories", total_field("calories"));
    let total_carbohydrates_g = required_amount(
        &mut errors,
        "total_carbohydrates_g",
        total_field("carbohydrates_g"),
    );
    let total_protein_g =
        required_amount(&mut errors, "total_protein_g", total_field("protein_g"));
    let total_fat_g = required_amount(&mut errors, "total_fat_g", total_field("fat_g"));
    let estimated_weight_g = match amount(total_field("estimated_weight_g")) {
        Ok(w) => w,
        Err(()) => {
            push(
                &mut errors,
                "meal_items_json",
                &format!("total.estimated_weight_g: {NOT_A_NUMBER}"),
            );
            None
        }
    };

    let meal_items = parse_meal_items(&mut errors, body.get("meal_items"));

    let health_index = match amount(body.get("health_index")) {
        Ok(Some(h)) if !(1.0..=10.0).contains(&h) => {
            push(
                &mut errors,
                "health_index",
                "Ensure this value is between 1 and 10.",
            );
            None
        }
        Ok(h) => h,
        Err(()) => {
            push(&mut errors, "health_index", NOT_A_NUMBER);
            None
        }
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(NewNutritionLog {
        meal_items: MealItemsPayload {
            meal_items,
            total: total.map(|_| MealTotal {
                estimated_weight_g,
                calories: Some(total_calories),
                carbohydrates_g: Some(total_carbohydrates_g),
                protein_g: Some(total_protein_g),
                fat_g: Some(total_fat_g),
            }),
        },
        total_calories,
        total_carbohydrates_g,
        total_protein_g,
        total_fat_g,
        health_index,
    })
}

pub async fn create_log(
    store: &dyn LogStore,
    user_id: Uuid,
    body: &Value,
) -> AppResult<NutritionLog> {
    let entry = validate_payload(body)?;
    let row = store.insert(user_id, entry).await?;
    info!(%user_id, log_id = %row.id, calories = row.total_calories, "nutrition log created");
    Ok(row)
}

/// A JSON number or numeric string. `Ok(None)` when absent or null.
fn amount(value: Option<&Value>) -> Result<Option<f64>, ()> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(()),
    }
}

fn required_amount(errors: &mut FieldErrors, field: &str, value: Option<&Value>) -> f64 {
    match amount(value) {
        Ok(None) => {
            push(errors, field, REQUIRED);
            0.0
        }
        Err(()) => {
            push(errors, field, NOT_A_NUMBER);
            0.0
        }
        Ok(Some(v)) if v < 0.0 => {
            push(errors, field, "Ensure this value is greater than or equal to 0.");
            0.0
        }
        Ok(Some(v)) => v,
    }
}

fn parse_meal_items(errors: &mut FieldErrors, value: Option<&Value>) -> Vec<MealItem> {
    let items = match value {
        None | Some(Value::Null) => {
            push(errors, "meal_items_json", REQUIRED);
            return Vec::new();
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            push(errors, "meal_items_json", "meal_items: Expected a list of items.");
            return Vec::new();
        }
    };

    let mut parsed = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match serde_json::from_value::<MealItem>(item.clone()) {
            Ok(item) => parsed.push(item),
            Err(e) => push(errors, "meal_items_json", &format!("meal_items[{i}]: {e}")),
        }
    }
    parsed
}

fn push(errors: &mut FieldErrors, field: &str, msg: &str) {
    errors.entry(field.to_string()).or_default().push(msg.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::repo::MemoryLogStore;
    use serde_json::json;
    use time::OffsetDateTime;

    fn full() -> serde_json::Value {
        json!({
            "meal_items": [{
                "name": "oatmeal",
                "estimated_weight_g": 250.0,
                "calories": 300.0,
                "macronutrients": {"carbohydrates_g": 54.0, "protein_g": 10.0, "fat_g": 5.0}
            }],
            "total": {
                "estimated_weight_g": 250.0,
                "calories": 300.0,
                "carbohydrates_g": 54.0,
                "protein_g": 10.0,
                "fat_g": 5.0
            },
            "health_index": 8
        })
    }

    #[test]
    fn accepts_complete_payload() {
        let entry = validate_payload(&full()).unwrap();
        assert_eq!(entry.total_calories, 300.0);
        assert_eq!(entry.total_carbohydrates_g, 54.0);
        assert_eq!(entry.health_index, Some(8.0));
        assert_eq!(entry.meal_items.meal_items.len(), 1);
        assert_eq!(entry.meal_items.estimated_weight_g(), 250.0);
    }

    #[test]
    fn health_index_is_optional() {
        let mut v = full();
        v.as_object_mut().unwrap().remove("health_index");
        let entry = validate_payload(&v).unwrap();
        assert_eq!(entry.health_index, None);
    }

    #[test]
    fn missing_totals_are_reported_per_field() {
        let err = validate_payload(&json!({"meal_items": []})).unwrap_err();
        let AppError::Validation(errors) = &err else {
            panic!("expected validation error, got {err:?}");
        };
        for field in [
            "total_calories",
            "total_carbohydrates_g",
            "total_protein_g",
            "total_fat_g",
        ] {
            assert_eq!(errors[field], vec![REQUIRED.to_string()], "{field}");
        }
        assert!(!errors.contains_key("meal_items_json"));
    }

    #[test]
    fn rejects_negative_totals_and_out_of_range_health_index() {
        let mut v = full();
        v["total"]["fat_g"] = json!(-1.0);
        v["health_index"] = json!(11);
        let AppError::Validation(errors) = validate_payload(&v).unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("total_fat_g"));
        assert!(errors.contains_key("health_index"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn meal_items_are_required() {
        let mut v = full();
        v.as_object_mut().unwrap().remove("meal_items");
        let AppError::Validation(errors) = validate_payload(&v).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["meal_items_json"]);
    }

    #[test]
    fn wrong_types_become_field_errors() {
        let mut v = full();
        v["total"]["calories"] = json!("lots");
        v["total"]["protein_g"] = json!([10]);
        v["health_index"] = json!("healthy");
        let AppError::Validation(errors) = validate_payload(&v).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors["total_calories"], vec![NOT_A_NUMBER.to_string()]);
        assert_eq!(errors["total_protein_g"], vec![NOT_A_NUMBER.to_string()]);
        assert_eq!(errors["health_index"], vec![NOT_A_NUMBER.to_string()]);
        assert!(!errors.contains_key("total_fat_g"));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut v = full();
        v["total"]["calories"] = json!("300.5");
        let entry = validate_payload(&v).unwrap();
        assert_eq!(entry.total_calories, 300.5);
    }

    #[test]
    fn malformed_meal_item_is_reported_by_index() {
        let mut v = full();
        v["meal_items"][0]
            .as_object_mut()
            .unwrap()
            .remove("macronutrients");
        let AppError::Validation(errors) = validate_payload(&v).unwrap_err() else {
            panic!("expected validation error");
        };
        let msgs = &errors["meal_items_json"];
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].starts_with("meal_items[0]:"), "{msgs:?}");
        assert!(msgs[0].contains("macronutrients"), "{msgs:?}");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let AppError::Validation(errors) = validate_payload(&json!([1, 2])).unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(errors.contains_key("non_field_errors"));
    }

    #[tokio::test]
    async fn create_log_persists_through_store() {
        let store = MemoryLogStore::new();
        let user = Uuid::new_v4();
        let row = create_log(&store, user, &full()).await.unwrap();

        let found = store
            .find_by_owner_in_range(
                user,
                row.logged_at - time::Duration::seconds(1),
                OffsetDateTime::now_utc() + time::Duration::seconds(1),
            )
            .await
            .unwrap();
        assert_eq!(found, vec![row]);
    }
}
