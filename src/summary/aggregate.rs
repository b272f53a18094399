//! Daily aggregation of nutrition logs.
//!
//! Pure: callers fetch the logs, this module only groups and reduces them.
//! Calendar days are UTC days.

use std::collections::BTreeMap;

use time::{Date, UtcOffset};

use crate::logs::NutritionLog;

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: Date,
    pub total_calories: f64,
    pub total_carbohydrates_g: f64,
    pub total_protein_g: f64,
    pub total_fat_g: f64,
    pub total_estimated_weight_g: f64,
    /// Sum of present scores over `meals_count`; `None` when no meal has a score.
    pub average_health_index: Option<f64>,
    pub meals_count: usize,
    /// The day's logs, oldest first.
    pub meals: Vec<NutritionLog>,
}

#[derive(Debug, Default, Clone, Copy)]
struct DayTotals {
    calories: f64,
    carbohydrates_g: f64,
    protein_g: f64,
    fat_g: f64,
    estimated_weight_g: f64,
    health_index_sum: f64,
    scored: usize,
}

impl DayTotals {
    fn add(self, log: &NutritionLog) -> Self {
        Self {
            calories: self.calories + log.total_calories,
            carbohydrates_g: self.carbohydrates_g + log.total_carbohydrates_g,
            protein_g: self.protein_g + log.total_protein_g,
            fat_g: self.fat_g + log.total_fat_g,
            estimated_weight_g: self.estimated_weight_g + log.meal_items_json.estimated_weight_g(),
            health_index_sum: self.health_index_sum + log.health_index.unwrap_or(0.0),
            scored: self.scored + usize::from(log.health_index.is_some()),
        }
    }
}

/// UTC calendar day a log belongs to.
pub fn log_date(log: &NutritionLog) -> Date {
    log.logged_at.to_offset(UtcOffset::UTC).date()
}

/// Group `records` by calendar day and reduce each day to totals.
///
/// `records` are expected to already be limited to one owner and to
/// `[start, end]`; their order does not matter. One summary is produced per
/// distinct day present, ascending. Days without logs are not filled in.
/// An inverted range yields nothing.
pub fn aggregate(records: Vec<NutritionLog>, start: Date, end: Date) -> Vec<DailySummary> {
    if start > end {
        return Vec::new();
    }

    let mut records = records;
    records.sort_by_key(|r| r.logged_at);

    let by_day = records
        .into_iter()
        .fold(BTreeMap::<Date, Vec<NutritionLog>>::new(), |mut days, log| {
            days.entry(log_date(&log)).or_default().push(log);
            days
        });

    by_day
        .into_iter()
        .map(|(date, meals)| summarize_day(date, meals))
        .collect()
}

fn summarize_day(date: Date, meals: Vec<NutritionLog>) -> DailySummary {
    let totals = meals.iter().fold(DayTotals::default(), DayTotals::add);
    let meals_count = meals.len();

    // Divided by every meal of the day, scored or not.
    let average_health_index =
        (totals.scored > 0).then(|| totals.health_index_sum / meals_count as f64);

    DailySummary {
        date,
        total_calories: totals.calories,
        total_carbohydrates_g: totals.carbohydrates_g,
        total_protein_g: totals.protein_g,
        total_fat_g: totals.fat_g,
        total_estimated_weight_g: totals.estimated_weight_g,
        average_health_index,
        meals_count,
        meals,
    }
}
