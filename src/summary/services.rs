use serde::Deserialize;
use time::{
    macros::{format_description, time},
    Date, OffsetDateTime, PrimitiveDateTime,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::aggregate::aggregate;
use super::report::{build_report, DailySummaryResponse};
use crate::error::{AppError, AppResult};
use crate::logs::LogStore;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> AppResult<Self> {
        let (Some(start), Some(end)) = (present(start), present(end)) else {
            return Err(AppError::InvalidDateRange(
                "Please provide both start_date and end_date query parameters (YYYY-MM-DD)."
                    .into(),
            ));
        };
        Ok(Self {
            start: parse_day(start)?,
            end: parse_day(end)?,
        })
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// First instant of `start`, UTC.
    pub fn start_instant(&self) -> OffsetDateTime {
        self.start.midnight().assume_utc()
    }

    /// Last instant of `end`, UTC.
    pub fn end_instant(&self) -> OffsetDateTime {
        PrimitiveDateTime::new(self.end, time!(23:59:59.999_999_999)).assume_utc()
    }
}

/// Empty counts as missing. Whitespace does not, so it fails as a bad date.
fn present(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn parse_day(s: &str) -> AppResult<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::InvalidDateRange("Invalid date format. Use YYYY-MM-DD.".into()))
}

/// Fetch a user's logs for `range` and build the per-day report.
pub async fn daily_summaries(
    store: &dyn LogStore,
    user_id: Uuid,
    range: DateRange,
) -> AppResult<Vec<DailySummaryResponse>> {
    if range.is_inverted() {
        debug!(%user_id, ?range, "inverted date range");
        return Ok(Vec::new());
    }

    let logs = store
        .find_by_owner_in_range(user_id, range.start_instant(), range.end_instant())
        .await?;
    let meals = logs.len();
    let days = aggregate(logs, range.start, range.end);
    info!(%user_id, days = days.len(), meals, "summary built");

    Ok(build_report(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::{MemoryLogStore, NewNutritionLog};
    use crate::nutrition::MealItemsPayload;
    use time::macros::{date, datetime};

    fn entry(calories: f64, health_index: Option<f64>) -> NewNutritionLog {
        NewNutritionLog {
            meal_items: MealItemsPayload::default(),
            total_calories: calories,
            total_carbohydrates_g: 0.0,
            total_protein_g: 0.0,
            total_fat_g: 0.0,
            health_index,
        }
    }

    #[test]
    fn parses_iso_days() {
        let r = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert_eq!(r.start, date!(2024 - 01 - 01));
        assert_eq!(r.end, date!(2024 - 01 - 31));
    }

    #[test]
    fn missing_or_empty_bounds_ask_for_both() {
        for (s, e) in [
            (None, Some("2024-01-01")),
            (Some("2024-01-01"), None),
            (Some(""), Some("2024-01-01")),
        ] {
            let err = DateRange::parse(s, e).unwrap_err();
            assert!(
                err.to_string().starts_with("Please provide both"),
                "{s:?} {e:?}: {err}"
            );
        }
    }

    #[test]
    fn whitespace_bound_is_a_format_error() {
        let err = DateRange::parse(Some(" "), Some("2024-01-01")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid date format. Use YYYY-MM-DD.");
    }

    #[test]
    fn malformed_days_are_rejected() {
        for bad in ["2024/01/01", "01-02-2024", "2024-13-01", "2024-02-30", "yesterday"] {
            let err = DateRange::parse(Some(bad), Some("2024-01-01")).unwrap_err();
            assert_eq!(err.to_string(), "Invalid date format. Use YYYY-MM-DD.", "{bad}");
        }
    }

    #[test]
    fn end_instant_covers_the_whole_last_day() {
        let r = DateRange::parse(Some("2024-01-01"), Some("2024-01-03")).unwrap();
        assert_eq!(r.start_instant(), datetime!(2024-01-01 00:00 UTC));
        assert_eq!(
            r.end_instant(),
            datetime!(2024-01-03 23:59:59.999_999_999 UTC)
        );
    }

    #[tokio::test]
    async fn summaries_include_meals_logged_late_on_the_end_day() {
        let store = MemoryLogStore::new();
        let user = Uuid::new_v4();
        store
            .insert_at(user, entry(500.0, Some(8.0)), datetime!(2024-01-03 23:59:59 UTC))
            .unwrap();
        store
            .insert_at(user, entry(900.0, None), datetime!(2024-01-04 00:00:00 UTC))
            .unwrap();

        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-03")).unwrap();
        let out = daily_summaries(&store, user, range).await.unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, date!(2024 - 01 - 03));
        assert_eq!(out[0].total_calories, 500.0);
    }

    #[tokio::test]
    async fn inverted_range_returns_empty_list() {
        let store = MemoryLogStore::new();
        let user = Uuid::new_v4();
        store
            .insert_at(user, entry(500.0, None), datetime!(2024-01-02 12:00 UTC))
            .unwrap();

        let range = DateRange::parse(Some("2024-01-03"), Some("2024-01-01")).unwrap();
        assert!(daily_summaries(&store, user, range).await.unwrap().is_empty());
    }
}
