use serde_json::Value;

use crate::{catalog::Catalog, types::ValidationReport};

/// Check an extracted itinerary for structural completeness and referential
/// integrity against the catalog.
///
/// Never fails and never stops at the first problem: every plan, day and
/// activity is visited so the caller gets one complete diagnostic report
/// per generation attempt. A structurally broken plan or day is reported
/// once and its inner checks skipped; the rest of the batch is still
/// validated.
pub fn validate_itinerary(extracted: &Value, catalog: &Catalog) -> ValidationReport {
    let Some(plans) = extracted.get("plans").and_then(Value::as_array) else {
        return ValidationReport::from_errors(vec![
            "response is missing a plans array".to_string()
        ]);
    };

    if plans.is_empty() {
        return ValidationReport::from_errors(vec!["plans array is empty".to_string()]);
    }

    let mut errors = Vec::new();

    for plan in plans {
        let version = plan.get("version").and_then(Value::as_str).unwrap_or("?");

        let Some(daily_plans) = plan.get("dailyPlans").and_then(Value::as_array) else {
            errors.push(format!("plan `{version}` is missing dailyPlans"));
            continue;
        };

        for daily_plan in daily_plans {
            let day = daily_plan
                .get("day")
                .and_then(Value::as_u64)
                .map(|day| day.to_string())
                .unwrap_or_else(|| "?".to_string());

            let Some(activities) = daily_plan.get("activities").and_then(Value::as_array) else {
                errors.push(format!("day {day} is missing activities"));
                continue;
            };

            for activity in activities {
                if activity.get("type").and_then(Value::as_str) != Some("attraction") {
                    continue;
                }

                if let Some(id) = activity.get("attractionId").and_then(Value::as_str) {
                    if !catalog.contains_id(id) {
                        errors.push(format!("unknown attraction id: {id}"));
                    }
                }
            }
        }
    }

    ValidationReport::from_errors(errors)
}
