use serde::{Deserialize, Serialize};

/// Kind of a scheduled activity. Unknown kinds from the model are kept
/// rather than rejected; only `attraction` carries a referential constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Attraction,
    Meal,
    Transport,
    Rest,
    #[serde(other)]
    Other,
}

/// One scheduled activity within a day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Start time as "HH:MM"
    #[serde(default)]
    pub time: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Catalog id; required to resolve when `kind` is `Attraction`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attraction_id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Planned duration in minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reason: Option<String>,
}

/// One day of a generated plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub day: u32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub estimated_cost: f64,
}

/// One itinerary variant. The model returns three of these with fixed
/// semantic roles: "deep", "classic" and "niche".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryPlan {
    pub version: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub total_attractions: u32,
    #[serde(default)]
    pub daily_plans: Vec<DailyPlan>,
}

/// The validated generation result handed back to the caller, structurally
/// identical to the JSON the model produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub plans: Vec<ItineraryPlan>,
}

/// Outcome of validating an extracted itinerary against the catalog.
/// Either every check passed or the whole batch is rejected; `errors`
/// accumulates one entry per failed check rather than stopping early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}
