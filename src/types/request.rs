use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Travel pace for the generated itinerary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    #[default]
    Normal,
    Packed,
}

impl Pace {
    /// Fixed enum-to-prose mapping used verbatim in the prompt
    pub fn description(self) -> &'static str {
        match self {
            Pace::Relaxed => "leisurely (2-3 attractions per day, unhurried)",
            Pace::Normal => "standard (3-4 attractions per day, comfortable margins)",
            Pace::Packed => "packed (4-5 attractions per day, full schedule)",
        }
    }
}

/// Traveler composition for the trip
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Travelers {
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub seniors: u32,
}

impl Default for Travelers {
    fn default() -> Self {
        Self {
            adults: 2,
            children: 0,
            seniors: 0,
        }
    }
}

/// An attraction the user already picked before generation. These must be
/// scheduled with priority over other catalog candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingAttraction {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub attraction_type: String,
    #[serde(default)]
    pub duration: serde_json::Value,
}

/// One itinerary generation request. Constructed once per pipeline
/// invocation and not mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    pub days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nights: Option<u32>,
    #[serde(default)]
    pub pace: Pace,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub travelers: Travelers,
    #[serde(default)]
    pub existing_attractions: Vec<ExistingAttraction>,
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, days: u32) -> Self {
        Self {
            destination: destination.into(),
            days,
            nights: None,
            pace: Pace::default(),
            interests: Vec::new(),
            travelers: Travelers::default(),
            existing_attractions: Vec::new(),
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }

    pub fn with_travelers(mut self, travelers: Travelers) -> Self {
        self.travelers = travelers;
        self
    }

    pub fn with_existing_attractions(mut self, existing: Vec<ExistingAttraction>) -> Self {
        self.existing_attractions = existing;
        self
    }

    /// Nights default to one fewer than days when the caller leaves them out
    pub fn nights(&self) -> u32 {
        self.nights.unwrap_or_else(|| self.days.saturating_sub(1))
    }

    /// Reject malformed requests before any catalog lookup or network call
    pub fn ensure_valid(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "destination is required".to_string(),
            ));
        }
        if self.days == 0 {
            return Err(PipelineError::InvalidRequest(
                "days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let request: TripRequest =
            serde_json::from_str(r#"{"destination": "beijing", "days": 3}"#).unwrap();

        assert_eq!(request.nights(), 2);
        assert_eq!(request.pace, Pace::Normal);
        assert!(request.interests.is_empty());
        assert_eq!(request.travelers.adults, 2);
        assert_eq!(request.travelers.children, 0);
        assert!(request.existing_attractions.is_empty());
    }

    #[test]
    fn test_explicit_nights_win() {
        let request: TripRequest =
            serde_json::from_str(r#"{"destination": "beijing", "days": 3, "nights": 4}"#).unwrap();
        assert_eq!(request.nights(), 4);
    }

    #[test]
    fn test_rejects_empty_destination() {
        let request = TripRequest::new("  ", 3);
        let err = request.ensure_valid().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_rejects_zero_days() {
        let request = TripRequest::new("beijing", 0);
        let err = request.ensure_valid().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_REQUEST");
    }

    #[test]
    fn test_single_day_trip_has_zero_nights() {
        let request = TripRequest::new("beijing", 1);
        assert!(request.ensure_valid().is_ok());
        assert_eq!(request.nights(), 0);
    }
}
