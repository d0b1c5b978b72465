use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Category of a catalog attraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttractionType {
    Historical,
    Natural,
    Cultural,
    Modern,
    Food,
    Shopping,
}

/// Geographic position and street address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// Visit duration options in minutes, by depth of visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationProfile {
    /// Quick photo stop
    pub quick: u32,
    /// Standard visit
    pub normal: u32,
    /// In-depth visit
    pub deep: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub weekday: String,
    pub weekend: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_days: Option<Vec<String>>,
}

/// Ticket price: either a flat amount or tiered by traveler category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketPrice {
    Flat(f64),
    Tiered {
        adult: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        child: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        senior: Option<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketInfo {
    pub price: TicketPrice,
    pub need_reservation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_advance_days: Option<u32>,
}

/// Expected crowding by time of day ("low" / "medium" / "high")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdLevel {
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
}

/// Editorial summary fed to the planner model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub avoid_pitfalls: Vec<String>,
    #[serde(default)]
    pub hidden_gems: Vec<String>,
}

/// One catalog point-of-interest record. Read-only for the duration of a
/// pipeline run; the pipeline never mutates the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub attraction_type: AttractionType,
    pub location: Location,
    pub duration: DurationProfile,
    pub opening_hours: OpeningHours,
    pub ticket_info: TicketInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crowd_level: Option<CrowdLevel>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suitable_for: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<String>,
    #[serde(default)]
    pub ai_summary: AiSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xiaohongshu_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_attractions: Option<Vec<String>>,
}

impl Attraction {
    /// Projection of the record serialized into the prompt: only the fields
    /// the model needs to pick and schedule the attraction.
    pub fn prompt_view(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "type": self.attraction_type,
            "duration": self.duration,
            "location": self.location,
            "tags": self.tags,
            "openingHours": self.opening_hours,
            "ticketInfo": self.ticket_info,
            "aiSummary": self.ai_summary,
        })
    }
}
