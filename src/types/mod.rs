pub mod attraction;
pub mod itinerary;
pub mod request;

pub use attraction::{
    AiSummary, Attraction, AttractionType, CrowdLevel, DurationProfile, Location, OpeningHours,
    TicketInfo, TicketPrice,
};
pub use itinerary::{
    Activity, ActivityKind, DailyPlan, ItineraryPlan, ItineraryResponse, ValidationReport,
};
pub use request::{ExistingAttraction, Pace, Travelers, TripRequest};
