//! tripsmith: an AI itinerary generation pipeline
//!
//! Turns a structured trip request plus a catalog of candidate attractions
//! into a validated multi-day itinerary: it builds one planning prompt,
//! drives one bounded-time LLM completion call, defensively recovers JSON
//! from the free-text reply, and checks the result for structural
//! completeness and referential integrity against the catalog before
//! handing it back.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tripsmith::{
//!     CompletionClient, CompletionConfig, FileCatalogStore, ItineraryPipeline, TripRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileCatalogStore::new("data/attractions");
//!     let client = CompletionClient::new(CompletionConfig::from_env()?);
//!     let pipeline = ItineraryPipeline::new(store, client);
//!
//!     let request = TripRequest::new("beijing", 3);
//!     let itinerary = pipeline.generate(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&itinerary)?);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod core;
pub mod error;
pub mod services;
pub mod types;

pub use catalog::{Catalog, CatalogCache, CatalogSource, FileCatalogStore};
pub use core::{ItineraryPipeline, PipelineStage};
pub use error::{PipelineError, Result};
pub use services::completion::{CompletionClient, CompletionConfig};
pub use services::extraction::extract_json;
pub use services::prompt::build_itinerary_prompt;
pub use services::validation::validate_itinerary;
pub use types::{
    Activity, ActivityKind, Attraction, AttractionType, DailyPlan, ExistingAttraction,
    ItineraryPlan, ItineraryResponse, Pace, Travelers, TripRequest, ValidationReport,
};

#[cfg(feature = "cli")]
pub mod cli;
