pub mod pipeline;

pub use pipeline::{ItineraryPipeline, PipelineStage};
