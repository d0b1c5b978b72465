use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    catalog::{Catalog, CatalogSource},
    error::{PipelineError, Result},
    services::{
        completion::CompletionClient, extraction::extract_json, prompt::build_itinerary_prompt,
        validation::validate_itinerary,
    },
    types::{ItineraryResponse, TripRequest},
};

/// Stages of one pipeline invocation. Transitions are sequential and
/// non-branching; a failure exit is terminal and the caller may only
/// re-invoke the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Prompting,
    AwaitingCompletion,
    Extracting,
    Validating,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Prompting => "prompting",
            PipelineStage::AwaitingCompletion => "awaiting-completion",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Validating => "validating",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Sequences prompt construction, the completion call, extraction and
/// validation into one generation run.
///
/// Stateless across invocations: every `generate` call is a pure function
/// of the request and the catalog plus one network call, so concurrent
/// invocations are independent.
#[derive(Debug)]
pub struct ItineraryPipeline<S> {
    source: S,
    client: CompletionClient,
}

impl<S: CatalogSource> ItineraryPipeline<S> {
    pub fn new(source: S, client: CompletionClient) -> Self {
        Self { source, client }
    }

    pub fn client(&self) -> &CompletionClient {
        &self.client
    }

    /// Run the full pipeline for one request. On success the returned
    /// batch is structurally identical to what the model produced;
    /// validation only gates, it never repairs.
    pub async fn generate(&self, request: &TripRequest) -> Result<ItineraryResponse> {
        match self.run_stages(request).await {
            Ok(response) => {
                debug!(stage = %PipelineStage::Done, "itinerary generation complete");
                Ok(response)
            }
            Err(err) => {
                warn!(
                    stage = %PipelineStage::Failed,
                    code = err.error_code(),
                    retryable = err.is_retryable(),
                    "itinerary generation failed: {err}"
                );
                Err(err)
            }
        }
    }

    async fn run_stages(&self, request: &TripRequest) -> Result<ItineraryResponse> {
        debug!(stage = %PipelineStage::Idle, destination = %request.destination, "pipeline invoked");
        request.ensure_valid()?;

        let attractions = self.source.load(&request.destination).await?;
        if attractions.is_empty() {
            return Err(PipelineError::CatalogNotFound(request.destination.clone()));
        }
        let catalog = Catalog::new(&request.destination, attractions);

        info!(
            destination = %catalog.destination(),
            attractions = catalog.len(),
            days = request.days,
            "generating itinerary"
        );

        debug!(stage = %PipelineStage::Prompting);
        let prompt = build_itinerary_prompt(request, &catalog);

        debug!(stage = %PipelineStage::AwaitingCompletion, prompt_chars = prompt.len());
        let raw = self.client.complete(&prompt).await?;

        debug!(stage = %PipelineStage::Extracting, raw_chars = raw.len());
        let extracted = extract_json(&raw)?;

        debug!(stage = %PipelineStage::Validating);
        let report = validate_itinerary(&extracted, &catalog);
        if !report.valid {
            return Err(PipelineError::Validation(report.errors.join("; ")));
        }

        into_response(&extracted)
    }
}

/// Convert the accepted batch into the typed outbound shape. The typed
/// model is lenient enough that anything validation accepts converts
/// losslessly; a residual failure still means the batch is unusable.
fn into_response(extracted: &Value) -> Result<ItineraryResponse> {
    let raw = extracted.to_string();
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        PipelineError::Validation(format!("itinerary batch is unusable at {location}: {err}"))
    })
}
