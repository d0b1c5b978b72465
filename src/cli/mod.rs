use std::time::Duration;

use anyhow::Context;
use clap::{Arg, Command};
use std::env;
use tracing::{error, info};

use crate::{
    catalog::FileCatalogStore,
    core::ItineraryPipeline,
    services::completion::{CompletionClient, CompletionConfig},
    types::TripRequest,
};

/// CLI entry point for the tripsmith tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("tripsmith")
        .version("0.1.0")
        .about("Generate a validated multi-day itinerary from a trip request and an attraction catalog")
        .arg(
            Arg::new("request")
                .help("Path to a JSON file with the trip request")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("catalog-dir")
                .short('c')
                .long("catalog-dir")
                .value_name("DIR")
                .help("Directory with one <destination>.json catalog file per city")
                .default_value("data/attractions"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("The chat-completion model to use")
                .default_value("deepseek-chat"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Completion API key (or set DEEPSEEK_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Completion endpoint base URL (or set DEEPSEEK_API_URL env var)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds")
                .default_value("120"),
        )
        .get_matches();

    // Get API key from argument or environment
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("DEEPSEEK_API_KEY").ok())
        .context("Completion API key is required. Set DEEPSEEK_API_KEY environment variable or use --api-key")?;

    let base_url = matches
        .get_one::<String>("base-url")
        .cloned()
        .or_else(|| env::var("DEEPSEEK_API_URL").ok())
        .unwrap_or_else(|| "https://api.deepseek.com/v1".to_string());

    let timeout_seconds: u64 = matches
        .get_one::<String>("timeout")
        .expect("has default")
        .parse()
        .context("--timeout must be a number of seconds")?;

    let request_path = matches.get_one::<String>("request").expect("required");
    let request_text = std::fs::read_to_string(request_path)
        .with_context(|| format!("failed to read request file {request_path}"))?;
    let request: TripRequest = serde_json::from_str(&request_text)
        .with_context(|| format!("request file {request_path} is not a valid trip request"))?;

    let catalog_dir = matches.get_one::<String>("catalog-dir").expect("has default");
    let store = FileCatalogStore::new(catalog_dir);

    let config = CompletionConfig::new(api_key)
        .with_base_url(base_url.clone())
        .with_model(matches.get_one::<String>("model").expect("has default").as_str())
        .with_timeout(Duration::from_secs(timeout_seconds));
    let pipeline = ItineraryPipeline::new(store, CompletionClient::new(config));

    info!(destination = %request.destination, days = request.days, "generating itinerary");
    info!(base_url = %base_url, "using completion endpoint");

    match pipeline.generate(&request).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            info!("itinerary generation completed successfully");
            Ok(())
        }
        Err(err) => {
            error!(code = err.error_code(), "itinerary generation failed: {err}");
            eprintln!("{}", serde_json::to_string_pretty(&err.to_error_payload())?);
            Err(err.into())
        }
    }
}
