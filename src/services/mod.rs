pub mod completion;
pub mod extraction;
pub mod prompt;
pub mod validation;

pub use completion::{CompletionClient, CompletionConfig};
pub use extraction::extract_json;
pub use prompt::build_itinerary_prompt;
pub use validation::validate_itinerary;
